//! Drives two parameters from a virtual controller: one bound explicitly,
//! one bound by "turning" the next knob.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tactile_midi_io::{
    Bounds, MidiStream, Parameter, RelativeSettings, SharedParameter, VirtualTransport,
};

fn main() -> tactile_midi_io::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let transport = VirtualTransport::new();
    let controller = transport.add_input("Virtual Encoders");

    let current = Arc::new(SharedParameter::new(
        "laser current (mA)",
        Bounds::new(0.0, 120.0)?,
        60.0,
    ));
    let voltage = Arc::new(SharedParameter::new(
        "piezo (V)",
        Bounds::new(-10.0, 10.0)?,
        0.0,
    ));

    let mut stream = MidiStream::builder()
        .transport(Arc::new(transport))
        .device("Virtual Encoders")
        .delay(Duration::from_millis(1))
        .display_events(true)
        .relative(RelativeSettings::new(65, 63).with_resolution(240.0))
        .build()?;
    stream.start()?;

    stream.assign(16, current.clone());
    stream.bind(voltage.clone());

    for _ in 0..10 {
        controller.control_change(16, 65);
    }
    for _ in 0..24 {
        controller.control_change(17, 63);
    }
    thread::sleep(Duration::from_millis(50));

    println!("{}  (channel 16)", current);
    println!("{}  (channel 17, bound)", voltage);
    println!("channels: {:?}", stream.assigned_channels());
    assert!(voltage.get() < 0.0);

    stream.stop();
    Ok(())
}
