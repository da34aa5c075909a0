use tactile_midi_io::{MidiTransport, MidirTransport};

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== MIDI Input Devices ===");
    match MidirTransport::default().devices() {
        Ok(devices) if devices.is_empty() => println!("  (none found)"),
        Ok(devices) => {
            for dev in &devices {
                println!("  [{}] {}", dev.index, dev.name);
            }
        }
        Err(e) => println!("  MIDI unavailable: {}", e),
    }
}
