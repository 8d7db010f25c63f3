use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use stepgauge::{GaugeCommand, GaugeConfig, GaugeError, StepGauge};

fn main() -> Result<(), GaugeError> {
    env_logger::init();

    let config = GaugeConfig::builder()
        .title("Random values".to_string())
        .value_animation(Duration::from_millis(600))
        .build();
    let mut gauge = StepGauge::new(config);

    // Create a channel for sending random commands
    let (sender, receiver) = mpsc::channel();

    // Fire commands faster than the value animation so transitions get cancelled mid-flight
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let command = if rng.random_bool(0.7) {
                GaugeCommand::SetValue(rng.random_range(0.0..8031.0))
            } else {
                GaugeCommand::SetStep(rng.random_range(0..=10))
            };
            if sender.send(command).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(rng.random_range(150..900)));
        }
    });

    println!("Displaying step gauge with random values:");
    println!("- drag the handle to pick a step");
    println!("- RUST_LOG=info shows listener notifications");
    println!("Press Ctrl+C to exit");

    gauge.show_with_commands(receiver)
}
