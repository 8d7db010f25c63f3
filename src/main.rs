use std::env;
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use stepgauge::{GaugeCommand, GaugeConfig, GaugeError, StepGauge};

fn main() -> Result<(), GaugeError> {
    env_logger::init();

    // Parse flags: --title, --step, --value, --max-value, --font, --size
    let mut title = "Step Gauge".to_string();
    let mut max_value = 8031.0;
    let mut size = 400;
    let mut font_data = None;
    let mut initial: Option<GaugeCommand> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match (arg.as_str(), args.next()) {
            ("--title", Some(value)) => title = value,
            ("--max-value", Some(value)) => match value.parse::<f64>() {
                Ok(parsed) if parsed > 0.0 => max_value = parsed,
                _ => log::warn!("ignoring invalid --max-value {value}"),
            },
            ("--size", Some(value)) => match value.parse::<usize>() {
                Ok(parsed) if parsed > 0 => size = parsed,
                _ => log::warn!("ignoring invalid --size {value}"),
            },
            ("--font", Some(path)) => font_data = Some(std::fs::read(path)?),
            ("--step", Some(value)) => initial = Some(format!("step {value}").parse()?),
            ("--value", Some(value)) => initial = Some(format!("value {value}").parse()?),
            (flag, _) => log::warn!("ignoring unknown argument {flag}"),
        }
    }

    let config = GaugeConfig::builder()
        .title(title)
        .max_value(max_value)
        .window_width(size)
        .window_height(size)
        .maybe_font_data(font_data)
        .build();
    let mut gauge = StepGauge::new(config);
    match initial {
        Some(GaugeCommand::SetValue(value)) => gauge.set_value(value),
        Some(GaugeCommand::SetStep(step)) => gauge.set_step(step),
        None => {}
    }

    // Forward stdin commands to the window thread
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<GaugeCommand>() {
                Ok(command) => {
                    if sender.send(command).is_err() {
                        break;
                    }
                }
                Err(err) => log::warn!("{err}"),
            }
        }
    });

    gauge.show_with_commands(receiver)
}
