//! Lists HID joysticks and prints their control changes.
//!
//! `cargo run --example hid_poll --features hid [config.toml]`

use inputlink::backends::hid::HidProvider;
use inputlink::{EventFilter, InputConfig, InputManager, Logger};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => InputConfig::load(path)?,
        None => InputConfig::default(),
    };

    let mut input = InputManager::new();
    input.add_provider(HidProvider::new(config)?);
    input.detect_devices(false);

    for (_, device) in input.devices() {
        let name = device
            .meta()
            .map(|m| m.display_name("unknown"))
            .unwrap_or_default();
        println!("{} ({name}): {} controls", device.name(), device.controls().len());
    }

    input.events().add_listener(Logger, EventFilter::ControlsOnly, None);
    loop {
        input.update();
        std::thread::sleep(Duration::from_millis(5));
    }
}
