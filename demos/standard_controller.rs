//! Wires a scripted keyboard and mouse to the standard virtual controller and prints
//! what the game side sees.

use inputlink::backends::ScriptedDevice;
use inputlink::devices::{keyboard, mouse, standard_controller};
use inputlink::{BindingProfile, DeviceHandle, EventFilter, InputManager, Logger};

fn main() {
    tracing_subscriber::fmt::init();

    let mut input = InputManager::new();
    let (kb_backend, kb) = ScriptedDevice::new();
    let (mouse_backend, m) = ScriptedDevice::new();
    input.add_controller(keyboard().with_backend(DeviceHandle::owned(kb_backend)));
    input.add_controller(mouse().with_backend(DeviceHandle::owned(mouse_backend)));
    let game = input
        .add_controller(standard_controller())
        .expect("fresh manager");

    let made = input.apply_profile(game, &BindingProfile::standard());
    println!("standard profile: {made} connections");
    input.events().add_listener(
        Logger,
        EventFilter::ControlsOnly,
        Some(inputlink::devices::STANDARD_CONTROLLER.into()),
    );

    kb.press("W");
    kb.press("Shift");
    m.feed("Y", inputlink::ControlValue::Axis { value: 12.0, relative: true });
    m.press("Left");
    for _ in 0..2 {
        input.update();
    }

    let state = input.snapshot();
    if let Some(game_state) = state.get(inputlink::devices::STANDARD_CONTROLLER) {
        println!(
            "Forward={} Run={} Button1={} RotX={}",
            game_state.get_button("Forward"),
            game_state.get_button("Run"),
            game_state.get_button("Button1"),
            game_state.get_axis("RotX"),
        );
    }
}
