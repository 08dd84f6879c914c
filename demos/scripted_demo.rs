//! A scripted gamepad feeding a virtual controller through hand-made connections,
//! with rumble flowing back to the device.

use inputlink::backends::ScriptedDevice;
use inputlink::devices::joystick;
use inputlink::{Control, Controller, DeviceHandle, InputManager};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut input = InputManager::new();
    let (backend, pad) = ScriptedDevice::new();
    let pad_id = input
        .add_controller(joystick("Gamepad", 4).with_backend(DeviceHandle::owned(backend)))
        .expect("fresh manager");
    let ship = input
        .add_controller(
            Controller::virtual_controller("Ship", "Spaceship controls")
                .with_control(Control::axis("Throttle", "Forward thrust"))
                .with_control(Control::button("Fire", "Primary weapon"))
                .with_control(Control::effect("Hit", "Damage feedback")),
        )
        .expect("fresh manager");

    let throttle = input.control_id(pad_id, "Y").expect("joystick has Y");
    let fire = input.control_id(pad_id, "Button0").expect("joystick has Button0");
    let rumble = input.control_id(pad_id, "Rumble1").expect("joystick has Rumble1");
    input.connect(ship, "Throttle", throttle, -1.0);
    input.connect(ship, "Fire", fire, 1.0);
    input.connect(ship, "Hit", rumble, 1.0);

    pad.set_axis("Y", -0.75);
    pad.press("Button0");
    input.update();

    let ship_controls = input.controller(ship).expect("registered");
    println!(
        "throttle={} fire={}",
        ship_controls.control("Throttle").map_or(0.0, |c| c.axis_value()),
        ship_controls.control("Fire").is_some_and(|c| c.is_pressed()),
    );

    // effects travel backward, from the virtual side to the device
    if let Some(hit) = input.control_id(ship, "Hit") {
        input.set_effect(hit, 0.8);
    }
    input.update();
    input.update();
    for (control, value) in pad.take_outputs() {
        println!("device output {control} = {value:?}");
    }
}
