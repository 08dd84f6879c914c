use inputlink::backends::{joystick_for, HidJoystick, MockReportSource};
use inputlink::devices::standard_controller;
use inputlink::hid::HidDevice;
use inputlink::{BindingProfile, ControllerId, DeviceHandle, InputManager, JoystickConfig};

/// Report 1: 8 buttons, X/Y 8-bit, 4-bit hat + padding. Report 2: 3 LEDs out.
const DESCRIPTOR: &[u8] = &[
    0x05, 0x01, 0x09, 0x04, 0xA1, 0x01, // Generic Desktop / Joystick / Application
    0x85, 0x01, // Report ID 1
    0x05, 0x09, 0x19, 0x01, 0x29, 0x08, 0x15, 0x00, 0x25, 0x01, 0x75, 0x01, 0x95, 0x08, 0x81, 0x02,
    0x05, 0x01, 0x09, 0x30, 0x09, 0x31, 0x15, 0x00, 0x26, 0xFF, 0x00, 0x75, 0x08, 0x95, 0x02, 0x81,
    0x02, // X, Y
    0x09, 0x39, 0x15, 0x00, 0x25, 0x07, 0x35, 0x00, 0x46, 0x3B, 0x01, 0x75, 0x04, 0x95, 0x01, 0x81,
    0x42, // Hat
    0x75, 0x04, 0x95, 0x01, 0x81, 0x03, // padding
    0x85, 0x02, // Report ID 2
    0x05, 0x08, 0x19, 0x01, 0x29, 0x03, 0x15, 0x00, 0x25, 0x01, 0x75, 0x01, 0x95, 0x03, 0x91, 0x02,
    0x95, 0x05, 0x91, 0x03, // padding
    0xC0,
];

fn register(input: &mut InputManager, max_reports: usize) -> (ControllerId, MockReportSource) {
    let feed = MockReportSource::new();
    let device = HidDevice::from_descriptor(0x044F, 0xB10A, DESCRIPTOR);
    let controller = joystick_for("Joystick", &device).with_backend(DeviceHandle::owned(
        HidJoystick::new(feed.clone(), device)
            .with_config(JoystickConfig::default())
            .with_max_reports(max_reports),
    ));
    (input.add_controller(controller).unwrap(), feed)
}

#[test]
fn descriptor_to_controls() {
    let mut input = InputManager::new();
    let (joy, feed) = register(&mut input, 32);

    feed.queue_read(vec![1, 0b1000_0001, 0x00, 0xFF, 0x06]);
    assert!(input.update() > 0);

    let c = input.controller(joy).unwrap();
    assert!(c.control("Button0").unwrap().is_pressed());
    assert!(c.control("Button7").unwrap().is_pressed());
    assert!(!c.control("Button3").unwrap().is_pressed());
    assert_eq!(c.control("X").unwrap().axis_value(), -1.0);
    assert_eq!(c.control("Y").unwrap().axis_value(), 1.0);
    assert_eq!(c.control("Hat").unwrap().axis_value(), 6.0);
}

#[test]
fn foreign_report_ids_are_ignored() {
    let mut input = InputManager::new();
    let (joy, feed) = register(&mut input, 32);
    feed.queue_read(vec![1, 0b0000_0010, 0x80, 0x80, 0x0F]);
    input.update();
    feed.queue_read(vec![7, 0xFF, 0xFF, 0xFF, 0xFF]);
    input.update();
    let c = input.controller(joy).unwrap();
    assert!(c.control("Button1").unwrap().is_pressed());
    assert!(!c.control("Button0").unwrap().is_pressed());
}

#[test]
fn report_budget_per_update() {
    let mut input = InputManager::new();
    let (_, feed) = register(&mut input, 2);
    for x in 0..5u8 {
        feed.queue_read(vec![1, 0, x, 0, 0x0F]);
    }
    input.update();
    assert_eq!(feed.pending_reads(), 3);
    input.update();
    input.update();
    assert_eq!(feed.pending_reads(), 0);
}

#[test]
fn standard_profile_scales_joystick_axes() {
    let mut input = InputManager::new();
    let game = input.add_controller(standard_controller()).unwrap();
    let (_, feed) = register(&mut input, 32);
    input.apply_profile(game, &BindingProfile::standard());

    feed.queue_read(vec![1, 0b0000_0001, 0x00, 0xFF, 0x0F]);
    input.update();
    let g = input.controller(game).unwrap();
    assert_eq!(g.control("RotX").unwrap().axis_value(), 4.0);
    assert_eq!(g.control("RotY").unwrap().axis_value(), -4.0);
    assert!(g.control("Button1").unwrap().is_pressed());
}

#[test]
fn led_bits_reach_the_output_report() {
    let mut input = InputManager::new();
    let (joy, feed) = register(&mut input, 32);
    let leds = input.control_id(joy, "LEDs").unwrap();
    input.set_led(leds, 0b101);
    input.update();
    assert_eq!(feed.write_history(), vec![vec![2, 0b101]]);
}

#[test]
fn buttons_past_the_32nd_are_decoded() {
    // Report 1: 40 buttons, no padding.
    let descriptor = [
        0x05, 0x01, 0x09, 0x05, 0xA1, 0x01, // Generic Desktop / Gamepad / Application
        0x85, 0x01, 0x05, 0x09, 0x19, 0x01, 0x29, 0x28, 0x15, 0x00, 0x25, 0x01, 0x75, 0x01,
        0x95, 0x28, 0x81, 0x02, 0xC0,
    ];
    let device = HidDevice::from_descriptor(0x045E, 0x0001, &descriptor);
    assert_eq!(device.input_buttons().len(), 2);

    let feed = MockReportSource::new();
    let mut input = InputManager::new();
    let pad = input
        .add_controller(
            joystick_for("Gamepad", &device)
                .with_backend(DeviceHandle::owned(HidJoystick::new(feed.clone(), device))),
        )
        .unwrap();

    // usage 36 is bit 35: byte 4, bit 3
    feed.queue_read(vec![1, 0x01, 0x00, 0x00, 0x00, 0x08]);
    input.update();
    let c = input.controller(pad).unwrap();
    assert!(c.control("Button0").unwrap().is_pressed());
    assert!(c.control("Button35").unwrap().is_pressed());
    assert!(!c.control("Button34").unwrap().is_pressed());
    assert!(!c.control("Button39").unwrap().is_pressed());
}
