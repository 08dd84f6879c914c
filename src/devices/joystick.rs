use crate::control::Control;
use crate::controller::Controller;

/// Absolute axes every joystick exposes, in control order.
pub const JOYSTICK_AXES: &[(&str, &str)] = &[
    ("X", "X axis"),
    ("Y", "Y axis"),
    ("Z", "Z axis"),
    ("RX", "Rotation X axis"),
    ("RY", "Rotation Y axis"),
    ("RZ", "Rotation Z axis"),
    ("Hat", "Hat switch (-1 neutral, 0..7 clockwise from up)"),
];

pub const RUMBLE_MOTORS: usize = 4;

/// Device controller with the standard joystick layout.
///
/// Controls: the axes of [`JOYSTICK_AXES`], `Button0..Button{buttons-1}`, an `LEDs`
/// bitfield and `Rumble1..Rumble4` effects.
pub fn joystick(name: &str, buttons: usize) -> Controller {
    let mut c = Controller::device(name, "Joystick and gamepad input controller");
    for (axis, description) in JOYSTICK_AXES {
        c.add_control(Control::axis(axis, description));
    }
    for i in 0..buttons {
        c.add_control(Control::button(&format!("Button{i}"), &format!("Button #{i}")));
    }
    c.add_control(Control::led("LEDs", "LED bitfield"));
    for i in 1..=RUMBLE_MOTORS {
        c.add_control(Control::effect(&format!("Rumble{i}"), &format!("Rumble motor #{i}")));
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlKind;

    #[test]
    fn layout() {
        let j = joystick("Joystick", 12);
        assert_eq!(j.controls().len(), JOYSTICK_AXES.len() + 12 + 1 + RUMBLE_MOTORS);
        assert_eq!(j.control("Button11").map(|c| c.kind()), Some(ControlKind::Button));
        assert!(j.control("Button12").is_none());
        assert_eq!(j.control("Rumble4").map(|c| c.kind()), Some(ControlKind::Effect));
        assert!(!j.control("Hat").unwrap().is_relative());
    }
}
