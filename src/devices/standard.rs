//! The standard virtual controller games bind against.
//!
//! It mirrors the mouse (`Mouse*`) and every keyboard key (same names as the keyboard),
//! and adds generic movement axes and buttons. The default wiring from real devices
//! lives in [`BindingProfile::standard`](crate::binding::BindingProfile::standard).

use super::keyboard::{key_control, KEYS};
use super::mouse::MOUSE_BUTTONS;
use crate::control::Control;
use crate::controller::Controller;

pub const STANDARD_CONTROLLER: &str = "VirtualStandardController";

pub fn standard_controller() -> Controller {
    let mut c =
        Controller::virtual_controller(STANDARD_CONTROLLER, "Standard virtual input controller");

    c.add_control(Control::relative_axis("MouseX", "X axis"));
    c.add_control(Control::relative_axis("MouseY", "Y axis"));
    c.add_control(Control::relative_axis("MouseWheel", "Mouse wheel"));
    for (name, description) in MOUSE_BUTTONS {
        c.add_control(Control::button(&format!("Mouse{name}"), description));
    }

    for key in KEYS {
        c.add_control(key_control(key));
    }

    for (name, description) in [
        ("TransX", "X translation axis: Strafe left/right (+/-)"),
        ("TransY", "Y translation axis: Move up/down (+/-)"),
        ("TransZ", "Z translation axis: Move forwards/backwards (+/-)"),
        ("RotX", "X rotation axis: Pitch, moving the nose down and the tail up (or vice-versa)"),
        ("RotY", "Y rotation axis: Yaw, turning to the left or right"),
        ("RotZ", "Z rotation axis: Roll, moving one wingtip up and the other down"),
    ] {
        c.add_control(Control::axis(name, description));
    }

    // Movement buttons. Turn/Move names keep clear of the arrow and page keys.
    for (name, description) in [
        ("Forward", "Move forwards"),
        ("Backward", "Move backwards"),
        ("TurnLeft", "Move (rotate) left"),
        ("TurnRight", "Move (rotate) right"),
        ("StrafeLeft", "Strafe left"),
        ("StrafeRight", "Strafe right"),
        ("MoveUp", "Move up"),
        ("MoveDown", "Move down"),
        ("Run", "Keep pressed to run"),
        ("Crouch", "Keep pressed to crouch"),
        ("Jump", "Jump"),
        ("Button1", "Button for action #1"),
        ("Button2", "Button for action #2"),
        ("Button3", "Button for action #3"),
        ("Button4", "Button for action #4"),
        ("Button5", "Button for action #5"),
    ] {
        c.add_control(Control::button(name, description));
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerKind;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let c = standard_controller();
        assert_eq!(c.kind(), ControllerKind::Virtual);
        let names: HashSet<_> = c.controls().iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), c.controls().len());
        assert!(c.control("MouseButton12").is_some());
        assert!(c.control("Circumflex").is_some());
        assert!(c.control("TurnLeft").is_some());
    }
}
