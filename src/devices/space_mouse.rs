use crate::control::Control;
use crate::controller::Controller;

/// Device controller for a 6-DOF space mouse: translation and rotation axes, eight buttons.
pub fn space_mouse(name: &str) -> Controller {
    let mut c = Controller::device(name, "SpaceMouse input controller")
        .with_control(Control::axis("TransX", "X translation axis"))
        .with_control(Control::axis("TransY", "Y translation axis"))
        .with_control(Control::axis("TransZ", "Z translation axis"))
        .with_control(Control::axis("RotX", "X rotation axis"))
        .with_control(Control::axis("RotY", "Y rotation axis"))
        .with_control(Control::axis("RotZ", "Z rotation axis"));
    for i in 0..8 {
        c.add_control(Control::button(&format!("Button{i}"), &format!("Button #{i}")));
    }
    c
}
