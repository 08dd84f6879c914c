use crate::control::Control;
use crate::controller::Controller;

pub const MOUSE_BUTTONS: &[(&str, &str)] = &[
    ("Left", "Left mouse button"),
    ("Right", "Right mouse button"),
    ("Middle", "Middle mouse button"),
    ("Button4", "Mouse button #4"),
    ("Button5", "Mouse button #5"),
    ("Button6", "Mouse button #6"),
    ("Button7", "Mouse button #7"),
    ("Button8", "Mouse button #8"),
    ("Button9", "Mouse button #9"),
    ("Button10", "Mouse button #10"),
    ("Button11", "Mouse button #11"),
    ("Button12", "Mouse button #12"),
];

/// Device controller named `"Mouse"`: relative X/Y/Wheel axes and twelve buttons.
pub fn mouse() -> Controller {
    MOUSE_BUTTONS.iter().fold(
        Controller::device("Mouse", "Mouse input controller")
            .with_control(Control::relative_axis("X", "X axis (movement data, no absolute data)"))
            .with_control(Control::relative_axis("Y", "Y axis (movement data, no absolute data)"))
            .with_control(Control::relative_axis(
                "Wheel",
                "Mouse wheel (movement data, no absolute data)",
            )),
        |c, (name, description)| c.with_control(Control::button(name, description)),
    )
}
