use crate::control::Control;
use crate::controller::Controller;

/// Wii Remote face buttons, in control order.
pub const WIIMOTE_BUTTONS: [(&str, &str); 11] = [
    ("Button1", "Button '1'"),
    ("Button2", "Button '2'"),
    ("ButtonA", "Button 'A'"),
    ("ButtonB", "Button 'B'"),
    ("ButtonMinus", "Button 'Minus'"),
    ("ButtonPlus", "Button 'Plus'"),
    ("ButtonHome", "Button 'Home'"),
    ("ButtonLeft", "Button 'Left'"),
    ("ButtonRight", "Button 'Right'"),
    ("ButtonUp", "Button 'Up'"),
    ("ButtonDown", "Button 'Down'"),
];

/// Motion and IR pointer axes; the Nunchuk repeats the motion set under a `Nunchuk` prefix.
const MOTION_AXES: [(&str, &str); 8] = [
    ("AccX", "acceleration axis (X)"),
    ("AccY", "acceleration axis (Y)"),
    ("AccZ", "acceleration axis (Z)"),
    ("OrientX", "orientation axis (X)"),
    ("OrientY", "orientation axis (Y)"),
    ("OrientZ", "orientation axis (Z)"),
    ("Roll", "rotation (roll)"),
    ("Pitch", "rotation (pitch)"),
];

const CLASSIC_BUTTONS: [&str; 15] = [
    "A", "B", "X", "Y", "L", "R", "ZL", "ZR", "Minus", "Plus", "Home", "Left", "Right", "Up",
    "Down",
];

/// Device controller for a Wii Remote with Nunchuk and Classic-controller extension
/// controls. Extension controls stay at rest while no extension is plugged in.
///
/// `LEDs` holds the four player lights in bits 0..=3.
pub fn wiimote(name: &str) -> Controller {
    let mut c = Controller::device(name, "WiiMote controller")
        .with_control(Control::led("LEDs", "LEDs"))
        .with_control(Control::effect("Rumble1", "Rumble motor #1"));

    for (button, description) in WIIMOTE_BUTTONS {
        c.add_control(Control::button(button, description));
    }
    for (axis, description) in MOTION_AXES {
        c.add_control(Control::axis(axis, &capitalize(description)));
    }
    c.add_control(Control::axis("PointerX", "Pointer (X)"));
    c.add_control(Control::axis("PointerY", "Pointer (Y)"));

    c.add_control(Control::button("NunchukButtonC", "Nunchuk button 'C'"));
    c.add_control(Control::button("NunchukButtonZ", "Nunchuk button 'Z'"));
    for (axis, description) in MOTION_AXES {
        c.add_control(Control::axis(
            &format!("Nunchuk{axis}"),
            &format!("Nunchuk {description}"),
        ));
    }
    c.add_control(Control::axis("NunchukX", "Nunchuk joystick (X)"));
    c.add_control(Control::axis("NunchukY", "Nunchuk joystick (Y)"));

    for button in CLASSIC_BUTTONS {
        c.add_control(Control::button(
            &format!("ClassicButton{button}"),
            &format!("Classic button '{button}'"),
        ));
    }
    for (axis, description) in [
        ("ClassicLeftX", "Classic left stick (X)"),
        ("ClassicLeftY", "Classic left stick (Y)"),
        ("ClassicRightX", "Classic right stick (X)"),
        ("ClassicRightY", "Classic right stick (Y)"),
        ("ClassicTriggerL", "Classic left trigger"),
        ("ClassicTriggerR", "Classic right trigger"),
    ] {
        c.add_control(Control::axis(axis, description));
    }
    c
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlKind;

    #[test]
    fn layout() {
        let w = wiimote("WiiMote");
        assert_eq!(w.control("LEDs").map(|c| c.kind()), Some(ControlKind::Led));
        assert_eq!(w.control("Rumble1").map(|c| c.kind()), Some(ControlKind::Effect));
        assert_eq!(
            w.control("AccX").map(|c| c.description()),
            Some("Acceleration axis (X)")
        );
        for name in [
            "ButtonHome",
            "PointerY",
            "NunchukButtonZ",
            "NunchukPitch",
            "NunchukY",
            "ClassicButtonZR",
            "ClassicRightX",
        ] {
            assert!(w.control(name).is_some(), "missing {name}");
        }
        let names: std::collections::HashSet<_> = w.controls().iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), w.controls().len());
    }
}
