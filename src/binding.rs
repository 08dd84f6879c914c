//! Serializable binding profiles.
//!
//! A profile is a declarative list of `connect` / `connect_all` calls against a target
//! (usually virtual) controller. Devices are matched by name, so one profile works for
//! whatever happens to be plugged in when it is applied.

use crate::controller::ControllerId;
use crate::manager::InputManager;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a binding selects source controllers by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceMatch {
    Exact(String),
    Contains(String),
}

impl DeviceMatch {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            DeviceMatch::Exact(s) => name == s,
            DeviceMatch::Contains(s) => name.contains(s.as_str()),
        }
    }
}

fn unit_scale() -> f32 {
    1.0
}

/// Target control `control` fed by control `source` of every matching device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Binding {
    pub control: String,
    pub device: DeviceMatch,
    pub source: String,
    #[serde(default = "unit_scale")]
    pub scale: f32,
}

impl Binding {
    pub fn new(control: &str, device: DeviceMatch, source: &str, scale: f32) -> Self {
        Self {
            control: control.to_string(),
            device,
            source: source.to_string(),
            scale,
        }
    }
}

/// Name-prefix connection, see [`InputManager::connect_all`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrefixBinding {
    pub device: DeviceMatch,
    #[serde(default)]
    pub output_prefix: String,
    #[serde(default)]
    pub input_prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingProfile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub connect_all: Vec<PrefixBinding>,
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

impl BindingProfile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_prefix(
        mut self,
        device: DeviceMatch,
        output_prefix: &str,
        input_prefix: &str,
    ) -> Self {
        self.connect_all.push(PrefixBinding {
            device,
            output_prefix: output_prefix.to_string(),
            input_prefix: input_prefix.to_string(),
        });
        self
    }

    pub fn with_binding(
        mut self,
        control: &str,
        device: DeviceMatch,
        source: &str,
        scale: f32,
    ) -> Self {
        self.bindings.push(Binding::new(control, device, source, scale));
        self
    }

    /// Connect every registered controller other than `target` as described.
    ///
    /// Prefix bindings are applied before single bindings. Bindings naming a control
    /// that does not exist on either side are skipped. Returns the number of
    /// connections made.
    pub fn apply(&self, manager: &mut InputManager, target: ControllerId) -> usize {
        let sources: Vec<(ControllerId, String)> = manager
            .controllers()
            .filter(|(id, _)| *id != target)
            .map(|(id, c)| (id, c.name().to_string()))
            .collect();

        let mut made = 0;
        for prefix in &self.connect_all {
            for (id, _) in sources.iter().filter(|(_, name)| prefix.device.matches(name)) {
                made +=
                    manager.connect_all(target, *id, &prefix.output_prefix, &prefix.input_prefix);
            }
        }
        for binding in &self.bindings {
            for (id, _) in sources.iter().filter(|(_, name)| binding.device.matches(name)) {
                let Some(input) = manager.control_id(*id, &binding.source) else {
                    continue;
                };
                if manager
                    .connect(target, &binding.control, input, binding.scale)
                    .is_some()
                {
                    made += 1;
                }
            }
        }
        debug!(profile = %self.name, %target, made, "binding profile applied");
        made
    }

    /// Default wiring of the standard virtual controller.
    ///
    /// Mouse and keyboard are mirrored by name. Mouse movement also drives the
    /// rotation axes and its buttons the action buttons; WASD and the cursor keys
    /// drive movement. Joystick axes are amplified by 4, space mouse axes are
    /// inverted and scaled down by 90. A WiiMote drives movement from its pad.
    pub fn standard() -> Self {
        use DeviceMatch::{Contains, Exact};
        let mouse = || Exact("Mouse".to_string());
        let keyboard = || Exact("Keyboard".to_string());
        let joystick = || Contains("Joystick".to_string());
        let space_mouse = || Contains("SpaceMouse".to_string());
        let wiimote = || Contains("WiiMote".to_string());

        let mut profile = Self::new("standard")
            .with_prefix(mouse(), "Mouse", "")
            .with_prefix(keyboard(), "", "");
        profile.description =
            Some("Default mapping of the standard virtual controller".to_string());

        profile = profile
            .with_binding("RotX", mouse(), "Y", 1.0)
            .with_binding("RotY", mouse(), "X", -1.0);
        for (button, source) in [
            ("Button1", "Left"),
            ("Button2", "Right"),
            ("Button3", "Middle"),
            ("Button4", "Button4"),
            ("Button5", "Button5"),
        ] {
            profile = profile.with_binding(button, mouse(), source, 1.0);
        }

        for (control, key) in [
            ("Forward", "W"),
            ("Forward", "Up"),
            ("Backward", "S"),
            ("Backward", "Down"),
            ("StrafeLeft", "A"),
            ("StrafeRight", "D"),
            ("TurnLeft", "Q"),
            ("TurnLeft", "Left"),
            ("TurnRight", "E"),
            ("TurnRight", "Right"),
            ("MoveUp", "PageUp"),
            ("MoveDown", "PageDown"),
            ("Run", "Shift"),
            ("Crouch", "Ctrl"),
            ("Jump", "Space"),
            ("Button1", "Space"),
            ("Button2", "Enter"),
            ("Button3", "Backspace"),
            ("Button4", "Alt"),
            ("Button5", "Circumflex"),
        ] {
            profile = profile.with_binding(control, keyboard(), key, 1.0);
        }

        profile = profile
            .with_binding("RotX", joystick(), "Y", 4.0)
            .with_binding("RotY", joystick(), "X", 4.0);
        for i in 0..5 {
            let button = format!("Button{}", i + 1);
            profile = profile.with_binding(&button, joystick(), &format!("Button{i}"), 1.0);
        }

        const SPACE_MOUSE_SCALE: f32 = -1.0 / 90.0;
        for (control, source) in [
            ("RotX", "RotX"),
            ("RotY", "RotZ"),
            ("RotZ", "RotY"),
            ("TransX", "TransX"),
            ("TransY", "TransY"),
            ("TransZ", "TransZ"),
        ] {
            profile = profile.with_binding(control, space_mouse(), source, SPACE_MOUSE_SCALE);
        }
        for i in 0..5 {
            let button = format!("Button{}", i + 1);
            profile = profile.with_binding(&button, space_mouse(), &format!("Button{i}"), 1.0);
        }

        // no movement from the motion sensors yet, only the pad and buttons
        for (control, source) in [
            ("Forward", "ButtonUp"),
            ("Backward", "ButtonDown"),
            ("TurnLeft", "ButtonLeft"),
            ("TurnRight", "ButtonRight"),
            ("Button1", "ButtonA"),
            ("Button2", "ButtonB"),
            ("Button3", "Button1"),
            ("Button4", "Button2"),
            ("Button5", "ButtonHome"),
        ] {
            profile = profile.with_binding(control, wiimote(), source, 1.0);
        }
        profile
    }
}
