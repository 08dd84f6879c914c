//! Raw keyboard and mouse packets, decoupled from the OS callback that produces them.
//!
//! The platform layer (a `WM_INPUT` handler, an evdev reader, a test) calls
//! [`RawInput::keyboard_packet`] / [`RawInput::mouse_packet`] from any thread. Both
//! take effect on the next [`InputManager::update`](crate::manager::InputManager::update)
//! of the `"Keyboard"` and `"Mouse"` controllers.
//!
//! Key packets are written straight into the update queue through an
//! [`UpdateSender`]. Mouse packets are pooled: movement is accumulated between updates
//! and published as relative axis values, which fall back to 0 on an update without
//! movement.

use crate::control::ControlId;
use crate::device::{DeviceBackend, DeviceControls, DeviceHandle};
use crate::devices::{keyboard, mouse, KEYS};
use crate::provider::{Detection, Provider};
use crate::queue::UpdateSender;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::trace;

pub const RI_MOUSE_BUTTON_1_DOWN: u16 = 0x0001;
pub const RI_MOUSE_BUTTON_1_UP: u16 = 0x0002;
pub const RI_MOUSE_BUTTON_2_DOWN: u16 = 0x0004;
pub const RI_MOUSE_BUTTON_2_UP: u16 = 0x0008;
pub const RI_MOUSE_BUTTON_3_DOWN: u16 = 0x0010;
pub const RI_MOUSE_BUTTON_3_UP: u16 = 0x0020;
pub const RI_MOUSE_BUTTON_4_DOWN: u16 = 0x0040;
pub const RI_MOUSE_BUTTON_4_UP: u16 = 0x0080;
pub const RI_MOUSE_BUTTON_5_DOWN: u16 = 0x0100;
pub const RI_MOUSE_BUTTON_5_UP: u16 = 0x0200;
pub const RI_MOUSE_WHEEL: u16 = 0x0400;

/// (down flag, up flag, control) for the five buttons raw input reports.
const MOUSE_BUTTON_FLAGS: [(u16, u16, &str); 5] = [
    (RI_MOUSE_BUTTON_1_DOWN, RI_MOUSE_BUTTON_1_UP, "Left"),
    (RI_MOUSE_BUTTON_2_DOWN, RI_MOUSE_BUTTON_2_UP, "Right"),
    (RI_MOUSE_BUTTON_3_DOWN, RI_MOUSE_BUTTON_3_UP, "Middle"),
    (RI_MOUSE_BUTTON_4_DOWN, RI_MOUSE_BUTTON_4_UP, "Button4"),
    (RI_MOUSE_BUTTON_5_DOWN, RI_MOUSE_BUTTON_5_UP, "Button5"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawKeyboardPacket {
    /// Windows-style virtual-key code.
    pub vkey: u16,
    /// `true` for key-up (break), `false` for key-down (make).
    pub is_break: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawMousePacket {
    pub dx: i32,
    pub dy: i32,
    /// `dx`/`dy` are an absolute position rather than a delta.
    pub absolute: bool,
    /// `RI_MOUSE_*` bitfield.
    pub button_flags: u16,
    /// Wheel delta when `RI_MOUSE_WHEEL` is set, as an unsigned 16-bit word.
    pub button_data: u16,
}

/// Where keyboard packets go: the registered keyboard's controls, by virtual key.
#[derive(Debug)]
struct KeyboardRoute {
    sender: UpdateSender,
    keys: HashMap<u16, ControlId>,
}

#[derive(Debug, Default)]
pub struct RawMouse {
    x: f32,
    y: f32,
    wheel: f32,
    old_x: i32,
    old_y: i32,
    buttons: Vec<(&'static str, bool)>,
}

impl RawMouse {
    fn push(&mut self, packet: RawMousePacket) {
        if packet.absolute {
            self.x += packet.dx.wrapping_sub(self.old_x) as f32;
            self.y += packet.dy.wrapping_sub(self.old_y) as f32;
            self.old_x = packet.dx;
            self.old_y = packet.dy;
        } else {
            self.x += packet.dx as f32;
            self.y += packet.dy as f32;
        }

        for (down, up, name) in MOUSE_BUTTON_FLAGS {
            if packet.button_flags & down != 0 {
                self.buttons.push((name, true));
            }
            if packet.button_flags & up != 0 {
                self.buttons.push((name, false));
            }
        }
        if packet.button_flags & RI_MOUSE_WHEEL != 0 {
            self.wheel += f32::from(packet.button_data as i16);
        }
    }
}

impl DeviceBackend for RawMouse {
    fn update(&mut self, controls: &mut DeviceControls<'_>) -> bool {
        let mut changed = false;
        changed |= controls.set_axis("X", std::mem::take(&mut self.x), true);
        changed |= controls.set_axis("Y", std::mem::take(&mut self.y), true);
        changed |= controls.set_axis("Wheel", std::mem::take(&mut self.wheel), true);
        for (name, pressed) in self.buttons.drain(..) {
            changed |= controls.set_pressed(name, pressed);
        }
        changed
    }
}

/// Shared entry point for raw keyboard and mouse packets.
///
/// Cheap to clone; hand one clone to the platform callback and register another
/// through [`RawInputProvider`].
#[derive(Clone, Debug, Default)]
pub struct RawInput {
    keyboard: Arc<Mutex<Option<KeyboardRoute>>>,
    mouse: Arc<Mutex<RawMouse>>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Packets arriving before the keyboard is registered are dropped.
    pub fn keyboard_packet(&self, packet: RawKeyboardPacket) {
        let route = self.keyboard.lock().unwrap_or_else(|e| e.into_inner());
        match route.as_ref().and_then(|r| Some((&r.sender, *r.keys.get(&packet.vkey)?))) {
            Some((sender, control)) => sender.set_pressed(control, !packet.is_break),
            None => trace!(vkey = packet.vkey, "raw key not routed"),
        }
    }

    pub fn mouse_packet(&self, packet: RawMousePacket) {
        self.mouse
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(packet);
    }
}

/// Registers `"Keyboard"` and `"Mouse"` fed by a [`RawInput`] handle.
#[derive(Debug)]
pub struct RawInputProvider {
    input: RawInput,
}

impl RawInputProvider {
    pub fn new(input: RawInput) -> Self {
        Self { input }
    }
}

impl Provider for RawInputProvider {
    fn name(&self) -> &str {
        "RawInput"
    }

    fn detect_devices(&mut self, detection: &mut Detection<'_>) {
        if !detection.has_device("Keyboard") {
            if let Some(id) = detection.add_device(keyboard()) {
                let keys = KEYS
                    .iter()
                    .filter_map(|k| Some((k.vkey, detection.control_id(id, k.name)?)))
                    .collect();
                let route = KeyboardRoute {
                    sender: detection.sender(),
                    keys,
                };
                *self.input.keyboard.lock().unwrap_or_else(|e| e.into_inner()) = Some(route);
            }
        }
        let mouse_pool: Arc<Mutex<dyn DeviceBackend + Send>> = self.input.mouse.clone();
        if !detection.has_device("Mouse") {
            detection.add_device(mouse().with_backend(DeviceHandle::pooled(mouse_pool)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::InputManager;

    fn setup() -> (InputManager, RawInput) {
        let input = RawInput::new();
        let mut m = InputManager::new();
        m.add_provider(RawInputProvider::new(input.clone()));
        assert_eq!(m.detect_devices(false), 2);
        (m, input)
    }

    #[test]
    fn key_make_and_break() {
        let (mut m, input) = setup();
        let kb = m.controller_id("Keyboard").unwrap();
        input.keyboard_packet(RawKeyboardPacket {
            vkey: 0x41,
            is_break: false,
        });
        m.update();
        assert!(m.controller(kb).unwrap().control("A").unwrap().is_pressed());
        assert_eq!(m.take_char(kb), Some('a'));

        input.keyboard_packet(RawKeyboardPacket {
            vkey: 0x41,
            is_break: true,
        });
        input.keyboard_packet(RawKeyboardPacket {
            vkey: 0xFF,
            is_break: false,
        });
        m.update();
        assert!(!m.controller(kb).unwrap().control("A").unwrap().is_pressed());
    }

    #[test]
    fn extended_keys_are_routed() {
        let (mut m, input) = setup();
        let kb = m.controller_id("Keyboard").unwrap();
        for vkey in [0xA0, 0x87, 0xB3, 0xE2] {
            input.keyboard_packet(RawKeyboardPacket {
                vkey,
                is_break: false,
            });
        }
        m.update();
        let c = m.controller(kb).unwrap();
        for name in ["LeftShift", "F24", "MediaPlayPause", "OEM102"] {
            assert!(c.control(name).unwrap().is_pressed(), "{name}");
        }
    }

    #[test]
    fn mouse_movement_accumulates_and_resets() {
        let (mut m, input) = setup();
        let mouse = m.controller_id("Mouse").unwrap();
        input.mouse_packet(RawMousePacket {
            dx: 3,
            dy: -2,
            ..Default::default()
        });
        input.mouse_packet(RawMousePacket {
            dx: 4,
            button_flags: RI_MOUSE_BUTTON_1_DOWN | RI_MOUSE_WHEEL,
            button_data: (-120i16) as u16,
            ..Default::default()
        });
        m.update();
        let c = m.controller(mouse).unwrap();
        assert_eq!(c.control("X").unwrap().axis_value(), 7.0);
        assert_eq!(c.control("Y").unwrap().axis_value(), -2.0);
        assert_eq!(c.control("Wheel").unwrap().axis_value(), -120.0);
        assert!(c.control("Left").unwrap().is_pressed());

        m.update();
        let c = m.controller(mouse).unwrap();
        assert_eq!(c.control("X").unwrap().axis_value(), 0.0);
        assert_eq!(c.control("Wheel").unwrap().axis_value(), 0.0);
        assert!(c.control("Left").unwrap().is_pressed());
    }

    #[test]
    fn absolute_positions_become_deltas() {
        let (mut m, input) = setup();
        let mouse = m.controller_id("Mouse").unwrap();
        for x in [100, 110] {
            input.mouse_packet(RawMousePacket {
                dx: x,
                absolute: true,
                ..Default::default()
            });
        }
        m.update();
        assert_eq!(m.controller(mouse).unwrap().control("X").unwrap().axis_value(), 110.0);
        input.mouse_packet(RawMousePacket {
            dx: 105,
            absolute: true,
            ..Default::default()
        });
        m.update();
        assert_eq!(m.controller(mouse).unwrap().control("X").unwrap().axis_value(), -5.0);
    }

    #[test]
    fn extreme_absolute_positions_do_not_overflow() {
        let mut raw = RawMouse::default();
        for x in [i32::MIN, i32::MAX] {
            raw.push(RawMousePacket {
                dx: x,
                absolute: true,
                ..Default::default()
            });
        }
        assert_eq!(raw.old_x, i32::MAX);
        assert!(raw.x.is_finite());
    }
}
