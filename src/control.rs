//! Controls: the named, typed leaf values owned by a [`Controller`](crate::controller::Controller).
//!
//! A control is one of four kinds:
//! - **Button** and **Axis** are *inputs* (producers of state).
//! - **LED** and **Effect** are *outputs* (sinks that a backend pushes to hardware).
//!
//! Controls are never mutated directly by application code. Writes go through
//! [`InputManager`](crate::manager::InputManager), a backend's
//! [`DeviceControls`](crate::device::DeviceControls), or an
//! [`UpdateSender`](crate::queue::UpdateSender). Every write is guarded: writing the
//! value a control already holds is a no-op and never reaches change dispatch.

use crate::controller::ControllerId;
use serde::{Deserialize, Serialize};

/// Kind of a control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    Button,
    Axis,
    Led,
    Effect,
}

impl ControlKind {
    /// `true` for producers (Button, Axis), `false` for sinks (LED, Effect).
    #[inline]
    pub fn is_input(self) -> bool {
        matches!(self, ControlKind::Button | ControlKind::Axis)
    }
}

/// Stable address of a control: owning controller plus insertion index.
///
/// Controls are append-only within a controller, so an index never shifts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId {
    controller: ControllerId,
    index: usize,
}

impl ControlId {
    pub(crate) fn new(controller: ControllerId, index: usize) -> Self {
        Self { controller, index }
    }

    /// Controller that owns this control.
    pub fn controller(&self) -> ControllerId {
        self.controller
    }

    /// Position of the control in its controller's ordered list.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A value carried by a control write or a change notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlValue {
    Button(bool),
    Axis { value: f32, relative: bool },
    Led(u32),
    Effect(f32),
}

impl ControlValue {
    /// Kind of control this value can be written to.
    pub fn kind(&self) -> ControlKind {
        match self {
            ControlValue::Button(_) => ControlKind::Button,
            ControlValue::Axis { .. } => ControlKind::Axis,
            ControlValue::Led(_) => ControlKind::Led,
            ControlValue::Effect(_) => ControlKind::Effect,
        }
    }
}

#[derive(Clone, Debug)]
enum ControlState {
    Button {
        pressed: bool,
        hit: bool,
        character: Option<char>,
    },
    Axis {
        value: f32,
        relative: bool,
    },
    Led {
        bits: u32,
    },
    Effect {
        value: f32,
    },
}

/// A named, typed control.
#[derive(Clone, Debug)]
pub struct Control {
    name: String,
    description: String,
    state: ControlState,
}

impl Control {
    fn with_state(name: &str, description: &str, state: ControlState) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            state,
        }
    }

    /// A button without an associated character.
    pub fn button(name: &str, description: &str) -> Self {
        Self::with_state(
            name,
            description,
            ControlState::Button {
                pressed: false,
                hit: false,
                character: None,
            },
        )
    }

    /// A button that yields `character` through
    /// [`Controller::take_char`](crate::controller::Controller::take_char) when hit.
    ///
    /// `'\0'` means "no character".
    pub fn key(name: &str, description: &str, character: char) -> Self {
        Self::with_state(
            name,
            description,
            ControlState::Button {
                pressed: false,
                hit: false,
                character: (character != '\0').then_some(character),
            },
        )
    }

    /// An absolute axis (joystick position, sensor reading).
    pub fn axis(name: &str, description: &str) -> Self {
        Self::with_state(
            name,
            description,
            ControlState::Axis {
                value: 0.0,
                relative: false,
            },
        )
    }

    /// A delta-style axis (mouse movement, wheel).
    pub fn relative_axis(name: &str, description: &str) -> Self {
        Self::with_state(
            name,
            description,
            ControlState::Axis {
                value: 0.0,
                relative: true,
            },
        )
    }

    /// A 32-bit LED bitfield.
    pub fn led(name: &str, description: &str) -> Self {
        Self::with_state(name, description, ControlState::Led { bits: 0 })
    }

    /// A force-feedback effect intensity (conventionally `0.0..=1.0`).
    pub fn effect(name: &str, description: &str) -> Self {
        Self::with_state(name, description, ControlState::Effect { value: 0.0 })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ControlKind {
        match self.state {
            ControlState::Button { .. } => ControlKind::Button,
            ControlState::Axis { .. } => ControlKind::Axis,
            ControlState::Led { .. } => ControlKind::Led,
            ControlState::Effect { .. } => ControlKind::Effect,
        }
    }

    /// Buttons and axes are inputs; LEDs and effects are outputs.
    #[inline]
    pub fn is_input_control(&self) -> bool {
        self.kind().is_input()
    }

    /// Current value.
    pub fn value(&self) -> ControlValue {
        match self.state {
            ControlState::Button { pressed, .. } => ControlValue::Button(pressed),
            ControlState::Axis { value, relative } => ControlValue::Axis { value, relative },
            ControlState::Led { bits } => ControlValue::Led(bits),
            ControlState::Effect { value } => ControlValue::Effect(value),
        }
    }

    /// Pressed state (`false` for non-buttons).
    pub fn is_pressed(&self) -> bool {
        matches!(self.state, ControlState::Button { pressed: true, .. })
    }

    /// `true` if the button went down since the hit flag was last taken.
    ///
    /// Dispatch consumes the flag for character capture, so on a control owned by a
    /// manager this reads `false` after [`InputManager::update`]. Key presses are
    /// observed through [`InputManager::take_char`] instead.
    ///
    /// [`InputManager::update`]: crate::manager::InputManager::update
    /// [`InputManager::take_char`]: crate::manager::InputManager::take_char
    pub fn is_hit(&self) -> bool {
        matches!(self.state, ControlState::Button { hit: true, .. })
    }

    /// Returns and clears the hit flag.
    pub(crate) fn take_hit(&mut self) -> bool {
        match &mut self.state {
            ControlState::Button { hit, .. } => std::mem::take(hit),
            _ => false,
        }
    }

    /// Character associated with a key button.
    pub fn character(&self) -> Option<char> {
        match self.state {
            ControlState::Button { character, .. } => character,
            _ => None,
        }
    }

    /// Axis value (`0.0` for non-axes).
    pub fn axis_value(&self) -> f32 {
        match self.state {
            ControlState::Axis { value, .. } => value,
            _ => 0.0,
        }
    }

    pub fn is_relative(&self) -> bool {
        matches!(self.state, ControlState::Axis { relative: true, .. })
    }

    /// LED bitfield (`0` for non-LEDs).
    pub fn led_bits(&self) -> u32 {
        match self.state {
            ControlState::Led { bits } => bits,
            _ => 0,
        }
    }

    /// Effect intensity (`0.0` for non-effects).
    pub fn effect_value(&self) -> f32 {
        match self.state {
            ControlState::Effect { value } => value,
            _ => 0.0,
        }
    }

    pub(crate) fn set_pressed(&mut self, pressed: bool) -> bool {
        match &mut self.state {
            ControlState::Button {
                pressed: current,
                hit,
                ..
            } if *current != pressed => {
                *current = pressed;
                if pressed {
                    *hit = true;
                }
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_axis(&mut self, value: f32, relative: bool) -> bool {
        match &mut self.state {
            ControlState::Axis {
                value: current,
                relative: current_relative,
            } if float_changed(*current, value) || *current_relative != relative => {
                *current = value;
                *current_relative = relative;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_led(&mut self, bits: u32) -> bool {
        match &mut self.state {
            ControlState::Led { bits: current } if *current != bits => {
                *current = bits;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_effect(&mut self, value: f32) -> bool {
        match &mut self.state {
            ControlState::Effect { value: current } if float_changed(*current, value) => {
                *current = value;
                true
            }
            _ => false,
        }
    }

    /// Guarded write. Returns `true` only if the stored value changed.
    ///
    /// A value of a different kind than the control is ignored.
    pub(crate) fn apply(&mut self, value: ControlValue) -> bool {
        match value {
            ControlValue::Button(pressed) => self.set_pressed(pressed),
            ControlValue::Axis { value, relative } => self.set_axis(value, relative),
            ControlValue::Led(bits) => self.set_led(bits),
            ControlValue::Effect(value) => self.set_effect(value),
        }
    }
}

/// NaN compares unequal to itself; writing NaN over NaN is not a change.
fn float_changed(current: f32, new: f32) -> bool {
    current != new && !(current.is_nan() && new.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_class_follows_kind() {
        assert!(Control::button("A", "").is_input_control());
        assert!(Control::axis("X", "").is_input_control());
        assert!(!Control::led("LEDs", "").is_input_control());
        assert!(!Control::effect("Rumble1", "").is_input_control());
    }

    #[test]
    fn writing_current_state_is_a_noop() {
        let mut b = Control::button("A", "");
        assert!(!b.set_pressed(false));
        assert!(b.set_pressed(true));
        assert!(!b.set_pressed(true));

        let mut x = Control::axis("X", "");
        assert!(!x.set_axis(0.0, false));
        assert!(x.set_axis(0.5, false));
        assert!(!x.set_axis(0.5, false));
        // flipping the relative flag alone is a change
        assert!(x.set_axis(0.5, true));
    }

    #[test]
    fn press_sets_hit_until_taken() {
        let mut b = Control::key("A", "A", 'a');
        b.set_pressed(true);
        assert!(b.is_hit());
        b.set_pressed(false);
        assert!(b.is_hit());
        assert!(b.take_hit());
        assert!(!b.is_hit());
        assert_eq!(b.character(), Some('a'));
    }

    #[test]
    fn nul_character_means_none() {
        assert_eq!(Control::key("Shift", "Shift", '\0').character(), None);
    }

    #[test]
    fn mismatched_value_kind_is_ignored() {
        let mut led = Control::led("LEDs", "");
        assert!(!led.apply(ControlValue::Button(true)));
        assert!(led.apply(ControlValue::Led(0b101)));
        assert_eq!(led.led_bits(), 0b101);
        assert_eq!(led.value().kind(), ControlKind::Led);
    }

    #[test]
    fn nan_over_nan_is_not_a_change() {
        let mut x = Control::axis("X", "");
        assert!(x.set_axis(f32::NAN, false));
        assert!(!x.set_axis(f32::NAN, false));
        assert!(x.set_axis(0.5, false));

        let mut rumble = Control::effect("Rumble1", "");
        assert!(rumble.set_effect(f32::NAN));
        assert!(!rumble.set_effect(f32::NAN));
    }
}
