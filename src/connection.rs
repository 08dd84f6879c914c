//! Directed value pipes between two controls.
//!
//! A connection links an *input* control (on any controller) to an *output* control
//! on a virtual controller. Validity is decided once, at construction:
//! - both endpoints exist and are distinct,
//! - both are of the same class (both producers or both sinks),
//! - the output side is not owned by a device controller.
//!
//! Values move one hop at a time. Buttons and axes flow forward (input → output),
//! LEDs and effects flow backward (output → input), so a virtual controller can both
//! mirror device input and drive device outputs through the same link.

use crate::control::{Control, ControlId, ControlKind, ControlValue};
use crate::controller::ControllerKind;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub(crate) u32);

/// Why a connection request was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("input control does not exist")]
    MissingInput,

    #[error("output control `{0}` does not exist")]
    MissingOutput(String),

    #[error("a control cannot be connected to itself")]
    SameControl,

    #[error("cannot connect a {input:?} control to a {output:?} control")]
    ClassMismatch {
        input: ControlKind,
        output: ControlKind,
    },

    #[error("output control `{0}` belongs to a device controller")]
    DeviceSink(String),
}

/// One side of a connection request, as resolved by the manager.
pub(crate) struct Endpoint<'a> {
    pub id: ControlId,
    pub control: &'a Control,
    pub owner: ControllerKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    id: ConnectionId,
    input: ControlId,
    output: ControlId,
    scale: f32,
}

impl Connection {
    pub(crate) fn validated(
        id: ConnectionId,
        input: Endpoint<'_>,
        output: Endpoint<'_>,
        scale: f32,
    ) -> Result<Self, ConnectError> {
        if input.id == output.id {
            return Err(ConnectError::SameControl);
        }
        if input.control.is_input_control() != output.control.is_input_control() {
            return Err(ConnectError::ClassMismatch {
                input: input.control.kind(),
                output: output.control.kind(),
            });
        }
        if output.owner == ControllerKind::Device {
            return Err(ConnectError::DeviceSink(output.control.name().to_string()));
        }
        Ok(Self {
            id,
            input: input.id,
            output: output.id,
            scale,
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn input(&self) -> ControlId {
        self.input
    }

    pub fn output(&self) -> ControlId {
        self.output
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Value the output side receives when the input side changed to `source`.
    ///
    /// Buttons copy the pressed state. Axes are scaled and keep their relative flag;
    /// a scale of exactly `1.0` passes the source value through untouched.
    pub fn pass_value(&self, source: ControlValue) -> Option<ControlValue> {
        match source {
            ControlValue::Button(pressed) => Some(ControlValue::Button(pressed)),
            ControlValue::Axis { value, relative } => {
                let value = if self.scale == 1.0 {
                    value
                } else {
                    value * self.scale
                };
                Some(ControlValue::Axis { value, relative })
            }
            ControlValue::Led(_) | ControlValue::Effect(_) => None,
        }
    }

    /// Value the input side receives when the output side changed to `source`.
    ///
    /// Only LEDs and effects travel backward, unscaled.
    pub fn pass_value_backwards(&self, source: ControlValue) -> Option<ControlValue> {
        match source {
            ControlValue::Led(bits) => Some(ControlValue::Led(bits)),
            ControlValue::Effect(value) => Some(ControlValue::Effect(value)),
            ControlValue::Button(_) | ControlValue::Axis { .. } => None,
        }
    }
}
