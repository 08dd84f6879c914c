//! Controller notifications.
//!
//! Every dispatched control change produces one [`ControllerEventKind::ControlChanged`];
//! toggling a virtual controller produces one [`ControllerEventKind::ActivationChanged`].
//! Events are delivered synchronously on the update thread through the
//! [`ControllerEventBus`](crate::eventbus::ControllerEventBus).

use crate::control::{ControlId, ControlValue};
use crate::controller::ControllerId;
use std::time::Instant;

#[derive(Clone, Debug, PartialEq)]
pub enum ControllerEventKind {
    /// A control's value changed and was dispatched.
    ControlChanged {
        control: ControlId,
        /// Control name, as registered on its controller.
        name: String,
        value: ControlValue,
    },

    /// A virtual controller was switched on or off.
    ActivationChanged { active: bool },
}

/// Timestamped notification.
#[derive(Clone, Debug)]
pub struct ControllerEvent {
    /// Dispatch time (monotonic).
    pub at: Instant,
    pub controller: ControllerId,
    pub controller_name: String,
    pub kind: ControllerEventKind,
}

impl ControllerEvent {
    pub(crate) fn control_changed(
        control: ControlId,
        controller_name: &str,
        name: &str,
        value: ControlValue,
    ) -> Self {
        Self {
            at: Instant::now(),
            controller: control.controller(),
            controller_name: controller_name.to_string(),
            kind: ControllerEventKind::ControlChanged {
                control,
                name: name.to_string(),
                value,
            },
        }
    }

    pub(crate) fn activation_changed(
        controller: ControllerId,
        controller_name: &str,
        active: bool,
    ) -> Self {
        Self {
            at: Instant::now(),
            controller,
            controller_name: controller_name.to_string(),
            kind: ControllerEventKind::ActivationChanged { active },
        }
    }

    /// Name of the changed control, for `ControlChanged` events.
    pub fn control_name(&self) -> Option<&str> {
        match &self.kind {
            ControllerEventKind::ControlChanged { name, .. } => Some(name),
            ControllerEventKind::ActivationChanged { .. } => None,
        }
    }
}
