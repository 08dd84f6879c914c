//! Per-frame snapshot of controller states.
//!
//! [`Snapshot`] is an **owned**, read-only view of every controller's buttons and
//! axes at a point in time (typically "this frame"), produced by
//! [`InputManager::snapshot`](crate::manager::InputManager::snapshot). It is cheap
//! to clone for fan-out to multiple consumers.
//!
//! # Semantics
//! - Keys are controller names.
//! - LEDs and effects are not included.
//! - A snapshot does **not** poll anything; call `update()` first and take a new one.
//!
//! # Example
//! ```no_run
//! use inputlink::Snapshot;
//!
//! fn print_axes(snap: &Snapshot) {
//!     for (name, state) in snap.iter() {
//!         println!("{name}: X={:.2} Y={:.2} fire={}",
//!                  state.get_axis("X"), state.get_axis("Y"), state.get_button("Button0"));
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Axis and button values of one controller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    pub axes: HashMap<String, f32>,
    pub buttons: HashMap<String, bool>,
}

impl ControllerState {
    /// Value of a named axis (0.0 if missing).
    pub fn get_axis(&self, name: &str) -> f32 {
        self.axes.get(name).copied().unwrap_or(0.0)
    }

    /// State of a named button (false if missing).
    pub fn get_button(&self, name: &str) -> bool {
        self.buttons.get(name).copied().unwrap_or(false)
    }
}

/// Owned snapshot (`controller name → ControllerState`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot(pub HashMap<String, ControllerState>);

impl Snapshot {
    #[inline]
    pub fn get(&self, controller: &str) -> Option<&ControllerState> {
        self.0.get(controller)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ControllerState)> {
        self.0.iter()
    }

    #[inline]
    pub fn into_inner(self) -> HashMap<String, ControllerState> {
        self.0
    }
}
