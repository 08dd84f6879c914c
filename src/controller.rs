//! Controllers: ordered, name-indexed aggregates of [`Control`]s.
//!
//! Device controllers are created by providers and are always active. Virtual
//! controllers are created by application code, can be deactivated, and are the
//! only legal sink side of a [`Connection`](crate::connection::Connection).

use crate::connection::ConnectionId;
use crate::control::Control;
use crate::device::{DeviceControls, DeviceHandle};
use crate::metadata::DeviceMeta;
use crate::queue::UpdateQueue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identity handed out by the [`InputManager`](crate::manager::InputManager).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub(crate) u32);

impl std::fmt::Display for ControllerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "controller#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerKind {
    /// Backed by real (or emulated) hardware. Always active.
    Device,
    /// Application-defined, fed through connections.
    Virtual,
}

#[derive(Debug)]
pub struct Controller {
    kind: ControllerKind,
    name: String,
    description: String,
    active: bool,
    controls: Vec<Control>,
    by_name: HashMap<String, usize>,
    connections: Vec<ConnectionId>,
    changed: bool,
    pending_char: Option<char>,
    backend: Option<DeviceHandle>,
    meta: Option<DeviceMeta>,
    provider: Option<String>,
}

impl Controller {
    fn with_kind(kind: ControllerKind, name: &str, description: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            description: description.to_string(),
            active: true,
            controls: Vec::new(),
            by_name: HashMap::new(),
            connections: Vec::new(),
            changed: false,
            pending_char: None,
            backend: None,
            meta: None,
            provider: None,
        }
    }

    pub fn device(name: &str, description: &str) -> Self {
        Self::with_kind(ControllerKind::Device, name, description)
    }

    pub fn virtual_controller(name: &str, description: &str) -> Self {
        Self::with_kind(ControllerKind::Virtual, name, description)
    }

    /// Attach the backend that feeds this device.
    pub fn with_backend(mut self, backend: DeviceHandle) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_meta(mut self, meta: DeviceMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Builder form of [`add_control`](Self::add_control).
    pub fn with_control(mut self, control: Control) -> Self {
        self.add_control(control);
        self
    }

    /// Append a control and return its index.
    ///
    /// Names are expected to be unique per controller. A duplicate is still appended,
    /// but name lookup keeps resolving to the first control registered under that name.
    pub fn add_control(&mut self, control: Control) -> usize {
        let index = self.controls.len();
        self.by_name
            .entry(control.name().to_string())
            .or_insert(index);
        self.controls.push(control);
        index
    }

    pub fn kind(&self) -> ControllerKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn meta(&self) -> Option<&DeviceMeta> {
        self.meta.as_ref()
    }

    /// Name of the provider that detected this device, if any.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.by_name.get(name).and_then(|&i| self.controls.get(i))
    }

    pub fn control_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn control_at(&self, index: usize) -> Option<&Control> {
        self.controls.get(index)
    }

    /// Controls in insertion order.
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Connections this controller takes part in, on either side.
    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    /// Returns and clears the changed flag.
    pub fn has_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Character of the last key hit, consumed by this call.
    pub fn take_char(&mut self) -> Option<char> {
        self.pending_char.take()
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub(crate) fn control_at_mut(&mut self, index: usize) -> Option<&mut Control> {
        self.controls.get_mut(index)
    }

    /// Device controllers ignore deactivation. Returns `true` if the flag flipped.
    pub(crate) fn set_active(&mut self, active: bool) -> bool {
        if self.kind == ControllerKind::Device || self.active == active {
            return false;
        }
        self.active = active;
        true
    }

    pub(crate) fn set_provider(&mut self, provider: &str) {
        self.provider = Some(provider.to_string());
    }

    pub(crate) fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Consume the hit flag of the button at `index` and remember its character.
    pub(crate) fn capture_char(&mut self, index: usize) {
        if let Some(control) = self.controls.get_mut(index) {
            if control.take_hit() {
                if let Some(c) = control.character() {
                    self.pending_char = Some(c);
                }
            }
        }
    }

    pub(crate) fn add_connection(&mut self, connection: ConnectionId) {
        if !self.connections.contains(&connection) {
            self.connections.push(connection);
        }
    }

    pub(crate) fn remove_connection(&mut self, connection: ConnectionId) {
        self.connections.retain(|c| *c != connection);
    }

    pub(crate) fn take_connections(&mut self) -> Vec<ConnectionId> {
        std::mem::take(&mut self.connections)
    }

    /// Hand the output control at `index` to the backend.
    pub(crate) fn push_output(&mut self, index: usize) -> bool {
        match (self.backend.as_mut(), self.controls.get(index)) {
            (Some(backend), Some(control)) => backend.update_output_control(control),
            _ => false,
        }
    }

    /// Let the backend pull fresh state. Changes are queued on `queue`.
    pub(crate) fn poll_backend(&mut self, id: ControllerId, queue: &UpdateQueue) -> bool {
        let Some(mut backend) = self.backend.take() else {
            return false;
        };
        let delivered = {
            let mut controls = DeviceControls::new(id, self, queue);
            backend.update(&mut controls)
        };
        self.backend = Some(backend);
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_and_insertion_order() {
        let mut c = Controller::device("Keyboard", "Keyboard input controller");
        c.add_control(Control::key("A", "A", 'a'));
        c.add_control(Control::key("B", "B", 'b'));
        assert_eq!(c.control_index("B"), Some(1));
        assert_eq!(c.control("A").map(|c| c.name()), Some("A"));
        assert!(c.control("C").is_none());
        let names: Vec<_> = c.controls().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn duplicate_name_keeps_first_for_lookup() {
        let mut c = Controller::virtual_controller("V", "");
        c.add_control(Control::button("Left", "first"));
        c.add_control(Control::button("Left", "second"));
        assert_eq!(c.controls().len(), 2);
        assert_eq!(c.control("Left").map(|c| c.description()), Some("first"));
    }

    #[test]
    fn changed_flag_is_consumed() {
        let mut c = Controller::device("Mouse", "");
        assert!(!c.has_changed());
        c.mark_changed();
        assert!(c.has_changed());
        assert!(!c.has_changed());
    }

    #[test]
    fn device_controllers_stay_active() {
        let mut d = Controller::device("Mouse", "");
        assert!(!d.set_active(false));
        assert!(d.is_active());

        let mut v = Controller::virtual_controller("V", "");
        assert!(v.set_active(false));
        assert!(!v.set_active(false));
        assert!(!v.is_active());
    }

    #[test]
    fn char_captured_only_on_hit() {
        let mut c = Controller::device("Keyboard", "");
        let a = c.add_control(Control::key("A", "A", 'a'));
        c.capture_char(a);
        assert_eq!(c.take_char(), None);

        if let Some(k) = c.control_at_mut(a) {
            k.set_pressed(true);
        }
        c.capture_char(a);
        assert_eq!(c.take_char(), Some('a'));
        assert_eq!(c.take_char(), None);
    }
}
