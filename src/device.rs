//! Backend seams for device controllers.
//!
//! A device [`Controller`] carries an optional backend. The manager calls
//! [`DeviceBackend::update`] once per
//! [`InputManager::update`](crate::manager::InputManager::update)
//! (poll-based backends pull fresh state here) and
//! [`DeviceBackend::update_output_control`] whenever an LED or effect changes
//! (push the new state to hardware).
//!
//! Who owns the backend object is fixed at construction by [`DeviceHandle`]:
//! `Owned` backends die with their controller, `Pooled` backends are shared with
//! the provider that created them (e.g. a raw-input pool fed from an OS callback).

use crate::control::{Control, ControlId, ControlValue};
use crate::controller::{Controller, ControllerId};
use crate::error::InputResult;
use crate::queue::UpdateQueue;
use std::sync::{Arc, Mutex};

/// Per-device backend.
pub trait DeviceBackend {
    /// Pull fresh state into `controls`. Returns `true` if the backend delivered data.
    ///
    /// Backends that push from another thread (through an
    /// [`UpdateSender`](crate::queue::UpdateSender)) can keep the default.
    fn update(&mut self, controls: &mut DeviceControls<'_>) -> bool {
        let _ = controls;
        false
    }

    /// Push a changed LED/effect to hardware. Returns `true` on a successful write.
    fn update_output_control(&mut self, control: &Control) -> bool {
        let _ = control;
        false
    }
}

/// Raw report I/O for HID-style backends.
///
/// Reports are framed as `[report_id][data...]`; devices without report IDs use `0`.
pub trait ReportSource {
    /// Read one pending report into `buf`. `Ok(0)` means no report is available.
    fn read_report(&mut self, buf: &mut [u8]) -> InputResult<usize>;

    /// Transmit one output report.
    fn write_report(&mut self, report: &[u8]) -> InputResult<usize>;
}

/// Ownership tag for a controller's backend.
pub enum DeviceHandle {
    /// Destroyed together with the controller.
    Owned(Box<dyn DeviceBackend>),
    /// Shared with a provider-managed pool; the controller only holds a reference.
    Pooled(Arc<Mutex<dyn DeviceBackend + Send>>),
}

impl DeviceHandle {
    pub fn owned(backend: impl DeviceBackend + 'static) -> Self {
        DeviceHandle::Owned(Box::new(backend))
    }

    pub fn pooled(backend: Arc<Mutex<dyn DeviceBackend + Send>>) -> Self {
        DeviceHandle::Pooled(backend)
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, DeviceHandle::Owned(_))
    }

    pub(crate) fn update(&mut self, controls: &mut DeviceControls<'_>) -> bool {
        match self {
            DeviceHandle::Owned(backend) => backend.update(controls),
            DeviceHandle::Pooled(backend) => backend
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .update(controls),
        }
    }

    pub(crate) fn update_output_control(&mut self, control: &Control) -> bool {
        match self {
            DeviceHandle::Owned(backend) => backend.update_output_control(control),
            DeviceHandle::Pooled(backend) => backend
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .update_output_control(control),
        }
    }
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceHandle::Owned(_) => f.write_str("DeviceHandle::Owned"),
            DeviceHandle::Pooled(_) => f.write_str("DeviceHandle::Pooled"),
        }
    }
}

/// Write access to one device's controls during [`DeviceBackend::update`].
///
/// Every setter is guarded; a change is queued for dispatch on the same
/// `update()` call that polled the backend.
pub struct DeviceControls<'a> {
    id: ControllerId,
    controller: &'a mut Controller,
    queue: &'a UpdateQueue,
}

impl<'a> DeviceControls<'a> {
    pub(crate) fn new(
        id: ControllerId,
        controller: &'a mut Controller,
        queue: &'a UpdateQueue,
    ) -> Self {
        Self {
            id,
            controller,
            queue,
        }
    }

    pub fn controller_id(&self) -> ControllerId {
        self.id
    }

    pub fn controller_name(&self) -> &str {
        self.controller.name()
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controller.control(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.controller.control_index(name)
    }

    /// Guarded write by control index.
    pub fn set_at(&mut self, index: usize, value: ControlValue) -> bool {
        let changed = self
            .controller
            .control_at_mut(index)
            .is_some_and(|control| control.apply(value));
        if changed {
            self.queue.mark_changed(ControlId::new(self.id, index));
        }
        changed
    }

    /// Guarded write by control name. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: ControlValue) -> bool {
        match self.controller.control_index(name) {
            Some(index) => self.set_at(index, value),
            None => false,
        }
    }

    pub fn set_pressed(&mut self, name: &str, pressed: bool) -> bool {
        self.set(name, ControlValue::Button(pressed))
    }

    pub fn set_axis(&mut self, name: &str, value: f32, relative: bool) -> bool {
        self.set(name, ControlValue::Axis { value, relative })
    }

    pub fn set_led(&mut self, name: &str, bits: u32) -> bool {
        self.set(name, ControlValue::Led(bits))
    }

    pub fn set_effect(&mut self, name: &str, value: f32) -> bool {
        self.set(name, ControlValue::Effect(value))
    }
}
