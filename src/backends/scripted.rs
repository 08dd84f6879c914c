//! A device fed programmatically.
//!
//! [`ScriptedDevice`] is the backend, [`ScriptHandle`] the feeding side. Writes made
//! through the handle are applied on the next update, in order; output controls the
//! graph pushes to the device are recorded for inspection. Useful for tests, demos
//! and touch-to-controller emulation.

use crate::control::{Control, ControlValue};
use crate::device::{DeviceBackend, DeviceControls};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Script {
    writes: Vec<(String, ControlValue)>,
    outputs: Vec<(String, ControlValue)>,
}

#[derive(Debug, Default)]
pub struct ScriptedDevice {
    script: Arc<Mutex<Script>>,
}

/// Cloneable feeding side of a [`ScriptedDevice`].
#[derive(Clone, Debug)]
pub struct ScriptHandle {
    script: Arc<Mutex<Script>>,
}

impl ScriptedDevice {
    /// A backend and the handle that feeds it.
    pub fn new() -> (Self, ScriptHandle) {
        let device = Self::default();
        let handle = ScriptHandle {
            script: Arc::clone(&device.script),
        };
        (device, handle)
    }
}

impl ScriptHandle {
    pub fn feed(&self, control: &str, value: ControlValue) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .writes
            .push((control.to_string(), value));
    }

    pub fn press(&self, control: &str) {
        self.feed(control, ControlValue::Button(true));
    }

    pub fn release(&self, control: &str) {
        self.feed(control, ControlValue::Button(false));
    }

    pub fn set_axis(&self, control: &str, value: f32) {
        self.feed(
            control,
            ControlValue::Axis {
                value,
                relative: false,
            },
        );
    }

    /// LED and effect changes pushed to the device since the last call.
    pub fn take_outputs(&self) -> Vec<(String, ControlValue)> {
        std::mem::take(&mut self.script.lock().unwrap_or_else(|e| e.into_inner()).outputs)
    }
}

impl DeviceBackend for ScriptedDevice {
    fn update(&mut self, controls: &mut DeviceControls<'_>) -> bool {
        let writes = {
            let mut script = self.script.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut script.writes)
        };
        let delivered = !writes.is_empty();
        for (name, value) in writes {
            controls.set(&name, value);
        }
        delivered
    }

    fn update_output_control(&mut self, control: &Control) -> bool {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .outputs
            .push((control.name().to_string(), control.value()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Controller;
    use crate::device::DeviceHandle;
    use crate::manager::InputManager;

    #[test]
    fn feeds_inputs_and_records_outputs() {
        let (device, handle) = ScriptedDevice::new();
        let mut m = InputManager::new();
        let id = m
            .add_controller(
                Controller::device("Pad", "scripted")
                    .with_control(Control::button("A", "A"))
                    .with_control(Control::axis("X", "X"))
                    .with_control(Control::led("LEDs", "LEDs"))
                    .with_backend(DeviceHandle::owned(device)),
            )
            .unwrap();

        handle.press("A");
        handle.set_axis("X", 0.5);
        handle.press("Missing");
        assert_eq!(m.update(), 2);
        let pad = m.controller(id).unwrap();
        assert!(pad.control("A").unwrap().is_pressed());
        assert_eq!(pad.control("X").unwrap().axis_value(), 0.5);

        let leds = m.control_id(id, "LEDs").unwrap();
        m.set_led(leds, 3);
        m.update();
        assert_eq!(handle.take_outputs(), vec![("LEDs".to_string(), ControlValue::Led(3))]);
        assert!(handle.take_outputs().is_empty());
    }
}
