//! Joystick backend over any [`ReportSource`] with a decoded [`HidDevice`].
//!
//! Each update drains a bounded number of input reports, decodes them into the
//! capability tables and maps the result onto the joystick controls:
//! - button usage `n` on the Button page → `Button{n-1}`
//! - value usages → the name from [`usage_name`], normalized to `[-1, 1]`
//! - hat switch → `Hat` as a slot number, `-1` when centered
//!
//! Output goes the other way: `LEDs` bits drive the LED-page output fields in order,
//! `Rumble{n}` drives the `n`-th remaining output field scaled to its logical maximum.

use crate::config::JoystickConfig;
use crate::control::{Control, ControlKind};
use crate::controller::Controller;
use crate::device::{DeviceBackend, DeviceControls, ReportSource};
use crate::devices::joystick;
use crate::hid::usage::{
    classify_hat, hat_value_to_slot, normalize_axis_value, usage_name, PAGE_BUTTON, PAGE_LED,
};
use crate::hid::{HidCapability, HidDevice, ReportDecodable};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reports drained per update unless configured otherwise.
pub const DEFAULT_MAX_REPORTS: usize = 32;

const FALLBACK_REPORT_LEN: usize = 64;

pub struct HidJoystick<S: ReportSource> {
    source: S,
    device: HidDevice,
    config: JoystickConfig,
    max_reports: usize,
    buf: Vec<u8>,
    connected: Arc<AtomicBool>,
}

impl<S: ReportSource> HidJoystick<S> {
    pub fn new(source: S, device: HidDevice) -> Self {
        let len = if device.input_report_size > 0 {
            device.input_report_size
        } else {
            FALLBACK_REPORT_LEN
        };
        Self {
            source,
            device,
            config: JoystickConfig::default(),
            max_reports: DEFAULT_MAX_REPORTS,
            buf: vec![0; len],
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn with_config(mut self, config: JoystickConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_reports(mut self, max_reports: usize) -> Self {
        self.max_reports = max_reports.max(1);
        self
    }

    pub fn device(&self) -> &HidDevice {
        &self.device
    }

    /// `false` once the source reported an error. Reads are not retried.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Shared view of [`is_connected`](Self::is_connected) that outlives the move into
    /// a controller; providers use it to reopen lost devices.
    pub fn connection_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.connected)
    }

    fn drain_reports(&mut self) -> usize {
        let mut drained = 0;
        while self.is_connected() && drained < self.max_reports {
            match self.source.read_report(&mut self.buf) {
                Ok(0) => break,
                Ok(n) => {
                    let report = &self.buf[..n.min(self.buf.len())];
                    #[cfg(feature = "debug-log")]
                    tracing::trace!(
                        vid = self.device.vendor_id,
                        pid = self.device.product_id,
                        bytes = ?report,
                        "hid report"
                    );
                    self.device.parse(report);
                    drained += 1;
                }
                Err(err) => {
                    warn!(
                        vid = self.device.vendor_id,
                        pid = self.device.product_id,
                        %err,
                        "hid read failed; device marked disconnected"
                    );
                    self.connected.store(false, Ordering::Relaxed);
                }
            }
        }
        drained
    }

    /// Deadzone first, then the change threshold against the current value.
    fn filtered_axis(&self, value: f32, current: f32) -> Option<f32> {
        let value = if value.abs() < self.config.deadzone {
            0.0
        } else {
            value
        };
        if value != 0.0 && (value - current).abs() < self.config.threshold {
            None
        } else {
            Some(value)
        }
    }

    fn publish(&self, controls: &mut DeviceControls<'_>) {
        for cap in self.device.input_buttons() {
            for usage in cap.usage_min..=cap.usage_max {
                if let Some(pressed) = cap.button(usage) {
                    controls.set_pressed(&usage_name(cap.usage_page, usage), pressed);
                }
            }
        }

        for cap in self.device.input_values() {
            if let Some(encoding) =
                classify_hat(cap.usage_page, cap.usage(), cap.logical_min, cap.logical_max)
            {
                let slot = hat_value_to_slot(
                    cap.signed_value(),
                    cap.logical_min,
                    cap.logical_max,
                    encoding,
                );
                controls.set_axis("Hat", f32::from(slot), false);
                continue;
            }

            let name = usage_name(cap.usage_page, cap.usage());
            let Some(current) = controls.control(&name).map(|c| c.axis_value()) else {
                continue;
            };
            let value = normalize_axis_value(cap.signed_value(), cap.logical_min, cap.logical_max);
            if let Some(value) = self.filtered_axis(value, current) {
                controls.set_axis(&name, value, false);
            }
        }
    }

    fn write_outputs(&mut self) -> bool {
        let mut ok = true;
        for report in self.device.build_output_reports() {
            if let Err(err) = self.source.write_report(&report.data) {
                warn!(report_id = report.report_id, %err, "hid output report failed");
                ok = false;
            }
        }
        ok
    }
}

fn set_effect_field(cap: &mut HidCapability, value: f32) {
    let scaled = (value.clamp(0.0, 1.0) * cap.logical_max as f32).round() as i32;
    cap.set_signed_value(scaled.clamp(cap.logical_min, cap.logical_max));
}

impl<S: ReportSource> DeviceBackend for HidJoystick<S> {
    fn update(&mut self, controls: &mut DeviceControls<'_>) -> bool {
        if self.drain_reports() == 0 {
            return false;
        }
        self.publish(controls);
        true
    }

    fn update_output_control(&mut self, control: &Control) -> bool {
        match control.kind() {
            ControlKind::Led if control.name() == "LEDs" => {
                let bits = control.led_bits();
                for (i, cap) in self
                    .device
                    .output_values_mut()
                    .iter_mut()
                    .filter(|c| c.usage_page == PAGE_LED)
                    .take(32)
                    .enumerate()
                {
                    cap.value = (bits >> i) & 1;
                }
            }
            ControlKind::Effect => {
                let Some(n) = control
                    .name()
                    .strip_prefix("Rumble")
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| *n > 0)
                else {
                    return false;
                };
                let Some(cap) = self
                    .device
                    .output_values_mut()
                    .iter_mut()
                    .filter(|c| c.usage_page != PAGE_LED)
                    .nth(n - 1)
                else {
                    debug!(control = control.name(), "no output field for effect");
                    return false;
                };
                set_effect_field(cap, control.effect_value());
            }
            _ => return false,
        }
        self.write_outputs()
    }
}

/// Joystick controller laid out for `device`.
///
/// Starts from the standard joystick layout, with enough `Button{n}` controls for
/// the highest button usage, and appends a control for every input usage the
/// standard layout does not cover (sliders, dials, vendor fields).
pub fn joystick_for(name: &str, device: &HidDevice) -> Controller {
    let highest_button = device
        .input_buttons()
        .iter()
        .filter(|c| c.usage_page == PAGE_BUTTON)
        .map(|c| usize::from(c.usage_max))
        .max()
        .unwrap_or(0);
    let mut controller = joystick(name, highest_button.max(device.button_count()));

    for cap in device.input_buttons() {
        for usage in cap.usage_min..=cap.usage_max {
            let control = usage_name(cap.usage_page, usage);
            if controller.control(&control).is_none() {
                controller.add_control(Control::button(&control, "HID button"));
            }
        }
    }
    for cap in device.input_values() {
        let control = usage_name(cap.usage_page, cap.usage());
        if controller.control(&control).is_none() {
            controller.add_control(Control::axis(&control, "HID value"));
        }
    }
    controller
}
