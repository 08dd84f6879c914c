//! hidapi discovery and report I/O (feature `hid`).
//!
//! [`HidProvider`] enumerates HID interfaces, keeps the ones that look like game
//! controls, parses their report descriptors and registers each as a joystick
//! controller named `"Joystick"`, `"Joystick2"`, ... backed by [`HidJoystick`].

use super::hid_joystick::{joystick_for, HidJoystick};
use crate::config::InputConfig;
use crate::device::{DeviceHandle, ReportSource};
use crate::error::InputResult;
use crate::hid::usage::{
    PAGE_GENERIC_DESKTOP, USAGE_GAMEPAD, USAGE_KEYBOARD, USAGE_KEYPAD, USAGE_MOUSE,
};
use crate::hid::HidDevice;
use crate::metadata::DeviceMeta;
use crate::provider::{Detection, Provider};
use hidapi::{DeviceInfo, HidApi};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

const MAX_DESCRIPTOR_LEN: usize = 4096;

/// Non-blocking report I/O on an open hidapi device.
pub struct HidApiSource {
    device: hidapi::HidDevice,
    /// Without report IDs the OS strips the ID byte; it is put back as `0`.
    report_ids: bool,
}

impl HidApiSource {
    pub fn new(device: hidapi::HidDevice, report_ids: bool) -> Self {
        if let Err(err) = device.set_blocking_mode(false) {
            debug!(%err, "could not switch hid device to non-blocking mode");
        }
        Self { device, report_ids }
    }
}

impl ReportSource for HidApiSource {
    fn read_report(&mut self, buf: &mut [u8]) -> InputResult<usize> {
        if self.report_ids {
            return Ok(self.device.read(buf)?);
        }
        let Some((id, data)) = buf.split_first_mut() else {
            return Ok(0);
        };
        *id = 0;
        match self.device.read(data)? {
            0 => Ok(0),
            n => Ok(n + 1),
        }
    }

    fn write_report(&mut self, report: &[u8]) -> InputResult<usize> {
        Ok(self.device.write(report)?)
    }
}

/// Usage-page filter plus the rejections that avoid double devices:
/// plain mice/keyboards on Generic Desktop (raw input covers those) and
/// XInput compatibility endpoints (`IG_` in the path).
fn accept_device(info: &DeviceInfo, config: &InputConfig) -> bool {
    let page = info.usage_page();
    let usage = info.usage();
    if !config.hid.accepts_usage_page(page) {
        return false;
    }
    if page == PAGE_GENERIC_DESKTOP {
        if matches!(usage, USAGE_MOUSE | USAGE_KEYBOARD | USAGE_KEYPAD) {
            return false;
        }
        if usage == USAGE_GAMEPAD && info.path().to_string_lossy().contains("IG_") {
            return false;
        }
    }
    true
}

fn meta_for(info: &DeviceInfo) -> DeviceMeta {
    DeviceMeta {
        bus: Some("usb".to_string()),
        vid: Some(info.vendor_id()),
        pid: Some(info.product_id()),
        product_string: info.product_string().map(str::to_string),
        manufacturer_string: info.manufacturer_string().map(str::to_string),
        serial_number: info.serial_number().map(str::to_string),
        interface_number: Some(info.interface_number()),
        usage_page: Some(info.usage_page()),
        usage: Some(info.usage()),
        path: Some(info.path().to_string_lossy().into_owned()),
    }
}

/// A device registered by an earlier detection pass.
struct Known {
    name: String,
    connected: Arc<AtomicBool>,
}

pub struct HidProvider {
    api: HidApi,
    config: InputConfig,
    /// Keyed by device path.
    known: HashMap<String, Known>,
}

impl HidProvider {
    pub fn new(config: InputConfig) -> InputResult<Self> {
        Ok(Self {
            api: HidApi::new()?,
            config,
            known: HashMap::new(),
        })
    }

    fn next_name(detection: &Detection<'_>) -> String {
        if !detection.has_device("Joystick") {
            return "Joystick".to_string();
        }
        (2..)
            .map(|n| format!("Joystick{n}"))
            .find(|name| !detection.has_device(name))
            .unwrap_or_default()
    }

    fn open(&self, info: &DeviceInfo) -> InputResult<(HidApiSource, HidDevice)> {
        let raw = info.open_device(&self.api)?;
        let mut descriptor = vec![0u8; MAX_DESCRIPTOR_LEN];
        let len = raw.get_report_descriptor(&mut descriptor)?;
        let device = HidDevice::try_from_descriptor(
            info.vendor_id(),
            info.product_id(),
            &descriptor[..len],
        )?;
        let report_ids = device
            .input_buttons()
            .iter()
            .chain(device.input_values())
            .chain(device.output_values())
            .any(|c| c.report_id != 0);
        Ok((HidApiSource::new(raw, report_ids), device))
    }
}

impl Provider for HidProvider {
    fn name(&self) -> &str {
        "HID"
    }

    fn detect_devices(&mut self, detection: &mut Detection<'_>) {
        if let Err(err) = self.api.refresh_devices() {
            warn!(%err, "hid device refresh failed");
        }
        // Lost devices are unregistered so an unplug/replug reopens them.
        self.known.retain(|path, known| {
            if known.connected.load(Ordering::Relaxed) {
                return detection.has_device(&known.name);
            }
            info!(controller = %known.name, %path, "hid device lost; dropping it");
            detection.remove_device(&known.name);
            false
        });

        let infos: Vec<DeviceInfo> = self
            .api
            .device_list()
            .filter(|info| accept_device(info, &self.config))
            .cloned()
            .collect();

        for info in infos {
            let path = info.path().to_string_lossy().into_owned();
            if self.known.contains_key(&path) {
                continue;
            }
            let (source, device) = match self.open(&info) {
                Ok(opened) => opened,
                Err(err) => {
                    debug!(%path, %err, "skipping hid device");
                    continue;
                }
            };

            let name = Self::next_name(detection);
            let meta = meta_for(&info);
            let joystick = HidJoystick::new(source, device)
                .with_config(self.config.joystick)
                .with_max_reports(self.config.hid.max_reports_per_tick);
            let connected = joystick.connection_flag();
            let controller = joystick_for(&name, joystick.device())
                .with_meta(meta.clone())
                .with_backend(DeviceHandle::owned(joystick));
            if detection.add_device(controller).is_some() {
                info!(
                    controller = %name,
                    product = %meta.display_name("unknown"),
                    "hid joystick registered"
                );
                self.known.insert(path, Known { name, connected });
            }
        }
    }
}
