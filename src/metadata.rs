//! Device metadata.
//!
//! [`DeviceMeta`] is a cloneable description of the hardware behind a device
//! controller, for UI display, logging and persistence. Providers fill in what they
//! know; unknown fields remain `None`.
//!
//! `vid`/`pid` and `serial_number` are the stable identity; `path` is a platform
//! path useful for diagnostics that may change across reconnects.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// Bus hint such as `"usb"`, `"bluetooth"` or `"rawinput"`.
    pub bus: Option<String>,

    pub vid: Option<u16>,

    pub pid: Option<u16>,

    /// Friendly product name reported by the device.
    pub product_string: Option<String>,

    pub manufacturer_string: Option<String>,

    pub serial_number: Option<String>,

    /// Some stacks use `-1` for "not applicable".
    pub interface_number: Option<i32>,

    /// Top-level HID usage page (e.g. `0x01` Generic Desktop).
    pub usage_page: Option<u16>,

    /// Top-level HID usage (e.g. `0x04` Joystick, `0x05` Gamepad).
    pub usage: Option<u16>,

    /// Opaque platform path.
    pub path: Option<String>,
}

impl DeviceMeta {
    /// Best display name: product string, else `vid:pid`, else `fallback`.
    pub fn display_name(&self, fallback: &str) -> String {
        match (&self.product_string, self.vid, self.pid) {
            (Some(p), _, _) if !p.trim().is_empty() => p.trim().to_string(),
            (_, Some(vid), Some(pid)) => format!("{vid:04x}:{pid:04x}"),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_fallbacks() {
        let mut meta = DeviceMeta {
            vid: Some(0x046d),
            pid: Some(0xc626),
            ..Default::default()
        };
        assert_eq!(meta.display_name("Joystick"), "046d:c626");
        meta.product_string = Some(" SpaceNavigator ".into());
        assert_eq!(meta.display_name("Joystick"), "SpaceNavigator");
        assert_eq!(DeviceMeta::default().display_name("Joystick"), "Joystick");
    }
}
