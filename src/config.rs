//! Runtime configuration.
//!
//! ```toml
//! [joystick]
//! threshold = 0.002
//! deadzone = 0.05
//!
//! [hid]
//! max_reports_per_tick = 32
//! usage_pages = [0x01, 0x02, 0x0F]
//!
//! [[profiles]]
//! name = "flight"
//! bindings = [
//!     { control = "RotX", device = { Contains = "Joystick" }, source = "Y", scale = 4.0 },
//! ]
//! ```
//!
//! Every section is optional. Unknown keys are rejected.

use crate::binding::BindingProfile;
use crate::error::{InputError, InputResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub joystick: JoystickConfig,
    pub hid: HidConfig,
    pub profiles: Vec<BindingProfile>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JoystickConfig {
    /// Normalized axis changes smaller than this are ignored.
    pub threshold: f32,
    /// Normalized values with a smaller magnitude read as 0.
    pub deadzone: f32,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            threshold: 0.002,
            deadzone: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HidConfig {
    /// Upper bound of reports drained per device per update.
    pub max_reports_per_tick: usize,
    /// Top-level usage pages accepted during discovery.
    pub usage_pages: Vec<u16>,
    /// Accept any vendor-defined page (`0xFF00..=0xFFFF`).
    pub vendor_pages: bool,
}

impl Default for HidConfig {
    fn default() -> Self {
        Self {
            max_reports_per_tick: 32,
            usage_pages: vec![0x01, 0x02, 0x0F],
            vendor_pages: true,
        }
    }
}

impl HidConfig {
    pub fn accepts_usage_page(&self, page: u16) -> bool {
        self.usage_pages.contains(&page) || (self.vendor_pages && page >= 0xFF00)
    }
}

impl InputConfig {
    pub fn from_toml_str(s: &str) -> InputResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> InputResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> InputResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(InputError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn profile(&self, name: &str) -> Option<&BindingProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }
}
