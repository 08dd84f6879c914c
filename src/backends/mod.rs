//! Device backends and providers.
//!
//! # Feature flags
//! - **`hid`**: hidapi discovery ([`hid::HidProvider`]) and report I/O.
//! - **`debug-log`**: trace every raw HID report.
//!
//! Everything else is platform independent: the joystick backend runs over any
//! [`ReportSource`](crate::device::ReportSource), raw keyboard/mouse packets come from
//! whatever layer the host application owns.

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;
pub mod hid_joystick;
pub mod mock;
pub mod raw_input;
pub mod scripted;

pub use hid_joystick::{joystick_for, HidJoystick};
pub use mock::MockReportSource;
pub use raw_input::{RawInput, RawInputProvider, RawKeyboardPacket, RawMousePacket};
pub use scripted::{ScriptHandle, ScriptedDevice};
