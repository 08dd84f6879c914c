//! Generic HID report model.
//!
//! A device is described by capability tables ([`HidCapability`]) that say where each
//! field lives inside a report. Decoding demultiplexes report bits into per-capability
//! raw integers; scaling and naming are left to the backend that consumes them.
//!
//! Reports are framed as `[report_id][data...]`. Devices without report IDs use ID 0.

pub mod capability;
pub mod descriptor;
pub mod device;
pub mod usage;

pub use capability::HidCapability;
pub use descriptor::{parse_report_descriptor, Capabilities};
pub use device::HidDevice;

/// One encoded output report, ready for transmission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputReport {
    pub report_id: u8,
    /// Full buffer, `data[0] == report_id`.
    pub data: Vec<u8>,
}

/// Report decode/encode for a device with capability tables.
pub trait ReportDecodable {
    /// Decode one input report into the capabilities' live values.
    ///
    /// Capabilities of other report IDs are left untouched; fields that do not fit a
    /// short buffer keep their previous value.
    fn parse(&mut self, report: &[u8]);

    /// Encode the current output values, one report per report ID, in the order the
    /// IDs first appear among the output capabilities.
    fn build_output_reports(&self) -> Vec<OutputReport>;
}
