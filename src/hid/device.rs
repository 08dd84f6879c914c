//! Capability tables of one HID device and the per-report decode/encode pass.

use super::capability::{read_bits, write_bits, HidCapability, MAX_BUTTONS_PER_CAPABILITY};
use super::descriptor::{parse_report_descriptor, Capabilities};
use super::{OutputReport, ReportDecodable};
use crate::error::{InputError, InputResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HidDevice {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Top-level usage page of the application collection.
    pub usage_page: u16,
    pub usage: u16,
    /// Report lengths in bytes, report-ID byte included.
    pub input_report_size: usize,
    pub output_report_size: usize,
    pub feature_report_size: usize,
    input_buttons: Vec<HidCapability>,
    input_values: Vec<HidCapability>,
    output_values: Vec<HidCapability>,
}

impl HidDevice {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
            ..Default::default()
        }
    }

    /// Build the capability tables from a raw report descriptor.
    pub fn from_descriptor(vendor_id: u16, product_id: u16, descriptor: &[u8]) -> Self {
        Self::new(vendor_id, product_id).with_capabilities(parse_report_descriptor(descriptor))
    }

    /// Like [`from_descriptor`](Self::from_descriptor), but a descriptor that yields no
    /// input report is an error.
    pub fn try_from_descriptor(
        vendor_id: u16,
        product_id: u16,
        descriptor: &[u8],
    ) -> InputResult<Self> {
        if descriptor.is_empty() {
            return Err(InputError::Report("empty report descriptor".into()));
        }
        let device = Self::from_descriptor(vendor_id, product_id, descriptor);
        if device.input_buttons.is_empty() && device.input_values.is_empty() {
            return Err(InputError::Report(format!(
                "descriptor of {:04x}:{:04x} declares no input fields",
                vendor_id, product_id
            )));
        }
        Ok(device)
    }

    pub fn with_capabilities(mut self, caps: Capabilities) -> Self {
        self.usage_page = caps.usage_page;
        self.usage = caps.usage;
        self.input_report_size = caps.input_report_size;
        self.output_report_size = caps.output_report_size;
        self.feature_report_size = caps.feature_report_size;
        self.input_buttons = caps.input_buttons;
        self.input_values = caps.input_values;
        self.output_values = caps.output_values;
        self
    }

    pub fn with_input_button(mut self, cap: HidCapability) -> Self {
        self.input_buttons.push(cap);
        self
    }

    pub fn with_input_value(mut self, cap: HidCapability) -> Self {
        self.input_values.push(cap);
        self
    }

    pub fn with_output_value(mut self, cap: HidCapability) -> Self {
        self.output_values.push(cap);
        self
    }

    pub fn input_buttons(&self) -> &[HidCapability] {
        &self.input_buttons
    }

    pub fn input_values(&self) -> &[HidCapability] {
        &self.input_values
    }

    pub fn output_values(&self) -> &[HidCapability] {
        &self.output_values
    }

    /// Output values are the only capabilities callers write to.
    pub fn output_values_mut(&mut self) -> &mut [HidCapability] {
        &mut self.output_values
    }

    pub fn input_value(&self, usage_page: u16, usage: u16) -> Option<&HidCapability> {
        self.input_values.iter().find(|c| c.has_usage(usage_page, usage))
    }

    pub fn output_value_mut(&mut self, usage_page: u16, usage: u16) -> Option<&mut HidCapability> {
        self.output_values
            .iter_mut()
            .find(|c| c.has_usage(usage_page, usage))
    }

    /// Total number of input buttons over all button capabilities.
    pub fn button_count(&self) -> usize {
        self.input_buttons
            .iter()
            .map(|c| c.button_count() as usize)
            .sum()
    }
}

impl ReportDecodable for HidDevice {
    fn parse(&mut self, report: &[u8]) {
        let Some((&report_id, data)) = report.split_first() else {
            return;
        };

        for cap in self.input_buttons.iter_mut().filter(|c| c.report_id == report_id) {
            cap.value = 0;
            let last = cap
                .data_index_max
                .min(cap.data_index_min + MAX_BUTTONS_PER_CAPABILITY - 1);
            for bit in cap.data_index_min..=last {
                match read_bits(data, bit as usize, 1) {
                    Some(0) => {}
                    Some(_) => cap.value |= 1 << (bit - cap.data_index_min),
                    None => break,
                }
            }
        }

        for cap in self.input_values.iter_mut().filter(|c| c.report_id == report_id) {
            let bits = usize::from(cap.bit_size);
            if let Some(raw) = read_bits(data, cap.data_index_min as usize, bits) {
                cap.value = raw;
            }
        }
    }

    fn build_output_reports(&self) -> Vec<OutputReport> {
        let mut reports: Vec<OutputReport> = Vec::new();
        for cap in &self.output_values {
            let index = match reports.iter().position(|r| r.report_id == cap.report_id) {
                Some(index) => index,
                None => {
                    let mut data = vec![0u8; self.output_report_len(cap.report_id)];
                    data[0] = cap.report_id;
                    reports.push(OutputReport {
                        report_id: cap.report_id,
                        data,
                    });
                    reports.len() - 1
                }
            };
            write_bits(
                &mut reports[index].data[1..],
                cap.data_index_min as usize,
                usize::from(cap.bit_size),
                cap.value,
            );
        }
        reports
    }
}

impl HidDevice {
    /// Declared output report length, widened if a capability would not fit.
    fn output_report_len(&self, report_id: u8) -> usize {
        let needed = self
            .output_values
            .iter()
            .filter(|c| c.report_id == report_id)
            .map(|c| (c.data_index_min as usize + usize::from(c.bit_size)).div_ceil(8))
            .max()
            .unwrap_or(0);
        self.output_report_size.max(needed + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::usage::{PAGE_BUTTON, PAGE_GENERIC_DESKTOP, PAGE_LED, USAGE_X, USAGE_Y};
    use proptest::prelude::*;

    fn report(id: u8, set_bits: &[usize], len: usize) -> Vec<u8> {
        let mut r = vec![0u8; len + 1];
        r[0] = id;
        for &b in set_bits {
            r[1 + b / 8] |= 1 << (b % 8);
        }
        r
    }

    #[test]
    fn button_bits_land_relative_to_range_start() {
        let mut dev = HidDevice::new(1, 2)
            .with_input_button(HidCapability::button_range(0, PAGE_BUTTON, 1, 8, 3));
        dev.parse(&report(0, &[3, 5, 9], 2));
        assert_eq!(dev.input_buttons()[0].value, 0x45);
    }

    #[test]
    fn values_are_copied_verbatim() {
        let mut dev = HidDevice::new(1, 2)
            .with_input_value(HidCapability::value_field(0, PAGE_GENERIC_DESKTOP, USAGE_X, 0, 12))
            .with_input_value(HidCapability::value_field(0, PAGE_GENERIC_DESKTOP, USAGE_Y, 12, 12));
        dev.parse(&[0, 0xFF, 0x3F, 0x80]);
        assert_eq!(dev.input_value(PAGE_GENERIC_DESKTOP, USAGE_X).unwrap().value, 0xFFF);
        assert_eq!(dev.input_value(PAGE_GENERIC_DESKTOP, USAGE_Y).unwrap().value, 0x803);
    }

    #[test]
    fn other_report_ids_leave_capabilities_alone() {
        let mut dev = HidDevice::new(1, 2)
            .with_input_button(HidCapability::button_range(1, PAGE_BUTTON, 1, 8, 0))
            .with_input_value(HidCapability::value_field(2, PAGE_GENERIC_DESKTOP, USAGE_X, 0, 8));
        dev.parse(&[1, 0b11]);
        dev.parse(&[2, 0x7F]);
        assert_eq!(dev.input_buttons()[0].value, 0b11);
        assert_eq!(dev.input_values()[0].value, 0x7F);
    }

    #[test]
    fn short_report_decodes_what_fits() {
        let mut dev = HidDevice::new(1, 2)
            .with_input_button(HidCapability::button_range(0, PAGE_BUTTON, 1, 16, 4))
            .with_input_value(HidCapability::value_field(0, PAGE_GENERIC_DESKTOP, USAGE_X, 0, 4))
            .with_input_value(HidCapability::value_field(0, PAGE_GENERIC_DESKTOP, USAGE_Y, 16, 8));
        dev.input_values[1].value = 99;

        // one data byte: X fits, the first four buttons fit, Y does not
        dev.parse(&[0, 0xF5]);
        assert_eq!(dev.input_values()[0].value, 0x5);
        assert_eq!(dev.input_buttons()[0].value, 0xF);
        assert_eq!(dev.input_values()[1].value, 99);

        dev.parse(&[]);
        assert_eq!(dev.input_values()[0].value, 0x5);
    }

    #[test]
    fn one_output_report_per_report_id() {
        let mut dev = HidDevice::new(1, 2)
            .with_output_value(HidCapability::value_field(3, PAGE_LED, 1, 0, 1))
            .with_output_value(HidCapability::value_field(5, 0xFF00, 1, 0, 8))
            .with_output_value(HidCapability::value_field(3, PAGE_LED, 2, 1, 1));
        dev.output_report_size = 3;
        dev.output_value_mut(PAGE_LED, 2).unwrap().value = 1;
        dev.output_value_mut(0xFF00, 1).unwrap().value = 0xAB;

        let reports = dev.build_output_reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].report_id, 3);
        assert_eq!(reports[0].data, [3, 0b10, 0]);
        assert_eq!(reports[1].data, [5, 0xAB, 0]);
    }

    #[test]
    fn descriptors_without_inputs_are_rejected() {
        assert!(matches!(
            HidDevice::try_from_descriptor(1, 2, &[]),
            Err(InputError::Report(_))
        ));
        // LED output only
        let leds = [
            0x05, 0x08, 0x19, 0x01, 0x29, 0x03, 0x15, 0x00, 0x25, 0x01, 0x75, 0x01, 0x95, 0x03,
            0x91, 0x02,
        ];
        assert!(matches!(
            HidDevice::try_from_descriptor(1, 2, &leds),
            Err(InputError::Report(_))
        ));
        let x = [
            0x05, 0x01, 0x09, 0x30, 0x75, 0x08, 0x95, 0x01, 0x26, 0xFF, 0x00, 0x81, 0x02,
        ];
        assert_eq!(
            HidDevice::try_from_descriptor(1, 2, &x).unwrap().input_values().len(),
            1
        );
    }

    proptest! {
        #[test]
        fn decode_is_idempotent(data in proptest::collection::vec(any::<u8>(), 0..8)) {
            let mut dev = HidDevice::new(1, 2)
                .with_input_button(HidCapability::button_range(0, PAGE_BUTTON, 1, 20, 2))
                .with_input_value(HidCapability::value_field(
                    0,
                    PAGE_GENERIC_DESKTOP,
                    USAGE_X,
                    24,
                    10,
                ));
            let mut report = vec![0u8];
            report.extend_from_slice(&data);

            dev.parse(&report);
            let first = (dev.input_buttons()[0].value, dev.input_values()[0].value);
            dev.parse(&report);
            let second = (dev.input_buttons()[0].value, dev.input_values()[0].value);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn button_bits_follow_raw_bits(bits in proptest::collection::btree_set(3usize..=10, 0..8)) {
            let mut dev = HidDevice::new(1, 2)
                .with_input_button(HidCapability::button_range(0, PAGE_BUTTON, 1, 8, 3));
            let bits: Vec<usize> = bits.into_iter().collect();
            dev.parse(&report(0, &bits, 2));
            let expected = bits.iter().fold(0u32, |acc, b| acc | 1 << (b - 3));
            prop_assert_eq!(dev.input_buttons()[0].value, expected);
        }
    }
}
