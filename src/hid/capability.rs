//! One field of a binary HID report.
//!
//! Bit positions (`data_index_*`) count from bit 0 of the first data byte, i.e. the byte
//! after the report ID, in little-endian bit order (bit 0 is the LSB of byte 0).

use serde::{Deserialize, Serialize};

/// A capability record.
///
/// Button capabilities cover `data_index_min..=data_index_max`, one bit per usage in
/// `usage_min..=usage_max`; `value` holds the packed pressed bits (bit 0 = `usage_min`).
/// Value capabilities cover `bit_size` bits at `data_index_min`; `value` holds the raw
/// field as read from the last report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HidCapability {
    pub report_id: u8,
    pub usage_page: u16,
    pub usage_min: u16,
    pub usage_max: u16,
    pub data_index_min: u32,
    pub data_index_max: u32,
    pub bit_size: u16,
    pub logical_min: i32,
    pub logical_max: i32,
    pub physical_min: i32,
    pub physical_max: i32,
    /// Live value, overwritten by every decode pass.
    pub value: u32,
}

/// Packed button bits are capped at the width of `value`.
pub const MAX_BUTTONS_PER_CAPABILITY: u32 = 32;

impl HidCapability {
    /// A run of one-bit buttons `usage_min..=usage_max` starting at bit `data_index`.
    pub fn button_range(
        report_id: u8,
        usage_page: u16,
        usage_min: u16,
        usage_max: u16,
        data_index: u32,
    ) -> Self {
        let span = u32::from(usage_max.saturating_sub(usage_min));
        Self {
            report_id,
            usage_page,
            usage_min,
            usage_max: usage_min + span as u16,
            data_index_min: data_index,
            data_index_max: data_index + span,
            bit_size: 1,
            logical_min: 0,
            logical_max: 1,
            physical_min: 0,
            physical_max: 1,
            value: 0,
        }
    }

    /// A single `bit_size`-bit value field at bit `data_index`.
    ///
    /// The logical range defaults to the unsigned range of the field.
    pub fn value_field(
        report_id: u8,
        usage_page: u16,
        usage: u16,
        data_index: u32,
        bit_size: u16,
    ) -> Self {
        let bits = u32::from(bit_size.clamp(1, 32));
        let max = if bits >= 31 { i32::MAX } else { (1i32 << bits) - 1 };
        Self {
            report_id,
            usage_page,
            usage_min: usage,
            usage_max: usage,
            data_index_min: data_index,
            data_index_max: data_index,
            bit_size: bits as u16,
            logical_min: 0,
            logical_max: max,
            physical_min: 0,
            physical_max: max,
            value: 0,
        }
    }

    pub fn with_logical(mut self, min: i32, max: i32) -> Self {
        self.logical_min = min;
        self.logical_max = max;
        self
    }

    pub fn with_physical(mut self, min: i32, max: i32) -> Self {
        self.physical_min = min;
        self.physical_max = max;
        self
    }

    /// First (or only) usage.
    #[inline]
    pub fn usage(&self) -> u16 {
        self.usage_min
    }

    pub fn has_usage(&self, usage_page: u16, usage: u16) -> bool {
        self.usage_page == usage_page && (self.usage_min..=self.usage_max).contains(&usage)
    }

    /// Number of buttons this capability tracks.
    pub fn button_count(&self) -> u32 {
        (self.data_index_max - self.data_index_min + 1).min(MAX_BUTTONS_PER_CAPABILITY)
    }

    /// Pressed state of one usage of a button capability.
    pub fn button(&self, usage: u16) -> Option<bool> {
        if !(self.usage_min..=self.usage_max).contains(&usage) {
            return None;
        }
        let bit = u32::from(usage - self.usage_min);
        (bit < MAX_BUTTONS_PER_CAPABILITY).then(|| self.value & (1 << bit) != 0)
    }

    /// Raw value interpreted with the sign of the logical range.
    pub fn signed_value(&self) -> i32 {
        let bits = u32::from(self.bit_size);
        if self.logical_min < 0 && bits > 0 && bits < 32 {
            let shift = 32 - bits;
            ((self.value << shift) as i32) >> shift
        } else {
            self.value as i32
        }
    }

    /// Store a signed value, truncated to the field width.
    pub fn set_signed_value(&mut self, value: i32) {
        self.value = (value as u32) & field_mask(u32::from(self.bit_size));
    }
}

#[inline]
fn field_mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Read `bit_count` (1..=32) bits at `bit_offset`. `None` if the field does not fit in `data`.
pub(crate) fn read_bits(data: &[u8], bit_offset: usize, bit_count: usize) -> Option<u32> {
    if bit_count == 0 || bit_count > 32 {
        return None;
    }
    let end = bit_offset.checked_add(bit_count)?;
    if end > data.len() * 8 {
        return None;
    }
    let mut value = 0u32;
    for i in 0..bit_count {
        let bit = bit_offset + i;
        if data[bit / 8] & (1 << (bit % 8)) != 0 {
            value |= 1 << i;
        }
    }
    Some(value)
}

/// Write the low `bit_count` bits of `value` at `bit_offset`. `false` if the field does not fit.
pub(crate) fn write_bits(data: &mut [u8], bit_offset: usize, bit_count: usize, value: u32) -> bool {
    if bit_count == 0 || bit_count > 32 {
        return false;
    }
    let Some(end) = bit_offset.checked_add(bit_count) else {
        return false;
    };
    if end > data.len() * 8 {
        return false;
    }
    for i in 0..bit_count {
        let bit = bit_offset + i;
        let mask = 1u8 << (bit % 8);
        if value & (1 << i) != 0 {
            data[bit / 8] |= mask;
        } else {
            data[bit / 8] &= !mask;
        }
    }
    true
}
