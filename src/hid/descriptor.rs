//! HID report-descriptor parsing into capability tables.
//!
//! Only short items are interpreted; long items are skipped. The walk stops at the first
//! truncated item and returns what was built up to there.

use super::capability::{HidCapability, MAX_BUTTONS_PER_CAPABILITY};
use super::usage::PAGE_BUTTON;
use std::collections::HashMap;
use tracing::debug;

/// Capability tables and report sizes extracted from a report descriptor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Capabilities {
    pub usage_page: u16,
    pub usage: u16,
    pub input_buttons: Vec<HidCapability>,
    pub input_values: Vec<HidCapability>,
    pub output_values: Vec<HidCapability>,
    /// In bytes, report-ID byte included. Zero when the report type is absent.
    pub input_report_size: usize,
    pub output_report_size: usize,
    pub feature_report_size: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum ReportKind {
    Input,
    Output,
    Feature,
}

#[derive(Clone, Copy, Debug, Default)]
struct Globals {
    usage_page: u16,
    logical_min: i32,
    logical_max: i32,
    logical_max_raw: u32,
    physical_min: i32,
    physical_max: i32,
    physical_max_raw: u32,
    report_size: u32,
    report_id: u8,
    report_count: u32,
}

#[derive(Debug, Default)]
struct Locals {
    usages: Vec<(u16, u16)>,
    usage_min: Option<(u16, u16)>,
    usage_max: Option<(u16, u16)>,
}

impl Locals {
    /// Usage of the `i`-th report slot.
    fn usage_at(&self, i: u32, page: u16) -> (u16, u16) {
        if let Some((min_page, min)) = self.usage_min {
            let max = self.usage_max.map_or(min, |(_, m)| m);
            let usage = min.saturating_add(i as u16).min(max);
            return (min_page, usage);
        }
        match self.usages.get(i as usize).or(self.usages.last()) {
            Some(&u) => u,
            None => (page, 0),
        }
    }
}

const MAIN_INPUT: u8 = 0x8;
const MAIN_OUTPUT: u8 = 0x9;
const MAIN_COLLECTION: u8 = 0xA;
const MAIN_FEATURE: u8 = 0xB;
const MAIN_END_COLLECTION: u8 = 0xC;

const FLAG_CONSTANT: u32 = 0x01;
const FLAG_VARIABLE: u32 = 0x02;

/// A single main item may not describe more than this many bits.
const MAX_FIELD_BITS: u64 = 8 * 4096;

pub fn parse_report_descriptor(desc: &[u8]) -> Capabilities {
    let mut caps = Capabilities::default();
    let mut globals = Globals::default();
    let mut stack: Vec<Globals> = Vec::new();
    let mut locals = Locals::default();
    let mut cursors: HashMap<(ReportKind, u8), u32> = HashMap::new();
    let mut depth = 0u32;
    let mut top_level_seen = false;

    let mut i = 0usize;
    while i < desc.len() {
        let prefix = desc[i];

        if prefix == 0xFE {
            // long item: [0xFE][size][tag][data...]
            let Some(&size) = desc.get(i + 1) else {
                debug!(offset = i, "truncated long item");
                break;
            };
            i += 3 + usize::from(size);
            continue;
        }

        let size = match prefix & 0x03 {
            3 => 4,
            n => usize::from(n),
        };
        let Some(bytes) = desc.get(i + 1..i + 1 + size) else {
            debug!(offset = i, "truncated report descriptor item");
            break;
        };
        i += 1 + size;

        let unsigned = bytes
            .iter()
            .enumerate()
            .fold(0u32, |acc, (n, b)| acc | u32::from(*b) << (8 * n));
        let signed = match size {
            1 => unsigned as u8 as i8 as i32,
            2 => unsigned as u16 as i16 as i32,
            _ => unsigned as i32,
        };
        let tag = prefix >> 4;

        match (prefix >> 2) & 0x03 {
            // Main
            0 => {
                match tag {
                    MAIN_INPUT | MAIN_OUTPUT | MAIN_FEATURE => {
                        let kind = match tag {
                            MAIN_INPUT => ReportKind::Input,
                            MAIN_OUTPUT => ReportKind::Output,
                            _ => ReportKind::Feature,
                        };
                        let ok = add_main_item(
                            &mut caps,
                            &mut cursors,
                            kind,
                            unsigned,
                            &globals,
                            &locals,
                        );
                        if !ok {
                            debug!(offset = i, "oversized report field; stopping");
                            break;
                        }
                    }
                    MAIN_COLLECTION => {
                        if depth == 0 && !top_level_seen {
                            let (page, usage) = locals.usage_at(0, globals.usage_page);
                            caps.usage_page = page;
                            caps.usage = usage;
                            top_level_seen = true;
                        }
                        depth += 1;
                    }
                    MAIN_END_COLLECTION => depth = depth.saturating_sub(1),
                    _ => {}
                }
                locals = Locals::default();
            }
            // Global
            1 => match tag {
                0x0 => globals.usage_page = unsigned as u16,
                0x1 => globals.logical_min = signed,
                0x2 => {
                    globals.logical_max = signed;
                    globals.logical_max_raw = unsigned;
                }
                0x3 => globals.physical_min = signed,
                0x4 => {
                    globals.physical_max = signed;
                    globals.physical_max_raw = unsigned;
                }
                0x7 => globals.report_size = unsigned,
                0x8 => globals.report_id = unsigned as u8,
                0x9 => globals.report_count = unsigned,
                0xA => stack.push(globals),
                0xB => {
                    if let Some(g) = stack.pop() {
                        globals = g;
                    }
                }
                _ => {}
            },
            // Local
            2 => {
                let usage = if size == 4 {
                    ((unsigned >> 16) as u16, unsigned as u16)
                } else {
                    (globals.usage_page, unsigned as u16)
                };
                match tag {
                    0x0 => locals.usages.push(usage),
                    0x1 => locals.usage_min = Some(usage),
                    0x2 => locals.usage_max = Some(usage),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    caps.input_report_size = report_size(&cursors, ReportKind::Input);
    caps.output_report_size = report_size(&cursors, ReportKind::Output);
    caps.feature_report_size = report_size(&cursors, ReportKind::Feature);
    caps
}

/// A maximum written with a too-short encoding reads as negative; `0..255`-style
/// ranges take the unsigned reading instead.
fn unsigned_range(min: i32, max: i32, max_raw: u32) -> (i32, i32) {
    if min >= 0 && max < min {
        (min, max_raw.min(i32::MAX as u32) as i32)
    } else {
        (min, max)
    }
}

fn add_main_item(
    caps: &mut Capabilities,
    cursors: &mut HashMap<(ReportKind, u8), u32>,
    kind: ReportKind,
    flags: u32,
    g: &Globals,
    locals: &Locals,
) -> bool {
    let total = u64::from(g.report_size) * u64::from(g.report_count);
    if total > MAX_FIELD_BITS {
        return false;
    }
    let cursor = cursors.entry((kind, g.report_id)).or_insert(0);
    let start = *cursor;
    *cursor += total as u32;

    if flags & FLAG_CONSTANT != 0 || kind == ReportKind::Feature || total == 0 {
        return true;
    }

    let (logical_min, logical_max) =
        unsigned_range(g.logical_min, g.logical_max, g.logical_max_raw);
    let (physical_min, physical_max) = if g.physical_min == 0 && g.physical_max == 0 {
        (logical_min, logical_max)
    } else {
        unsigned_range(g.physical_min, g.physical_max, g.physical_max_raw)
    };

    let variable = flags & FLAG_VARIABLE != 0;
    let buttons = kind == ReportKind::Input
        && variable
        && g.report_size == 1
        && (locals.usage_at(0, g.usage_page).0 == PAGE_BUTTON
            || (logical_min == 0 && logical_max == 1));

    if buttons {
        // One capability holds at most 32 buttons; wider fields are split.
        let (page, first) = locals.usage_at(0, g.usage_page);
        let mut offset = 0;
        while offset < g.report_count {
            let count = (g.report_count - offset).min(MAX_BUTTONS_PER_CAPABILITY);
            let usage_min = first.saturating_add(offset as u16);
            let usage_max = usage_min.saturating_add((count - 1) as u16);
            caps.input_buttons.push(HidCapability::button_range(
                g.report_id,
                page,
                usage_min,
                usage_max,
                start + offset,
            ));
            offset += count;
        }
        return true;
    }

    let table = match kind {
        ReportKind::Input => &mut caps.input_values,
        _ => &mut caps.output_values,
    };
    for slot in 0..g.report_count {
        let (page, usage) = if variable {
            locals.usage_at(slot, g.usage_page)
        } else {
            locals.usage_at(0, g.usage_page)
        };
        table.push(
            HidCapability::value_field(
                g.report_id,
                page,
                usage,
                start + slot * g.report_size,
                g.report_size as u16,
            )
                .with_logical(logical_min, logical_max)
                .with_physical(physical_min, physical_max),
        );
    }
    true
}

fn report_size(cursors: &HashMap<(ReportKind, u8), u32>, kind: ReportKind) -> usize {
    cursors
        .iter()
        .filter(|((k, _), _)| *k == kind)
        .map(|(_, bits)| (*bits as usize).div_ceil(8) + 1)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::usage::{
        PAGE_GENERIC_DESKTOP, PAGE_LED, USAGE_HAT_SWITCH, USAGE_JOYSTICK, USAGE_X, USAGE_Y,
    };

    /// Joystick: report 1 = 8 buttons, X/Y 8-bit, 4-bit hat + 4 padding; report 2 = 3 LEDs out.
    const JOYSTICK: &[u8] = &[
        0x05, 0x01, // Usage Page (Generic Desktop)
        0x09, 0x04, // Usage (Joystick)
        0xA1, 0x01, // Collection (Application)
        0x85, 0x01, //   Report ID (1)
        0x05, 0x09, //   Usage Page (Button)
        0x19, 0x01, //   Usage Minimum (1)
        0x29, 0x08, //   Usage Maximum (8)
        0x15, 0x00, //   Logical Minimum (0)
        0x25, 0x01, //   Logical Maximum (1)
        0x75, 0x01, //   Report Size (1)
        0x95, 0x08, //   Report Count (8)
        0x81, 0x02, //   Input (Data,Var,Abs)
        0x05, 0x01, //   Usage Page (Generic Desktop)
        0x09, 0x30, //   Usage (X)
        0x09, 0x31, //   Usage (Y)
        0x15, 0x00, //   Logical Minimum (0)
        0x26, 0xFF, 0x00, // Logical Maximum (255)
        0x75, 0x08, //   Report Size (8)
        0x95, 0x02, //   Report Count (2)
        0x81, 0x02, //   Input (Data,Var,Abs)
        0x09, 0x39, //   Usage (Hat switch)
        0x15, 0x00, //   Logical Minimum (0)
        0x25, 0x07, //   Logical Maximum (7)
        0x35, 0x00, //   Physical Minimum (0)
        0x46, 0x3B, 0x01, // Physical Maximum (315)
        0x75, 0x04, //   Report Size (4)
        0x95, 0x01, //   Report Count (1)
        0x81, 0x42, //   Input (Data,Var,Abs,Null)
        0x75, 0x04, //   Report Size (4)
        0x95, 0x01, //   Report Count (1)
        0x81, 0x03, //   Input (Const)
        0x85, 0x02, //   Report ID (2)
        0x05, 0x08, //   Usage Page (LEDs)
        0x19, 0x01, //   Usage Minimum (1)
        0x29, 0x03, //   Usage Maximum (3)
        0x15, 0x00, //   Logical Minimum (0)
        0x25, 0x01, //   Logical Maximum (1)
        0x75, 0x01, //   Report Size (1)
        0x95, 0x03, //   Report Count (3)
        0x91, 0x02, //   Output (Data,Var,Abs)
        0x95, 0x05, //   Report Count (5)
        0x91, 0x03, //   Output (Const)
        0xC0, // End Collection
    ];

    #[test]
    fn joystick_descriptor() {
        let caps = parse_report_descriptor(JOYSTICK);
        assert_eq!((caps.usage_page, caps.usage), (PAGE_GENERIC_DESKTOP, USAGE_JOYSTICK));

        assert_eq!(caps.input_buttons.len(), 1);
        let b = &caps.input_buttons[0];
        assert_eq!((b.report_id, b.usage_page, b.usage_min, b.usage_max), (1, PAGE_BUTTON, 1, 8));
        assert_eq!((b.data_index_min, b.data_index_max), (0, 7));

        assert_eq!(caps.input_values.len(), 3);
        let x = &caps.input_values[0];
        assert_eq!((x.usage(), x.data_index_min, x.bit_size), (USAGE_X, 8, 8));
        assert_eq!((x.logical_min, x.logical_max), (0, 255));
        assert_eq!(caps.input_values[1].usage(), USAGE_Y);
        let hat = &caps.input_values[2];
        assert_eq!((hat.usage(), hat.data_index_min, hat.bit_size), (USAGE_HAT_SWITCH, 24, 4));
        assert_eq!((hat.physical_min, hat.physical_max), (0, 315));

        assert_eq!(caps.output_values.len(), 3);
        assert!(caps.output_values.iter().all(|c| c.report_id == 2 && c.usage_page == PAGE_LED));
        assert_eq!(caps.output_values[2].data_index_min, 2);

        // 32 input bits + ID byte, 8 output bits + ID byte
        assert_eq!(caps.input_report_size, 5);
        assert_eq!(caps.output_report_size, 2);
        assert_eq!(caps.feature_report_size, 0);
    }

    #[test]
    fn wide_button_fields_are_split() {
        let desc = [
            0x85, 0x01, // Report ID (1)
            0x05, 0x09, 0x19, 0x01, 0x29, 0x28, // Buttons 1..40
            0x15, 0x00, 0x25, 0x01, 0x75, 0x01, 0x95, 0x28, 0x81, 0x02,
        ];
        let caps = parse_report_descriptor(&desc);
        let ranges: Vec<_> = caps
            .input_buttons
            .iter()
            .map(|b| (b.usage_min, b.usage_max, b.data_index_min, b.data_index_max))
            .collect();
        assert_eq!(ranges, [(1, 32, 0, 31), (33, 40, 32, 39)]);
        assert_eq!(caps.input_report_size, 6);
    }

    #[test]
    fn unsigned_logical_max_is_fixed_up() {
        let desc = [
            0x05, 0x01, 0x09, 0x30, 0x15, 0x00, 0x25, 0xFF, 0x75, 0x08, 0x95, 0x01, 0x81, 0x02,
        ];
        let caps = parse_report_descriptor(&desc);
        assert_eq!(caps.input_values[0].logical_max, 255);
        assert_eq!(caps.input_report_size, 2);

        let wide = [
            0x05, 0x01, 0x09, 0x30, 0x15, 0x00, 0x26, 0xFF, 0xFF, 0x75, 0x10, 0x95, 0x01, 0x81,
            0x02,
        ];
        assert_eq!(parse_report_descriptor(&wide).input_values[0].logical_max, 65535);
    }

    #[test]
    fn push_pop_restores_globals() {
        let desc = [
            0x05, 0x01, 0x75, 0x08, 0x95, 0x01, 0x15, 0x81, 0x25, 0x7F, // signed 8-bit
            0xA4, // Push
            0x75, 0x10, 0x09, 0x30, 0x81, 0x02, // 16-bit X
            0xB4, // Pop
            0x09, 0x31, 0x81, 0x02, // 8-bit Y
        ];
        let caps = parse_report_descriptor(&desc);
        assert_eq!(caps.input_values[0].bit_size, 16);
        assert_eq!(caps.input_values[1].bit_size, 8);
        assert_eq!(caps.input_values[1].data_index_min, 16);
        assert_eq!(caps.input_values[1].logical_min, -127);
    }

    #[test]
    fn truncated_descriptor_keeps_completed_fields() {
        let mut desc = JOYSTICK[..JOYSTICK.len() - 21].to_vec();
        desc.push(0x26); // Logical Maximum with its data missing
        let caps = parse_report_descriptor(&desc);
        assert_eq!(caps.input_buttons.len(), 1);
        assert_eq!(caps.input_values.len(), 3);
    }

    #[test]
    fn long_items_are_skipped() {
        let desc = [
            0xFE, 0x02, 0x10, 0xAA, 0xBB, // long item
            0x05, 0x01, 0x09, 0x30, 0x75, 0x08, 0x95, 0x01, 0x26, 0xFF, 0x00, 0x81, 0x02,
        ];
        let caps = parse_report_descriptor(&desc);
        assert_eq!(caps.input_values.len(), 1);
        assert_eq!(caps.input_values[0].usage(), USAGE_X);
    }
}
