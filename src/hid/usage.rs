//! HID usage constants and value conversions shared by the HID backends.

pub const PAGE_GENERIC_DESKTOP: u16 = 0x01;
pub const PAGE_SIMULATION: u16 = 0x02;
pub const PAGE_LED: u16 = 0x08;
pub const PAGE_BUTTON: u16 = 0x09;
pub const PAGE_PID: u16 = 0x0F;

pub const USAGE_POINTER: u16 = 0x01;
pub const USAGE_MOUSE: u16 = 0x02;
pub const USAGE_JOYSTICK: u16 = 0x04;
pub const USAGE_GAMEPAD: u16 = 0x05;
pub const USAGE_KEYBOARD: u16 = 0x06;
pub const USAGE_KEYPAD: u16 = 0x07;
pub const USAGE_MULTI_AXIS: u16 = 0x08;

pub const USAGE_X: u16 = 0x30;
pub const USAGE_Y: u16 = 0x31;
pub const USAGE_Z: u16 = 0x32;
pub const USAGE_RX: u16 = 0x33;
pub const USAGE_RY: u16 = 0x34;
pub const USAGE_RZ: u16 = 0x35;
pub const USAGE_HAT_SWITCH: u16 = 0x39;

/// How a hat switch encodes its direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HatEncoding {
    /// Eight logical positions (`0..=7` or `1..=8`).
    Slots,
    /// An angle (`0..=359`, `0..=315`, ...).
    Degrees,
}

/// `Some` if `(usage_page, usage)` is a hat switch.
pub fn classify_hat(
    usage_page: u16,
    usage: u16,
    logical_min: i32,
    logical_max: i32,
) -> Option<HatEncoding> {
    if usage_page != PAGE_GENERIC_DESKTOP || usage != USAGE_HAT_SWITCH {
        return None;
    }
    let slots = (logical_min == 0 && logical_max == 7) || (logical_min == 1 && logical_max == 8);
    Some(if slots {
        HatEncoding::Slots
    } else {
        HatEncoding::Degrees
    })
}

/// Normalize an integer from `[lo, hi]` into `[-1.0, 1.0]`, clamped.
pub fn normalize_axis_value(v: i32, lo: i32, hi: i32) -> f32 {
    let lo = lo as f64;
    let hi = hi as f64;
    if (hi - lo).abs() < 1e-9 {
        return 0.0;
    }
    let t = (v as f64 - lo) / (hi - lo);
    (t * 2.0 - 1.0).clamp(-1.0, 1.0) as f32
}

/// Hat value → `-1` (neutral) or `0..=7` (Up = 0, clockwise).
pub fn hat_value_to_slot(raw: i32, lo: i32, hi: i32, encoding: HatEncoding) -> i16 {
    if raw < lo || raw > hi {
        return -1;
    }
    match encoding {
        HatEncoding::Slots => {
            let slot = raw - lo;
            if (0..=7).contains(&slot) {
                slot as i16
            } else {
                -1
            }
        }
        HatEncoding::Degrees => {
            let slot = ((raw as f32 + 22.5) / 45.0).floor() as i32;
            slot.rem_euclid(8) as i16
        }
    }
}

/// Control name for a value usage.
///
/// The six Generic Desktop axes and the hat use the joystick control names.
pub fn usage_name(usage_page: u16, usage: u16) -> String {
    match usage_page {
        PAGE_GENERIC_DESKTOP => match usage {
            USAGE_X => "X".into(),
            USAGE_Y => "Y".into(),
            USAGE_Z => "Z".into(),
            USAGE_RX => "RX".into(),
            USAGE_RY => "RY".into(),
            USAGE_RZ => "RZ".into(),
            0x36 => "Slider".into(),
            0x37 => "Dial".into(),
            0x38 => "Wheel".into(),
            USAGE_HAT_SWITCH => "Hat".into(),
            _ => format!("GD_{usage:02X}"),
        },
        PAGE_SIMULATION => match usage {
            0xB0 => "Accelerator".into(),
            0xB1 => "Brake".into(),
            0xB2 => "Clutch".into(),
            0xBA => "Rudder".into(),
            0xBB => "Throttle".into(),
            _ => format!("Sim_{usage:02X}"),
        },
        PAGE_BUTTON => format!("Button{}", usage.saturating_sub(1)),
        page if page >= 0xFF00 => format!("Vendor_{page:04X}_{usage:04X}"),
        page => format!("UP_{page:04X}_U_{usage:04X}"),
    }
}
