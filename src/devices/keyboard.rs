use crate::control::Control;
use crate::controller::Controller;

/// One keyboard key: virtual-key code, control name, description and typed character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Key {
    pub vkey: u16,
    pub name: &'static str,
    pub description: &'static str,
    /// `'\0'` for keys that do not type anything.
    pub character: char,
}

const fn key(vkey: u16, name: &'static str, description: &'static str, character: char) -> Key {
    Key {
        vkey,
        name,
        description,
        character,
    }
}

/// Every key a keyboard controller exposes, in control order.
pub const KEYS: &[Key] = &[
    key(0x08, "Backspace", "Backspace", '\u{08}'),
    key(0x09, "Tab", "Tabulator", '\t'),
    key(0x0C, "Clear", "Clear (not available everywhere)", '\0'),
    key(0x0D, "Enter", "Enter", '\r'),
    key(0x10, "Shift", "Shift", '\0'),
    key(0x11, "Ctrl", "Ctrl", '\0'),
    key(0x12, "Alt", "Alt", '\0'),
    key(0x13, "Pause", "Pause", '\0'),
    key(0x14, "CapsLock", "Caps lock", '\0'),
    key(0x1B, "Escape", "Escape", '\u{1B}'),
    key(0x20, "Space", "Space", ' '),
    key(0x21, "PageUp", "Page up", '\0'),
    key(0x22, "PageDown", "Page down", '\0'),
    key(0x23, "End", "End", '\0'),
    key(0x24, "Home", "Home", '\0'),
    key(0x25, "Left", "Left arrow", '\0'),
    key(0x26, "Up", "Up arrow", '\0'),
    key(0x27, "Right", "Right arrow", '\0'),
    key(0x28, "Down", "Down arrow", '\0'),
    key(0x29, "Select", "Select (not available everywhere)", '\0'),
    key(0x2B, "Execute", "Execute (not available everywhere)", '\0'),
    key(0x2C, "Print", "Print screen", '\0'),
    key(0x2D, "Insert", "Insert", '\0'),
    key(0x2E, "Delete", "Delete", '\u{7F}'),
    key(0x2F, "Help", "Help (not available everywhere)", '\0'),
    key(0x30, "0", "0", '0'),
    key(0x31, "1", "1", '1'),
    key(0x32, "2", "2", '2'),
    key(0x33, "3", "3", '3'),
    key(0x34, "4", "4", '4'),
    key(0x35, "5", "5", '5'),
    key(0x36, "6", "6", '6'),
    key(0x37, "7", "7", '7'),
    key(0x38, "8", "8", '8'),
    key(0x39, "9", "9", '9'),
    key(0x41, "A", "A", 'a'),
    key(0x42, "B", "B", 'b'),
    key(0x43, "C", "C", 'c'),
    key(0x44, "D", "D", 'd'),
    key(0x45, "E", "E", 'e'),
    key(0x46, "F", "F", 'f'),
    key(0x47, "G", "G", 'g'),
    key(0x48, "H", "H", 'h'),
    key(0x49, "I", "I", 'i'),
    key(0x4A, "J", "J", 'j'),
    key(0x4B, "K", "K", 'k'),
    key(0x4C, "L", "L", 'l'),
    key(0x4D, "M", "M", 'm'),
    key(0x4E, "N", "N", 'n'),
    key(0x4F, "O", "O", 'o'),
    key(0x50, "P", "P", 'p'),
    key(0x51, "Q", "Q", 'q'),
    key(0x52, "R", "R", 'r'),
    key(0x53, "S", "S", 's'),
    key(0x54, "T", "T", 't'),
    key(0x55, "U", "U", 'u'),
    key(0x56, "V", "V", 'v'),
    key(0x57, "W", "W", 'w'),
    key(0x58, "X", "X", 'x'),
    key(0x59, "Y", "Y", 'y'),
    key(0x5A, "Z", "Z", 'z'),
    key(0x60, "Num0", "Numpad 0", '0'),
    key(0x61, "Num1", "Numpad 1", '1'),
    key(0x62, "Num2", "Numpad 2", '2'),
    key(0x63, "Num3", "Numpad 3", '3'),
    key(0x64, "Num4", "Numpad 4", '4'),
    key(0x65, "Num5", "Numpad 5", '5'),
    key(0x66, "Num6", "Numpad 6", '6'),
    key(0x67, "Num7", "Numpad 7", '7'),
    key(0x68, "Num8", "Numpad 8", '8'),
    key(0x69, "Num9", "Numpad 9", '9'),
    key(0x6A, "NumMultiply", "Numpad Multiply", '*'),
    key(0x6B, "NumAdd", "Numpad Add", '+'),
    key(0x6C, "NumSeparator", "Numpad Separator", ','),
    key(0x6D, "NumSubtract", "Numpad Subtract", '-'),
    key(0x6E, "NumDecimal", "Numpad Decimal", '.'),
    key(0x6F, "NumDivide", "Numpad Divide", '/'),
    key(0x70, "F1", "F1", '\0'),
    key(0x71, "F2", "F2", '\0'),
    key(0x72, "F3", "F3", '\0'),
    key(0x73, "F4", "F4", '\0'),
    key(0x74, "F5", "F5", '\0'),
    key(0x75, "F6", "F6", '\0'),
    key(0x76, "F7", "F7", '\0'),
    key(0x77, "F8", "F8", '\0'),
    key(0x78, "F9", "F9", '\0'),
    key(0x79, "F10", "F10", '\0'),
    key(0x7A, "F11", "F11", '\0'),
    key(0x7B, "F12", "F12", '\0'),
    key(0x90, "NumLock", "NumLock", '\0'),
    key(0x91, "ScrollLock", "ScrollLock", '\0'),
    key(0xDC, "Circumflex", "Circumflex (OEM 5 on US layouts)", '\0'),
    key(0x5B, "LeftWindows", "Left Windows key", '\0'),
    key(0x5C, "RightWindows", "Right Windows key", '\0'),
    key(0x5D, "Applications", "Applications key", '\0'),
    key(0x7C, "F13", "F13", '\0'),
    key(0x7D, "F14", "F14", '\0'),
    key(0x7E, "F15", "F15", '\0'),
    key(0x7F, "F16", "F16", '\0'),
    key(0x80, "F17", "F17", '\0'),
    key(0x81, "F18", "F18", '\0'),
    key(0x82, "F19", "F19", '\0'),
    key(0x83, "F20", "F20", '\0'),
    key(0x84, "F21", "F21", '\0'),
    key(0x85, "F22", "F22", '\0'),
    key(0x86, "F23", "F23", '\0'),
    key(0x87, "F24", "F24", '\0'),
    key(0xA0, "LeftShift", "Left Shift", '\0'),
    key(0xA1, "RightShift", "Right Shift", '\0'),
    key(0xA2, "LeftCtrl", "Left Ctrl", '\0'),
    key(0xA3, "RightCtrl", "Right Ctrl", '\0'),
    key(0xAD, "VolumeMute", "Volume mute", '\0'),
    key(0xAE, "VolumeDown", "Volume down", '\0'),
    key(0xAF, "VolumeUp", "Volume up", '\0'),
    key(0xB0, "MediaNextTrack", "Next track", '\0'),
    key(0xB1, "MediaPreviousTrack", "Previous track", '\0'),
    key(0xB2, "MediaStop", "Stop media", '\0'),
    key(0xB3, "MediaPlayPause", "Play/pause media", '\0'),
    key(0xBB, "Add", "+ key", '+'),
    key(0xBC, "Separator", ", key", ','),
    key(0xBD, "Subtract", "- key", '-'),
    key(0xBE, "Decimal", ". key", '.'),
    // layout dependent; no fixed character
    key(0xBA, "OEM1", "OEM 1 (;: on US layouts)", '\0'),
    key(0xBF, "OEM2", "OEM 2 (/? on US layouts)", '\0'),
    key(0xC0, "OEM3", "OEM 3 (`~ on US layouts)", '\0'),
    key(0xDB, "OEM4", "OEM 4 ([{ on US layouts)", '\0'),
    key(0xDD, "OEM6", "OEM 6 (]} on US layouts)", '\0'),
    key(0xDE, "OEM7", "OEM 7 (quote on US layouts)", '\0'),
    key(0xDF, "OEM8", "OEM 8", '\0'),
    key(0xE2, "OEM102", "OEM 102 (<> or \\| on 102-key layouts)", '\0'),
];

/// Key for a Windows-style virtual-key code.
pub fn key_for_vkey(vkey: u16) -> Option<&'static Key> {
    KEYS.iter().find(|k| k.vkey == vkey)
}

/// Key control for one table entry.
pub fn key_control(key: &Key) -> Control {
    Control::key(key.name, key.description, key.character)
}

/// Device controller named `"Keyboard"` with one button per entry of [`KEYS`].
pub fn keyboard() -> Controller {
    KEYS.iter()
        .fold(Controller::device("Keyboard", "Keyboard input controller"), |c, k| {
            c.with_control(key_control(k))
        })
}
