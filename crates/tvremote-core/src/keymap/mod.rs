//! Symbolic key table for remote-control key presses.
//!
//! The device identifies keys by `KEY_*` codes.  Callers may use either the
//! canonical code (`"KEY_VOLUP"`) or a friendly alias (`"volume_up"`), in any
//! letter case.  A value that matches neither is still sent verbatim: the
//! device's key set is larger than this table and varies by model.

/// One row of the key table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEntry {
    /// Friendly alias accepted from callers.
    pub alias: &'static str,
    /// Code sent on the wire.
    pub code: &'static str,
}

const fn key(alias: &'static str, code: &'static str) -> KeyEntry {
    KeyEntry { alias, code }
}

/// Every key the controller knows by name, in list-keys display order.
pub const KEY_TABLE: &[KeyEntry] = &[
    // Power / sources
    key("power", "KEY_POWER"),
    key("source", "KEY_SOURCE"),
    key("hdmi", "KEY_HDMI"),
    // Navigation
    key("up", "KEY_UP"),
    key("down", "KEY_DOWN"),
    key("left", "KEY_LEFT"),
    key("right", "KEY_RIGHT"),
    key("enter", "KEY_ENTER"),
    key("ok", "KEY_ENTER"),
    key("back", "KEY_RETURN"),
    key("exit", "KEY_EXIT"),
    key("home", "KEY_HOME"),
    key("menu", "KEY_MENU"),
    key("info", "KEY_INFO"),
    key("guide", "KEY_GUIDE"),
    key("tools", "KEY_TOOLS"),
    key("search", "KEY_SEARCH"),
    // Volume / channel
    key("volume_up", "KEY_VOLUP"),
    key("volume_down", "KEY_VOLDOWN"),
    key("mute", "KEY_MUTE"),
    key("channel_up", "KEY_CHUP"),
    key("channel_down", "KEY_CHDOWN"),
    key("channel_list", "KEY_CH_LIST"),
    // Media
    key("play", "KEY_PLAY"),
    key("pause", "KEY_PAUSE"),
    key("stop", "KEY_STOP"),
    key("rewind", "KEY_REWIND"),
    key("fast_forward", "KEY_FF"),
    key("record", "KEY_REC"),
    // Digits
    key("0", "KEY_0"),
    key("1", "KEY_1"),
    key("2", "KEY_2"),
    key("3", "KEY_3"),
    key("4", "KEY_4"),
    key("5", "KEY_5"),
    key("6", "KEY_6"),
    key("7", "KEY_7"),
    key("8", "KEY_8"),
    key("9", "KEY_9"),
    // Colour keys
    key("red", "KEY_RED"),
    key("green", "KEY_GREEN"),
    key("yellow", "KEY_YELLOW"),
    key("blue", "KEY_CYAN"),
];

/// Code for the key that opens the universal search surface.
pub const SEARCH_KEY: &str = "KEY_SEARCH";
/// Code for the confirm / select key.
pub const CONFIRM_KEY: &str = "KEY_ENTER";
/// Code for the move-down navigation key.
pub const DOWN_KEY: &str = "KEY_DOWN";

/// Resolves `key` to the code sent on the wire.
///
/// Aliases and canonical codes are matched case-insensitively; anything else
/// is passed through unchanged as a raw key code.
pub fn resolve_key(key: &str) -> String {
    let trimmed = key.trim();
    KEY_TABLE
        .iter()
        .find(|entry| {
            entry.alias.eq_ignore_ascii_case(trimmed) || entry.code.eq_ignore_ascii_case(trimmed)
        })
        .map(|entry| entry.code.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
