//! ANSI escapes for [`PrintTracer`](crate::PrintTracer) output.
//!
//! Colors name trace roles, not hues: non-terminals are blue, shifted
//! tokens green, failed expansions red, and input positions dim. Only the
//! standard 16-color codes are used.

/// Escape sequences per trace role. With colors off every field is empty,
/// so formatting code never branches on the setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    pub nonterminal: &'static str,
    pub token: &'static str,
    pub failure: &'static str,
    pub position: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        nonterminal: "\x1b[34m",
        token: "\x1b[32m",
        failure: "\x1b[31m",
        position: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        nonterminal: "",
        token: "",
        failure: "",
        position: "",
        reset: "",
    };

    /// Picks [`ON`](Self::ON) or [`OFF`](Self::OFF), e.g. from a TTY check.
    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }
}
