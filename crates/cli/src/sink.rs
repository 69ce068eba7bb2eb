//! Key event sinks.
//!
//! The keys command turns pin transitions into [`KeyEvent`]s and hands them to an
//! [`EventSink`]. The shipped sink writes one JSON object per line, ready to be piped
//! into whatever injects input on the target (a uinput daemon, a test harness).

use std::io::{self, Write};

use serde::Serialize;

/// A key press or release.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KeyEvent {
    /// Pin that changed, in `PB.04` form.
    pub pin: String,
    /// Bound key name.
    pub key: String,
    /// `true` on press, `false` on release.
    pub pressed: bool,
}

/// Destination for key events.
pub trait EventSink {
    /// Delivers one event.
    fn emit(&mut self, event: &KeyEvent) -> io::Result<()>;
}

/// Writes events as JSON lines, flushing after each.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: &KeyEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}
