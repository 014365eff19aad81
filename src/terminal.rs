use crossterm::terminal;
use log::{debug, error, warn};
use std::io;
use std::io::{IsTerminal, Write};

/// Keeps the terminal in raw mode until dropped.
pub struct RawLock {
    enabled: bool,
}

impl RawLock {
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Drop for RawLock {
    fn drop(&mut self) {
        // terminal stays in raw mode but no means to repair
        if self.enabled
            && let Err(e) = terminal::disable_raw_mode()
        {
            error!("Error resetting terminal {e}");
        }
    }
}

/// Set terminal to raw (no line buffering, no echo) in best-effort mode, only log on failure.
/// Stays disabled when stdin is not a terminal, e.g. for piped input.
#[must_use]
pub fn set_terminal_raw() -> RawLock {
    if !io::stdin().is_terminal() {
        debug!("stdin is not a terminal, raw mode not enabled");
        return RawLock { enabled: false };
    }
    match terminal::enable_raw_mode() {
        Ok(()) => RawLock { enabled: true },
        Err(e) => {
            warn!("Could not set terminal to raw mode: {e}");
            RawLock { enabled: false }
        }
    }
}

/// Output for a terminal in raw mode, where `\n` no longer returns the cursor to column 0.
///
/// Translates `\n` to `\r\n` when `translate_newlines` is set and flushes after every write.
pub struct RawModeWriter<W: Write> {
    inner: W,
    translate_newlines: bool,
}

impl<W: Write> RawModeWriter<W> {
    pub const fn new(inner: W, translate_newlines: bool) -> Self {
        Self {
            inner,
            translate_newlines,
        }
    }
}

impl<W: Write> Write for RawModeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.translate_newlines {
            for part in buf.split_inclusive(|b| *b == b'\n') {
                match part.split_last() {
                    Some((b'\n', line)) => {
                        self.inner.write_all(line)?;
                        self.inner.write_all(b"\r\n")?;
                    }
                    _ => self.inner.write_all(part)?,
                }
            }
        } else {
            self.inner.write_all(buf)?;
        }
        self.inner.flush()?;
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
