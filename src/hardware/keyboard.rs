use crossterm::event::{Event, KeyCode, KeyModifiers, poll, read};
use std::collections::VecDeque;
use std::io;
use std::io::Read;
use std::time::Duration;

/// Providing Keyboard Input independent of an implementation.
pub trait KeyboardInputProvider {
    /// Checks if input is available, does not block.
    ///
    /// # Errors
    /// - the underlying device could not be polled
    /// - `io::ErrorKind::Interrupted` if the user requested termination
    fn check_input_available(&mut self) -> io::Result<bool>;
    /// Reads one byte of input, blocks until one is available.
    ///
    /// # Errors
    /// - the underlying device could not be read
    /// - `io::ErrorKind::Interrupted` if the user requested termination
    fn read_input_byte(&mut self) -> io::Result<u8>;
}

/// Keyboard input from the terminal via `crossterm` key events.
///
/// Only meaningful while the terminal is in raw mode, see [`crate::terminal::set_terminal_raw`].
#[derive(Debug, Default)]
pub struct TerminalInputProvider {
    pending: Option<u8>,
}
impl TerminalInputProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    fn byte_from_event(event: &Event) -> io::Result<Option<u8>> {
        let Some(key) = event.as_key_press_event() else {
            return Ok(None);
        };
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        Ok(match key.code {
            KeyCode::Char(c) => u8::try_from(c).ok().filter(u8::is_ascii),
            KeyCode::Enter => Some(b'\n'),
            KeyCode::Tab => Some(b'\t'),
            KeyCode::Backspace => Some(0x08),
            KeyCode::Esc => Some(0x1B),
            _ => None,
        })
    }
}
impl KeyboardInputProvider for TerminalInputProvider {
    fn check_input_available(&mut self) -> io::Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        while poll(Duration::ZERO)? {
            if let Some(b) = Self::byte_from_event(&read()?)? {
                self.pending = Some(b);
                return Ok(true);
            }
        }
        Ok(false)
    }
    fn read_input_byte(&mut self) -> io::Result<u8> {
        if let Some(b) = self.pending.take() {
            return Ok(b);
        }
        loop {
            if let Some(b) = Self::byte_from_event(&read()?)? {
                return Ok(b);
            }
        }
    }
}

/// Keyboard input read byte by byte from a plain reader, e.g. stdin connected to a pipe.
///
/// Checking for input blocks until the next byte or the end of input arrives, after the end
/// no input is ever available and reading fails with `io::ErrorKind::UnexpectedEof`.
#[derive(Debug)]
pub struct ReaderInputProvider<R: Read> {
    reader: R,
    pending: Option<u8>,
    at_end: bool,
}
impl<R: Read> ReaderInputProvider<R> {
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
            at_end: false,
        }
    }
    fn fill(&mut self) -> io::Result<()> {
        let mut b = [0; 1];
        while self.pending.is_none() && !self.at_end {
            match self.reader.read(&mut b) {
                Ok(0) => self.at_end = true,
                Ok(_) => self.pending = Some(b[0]),
                // signal arrived during the read, not a user request to stop
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
impl<R: Read> KeyboardInputProvider for ReaderInputProvider<R> {
    fn check_input_available(&mut self) -> io::Result<bool> {
        self.fill()?;
        Ok(self.pending.is_some())
    }
    fn read_input_byte(&mut self) -> io::Result<u8> {
        self.fill()?;
        self.pending
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"))
    }
}

/// Keyboard input fed from a predetermined byte sequence.
///
/// Reading past the end fails with `io::ErrorKind::UnexpectedEof` instead of blocking.
#[derive(Debug, Default, Clone)]
pub struct ScriptedKeyboard {
    input: VecDeque<u8>,
}
impl ScriptedKeyboard {
    #[must_use]
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
        }
    }
}
impl KeyboardInputProvider for ScriptedKeyboard {
    fn check_input_available(&mut self) -> io::Result<bool> {
        Ok(!self.input.is_empty())
    }
    fn read_input_byte(&mut self) -> io::Result<u8> {
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "keyboard input exhausted"))
    }
}
