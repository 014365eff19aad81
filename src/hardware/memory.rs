use crate::hardware::keyboard::KeyboardInputProvider;
use log::trace;
use std::fmt::{Debug, Formatter};
use std::io;
use std::ops::{Index, IndexMut};

/// Default start of user programs, the PC is initialized with it.
pub const PROGRAM_SECTION_START: u16 = 0x3000;
const MEMORY_SIZE_U16: usize = 1 << 16;

/// Memory regions mapped to IO functionality.
#[repr(u16)]
#[derive(enumn::N, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMappedIOLocations {
    /// Keyboard Status Register
    Kbsr = 0xFE00,
    /// Keyboard Data Register
    Kbdr = 0xFE02,
}

/// The LC-3 address space of 65536 words including the memory mapped keyboard registers.
///
/// Indexing gives raw access to the storage without any memory mapped IO side effects,
/// [`Memory::read`] is what executing instructions use.
pub struct Memory {
    /// Index equals memory address
    data: Vec<u16>,
    keyboard: Box<dyn KeyboardInputProvider>,
}

impl Debug for Memory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KBSR: {:#06X}, KBDR: {:#06X}, Program section start: {:04X?}",
            self[MemoryMappedIOLocations::Kbsr as u16],
            self[MemoryMappedIOLocations::Kbdr as u16],
            &self.data[usize::from(PROGRAM_SECTION_START)..usize::from(PROGRAM_SECTION_START) + 8]
        )
    }
}
impl Index<u16> for Memory {
    type Output = u16;
    fn index(&self, index: u16) -> &Self::Output {
        &self.data[usize::from(index)]
    }
}
impl IndexMut<u16> for Memory {
    fn index_mut(&mut self, index: u16) -> &mut Self::Output {
        &mut self.data[usize::from(index)]
    }
}
impl Memory {
    const KEYBOARD_STATUS_REGISTER_SET: u16 = 1 << 15;
    const KEYBOARD_STATUS_REGISTER_UNSET: u16 = 0;

    #[must_use]
    pub fn new(keyboard: Box<dyn KeyboardInputProvider>) -> Self {
        Self {
            data: vec![0x0u16; MEMORY_SIZE_U16],
            keyboard,
        }
    }
    pub fn set_keyboard(&mut self, keyboard: Box<dyn KeyboardInputProvider>) {
        self.keyboard = keyboard;
    }
    /// Reads the word at `address`.
    ///
    /// Reading the keyboard status register polls the keyboard: if input is available the
    /// status register is set to `0x8000` and the data register receives the input byte,
    /// otherwise the status register is cleared.
    ///
    /// # Errors
    /// - the keyboard could not be polled or read
    pub fn read(&mut self, address: u16) -> io::Result<u16> {
        if MemoryMappedIOLocations::n(address) == Some(MemoryMappedIOLocations::Kbsr) {
            self.poll_keyboard()?;
        }
        Ok(self[address])
    }
    /// Writes `value` to `address`, the keyboard registers are plain storage for writes.
    pub fn write(&mut self, address: u16, value: u16) {
        self[address] = value;
    }
    fn poll_keyboard(&mut self) -> io::Result<()> {
        if self.keyboard.check_input_available()? {
            let b = self.keyboard.read_input_byte()?;
            trace!("Keyboard: polled {b:#04X}");
            self[MemoryMappedIOLocations::Kbsr as u16] = Self::KEYBOARD_STATUS_REGISTER_SET;
            self[MemoryMappedIOLocations::Kbdr as u16] = u16::from(b);
        } else {
            self[MemoryMappedIOLocations::Kbsr as u16] = Self::KEYBOARD_STATUS_REGISTER_UNSET;
        }
        Ok(())
    }
    /// Copies `words` into consecutive addresses starting at `origin`.
    ///
    /// Words that would lie past the end of the address space are dropped,
    /// returns the number of words actually written.
    pub fn load_words(&mut self, origin: u16, words: &[u16]) -> usize {
        let start = usize::from(origin);
        let count = words.len().min(MEMORY_SIZE_U16 - start);
        self.data[start..start + count].copy_from_slice(&words[..count]);
        count
    }
    /// Blocking read of one input byte, used by the character input traps.
    ///
    /// # Errors
    /// - the keyboard could not be read
    pub fn read_keyboard_byte(&mut self) -> io::Result<u8> {
        self.keyboard.read_input_byte()
    }
}
