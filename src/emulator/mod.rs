pub mod instruction;
pub mod opcodes;
#[cfg(test)]
pub(crate) mod test_helpers;
pub mod trap_routines;

use crate::emulator::instruction::Instruction;
use crate::emulator::opcodes::Step;
use crate::errors::{ExecutionError, LoadProgramError};
use crate::hardware::keyboard::KeyboardInputProvider;
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use log::{debug, trace, warn};
use std::fmt::{Debug, Formatter};
use std::fs;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;

/// The public facing emulator used to run LC-3 programs.
pub struct Emulator {
    pub(crate) memory: Memory,
    pub(crate) registers: Registers,
    halted: bool,
}

impl Debug for Emulator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Halted: {}, Registers: {:?}, Memory: {:?}",
            self.halted, self.registers, self.memory
        )
    }
}

/// Creates an emulator with all `paths` loaded in order.
///
/// # Errors
/// - an image could not be read or has no origin
pub fn from_images<P: AsRef<Path>>(
    paths: &[P],
    keyboard: Box<dyn KeyboardInputProvider>,
) -> Result<Emulator, LoadProgramError> {
    let mut emu = Emulator::new(keyboard);
    for path in paths {
        emu.load_image_file(path)?;
    }
    Ok(emu)
}

impl Emulator {
    /// Empty memory, PC at `0x3000` and condition flag `Zero`.
    #[must_use]
    pub fn new(keyboard: Box<dyn KeyboardInputProvider>) -> Self {
        Self {
            memory: Memory::new(keyboard),
            registers: Registers::new(),
            halted: false,
        }
    }

    /// Loads an image file: a big endian origin address followed by big endian words.
    ///
    /// Later loads overwrite earlier ones where they overlap.
    ///
    /// # Errors
    /// - the file could not be read
    /// - the file is shorter than the origin address
    pub fn load_image_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadProgramError> {
        let name = path.as_ref().display().to_string();
        let bytes = fs::read(path.as_ref()).map_err(|e| LoadProgramError::from_io(&name, &e))?;
        self.load_image(&name, &bytes)
    }

    /// Loads an image already read into memory, see [`Emulator::load_image_file`].
    ///
    /// # Errors
    /// - `bytes` is shorter than the origin address
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> Result<(), LoadProgramError> {
        self.load_image("<bytes>", bytes)
    }

    fn load_image(&mut self, name: &str, bytes: &[u8]) -> Result<(), LoadProgramError> {
        // a trailing odd byte is not a complete word and is dropped
        let words: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        self.place(name, &words)
    }

    /// Loads a program already converted to words, the first word is the origin address.
    ///
    /// # Errors
    /// - `program` is empty
    pub fn load_program(&mut self, program: &[u16]) -> Result<(), LoadProgramError> {
        self.place("<program>", program)
    }

    fn place(&mut self, name: &str, program: &[u16]) -> Result<(), LoadProgramError> {
        let Some((&origin, rest)) = program.split_first() else {
            return Err(LoadProgramError::MissingOrigin {
                path: name.to_owned(),
            });
        };
        let written = self.memory.load_words(origin, rest);
        if written < rest.len() {
            warn!(
                "{name}: {} words past the end of memory dropped",
                rest.len() - written
            );
        }
        debug!("{name}: loaded {written} words at {origin:#06X}");
        Ok(())
    }

    /// Executes one instruction. Once halted, nothing is fetched anymore.
    pub fn step(&mut self, stdout: &mut dyn Write) -> Step {
        if self.halted {
            return ControlFlow::Break(Ok(()));
        }
        let pc = self.registers.pc();
        let res = match self.memory.read(pc) {
            Ok(bits) => {
                let instruction = Instruction::from(bits);
                trace!("PC: {pc:#06X}: {instruction:?}");
                self.registers.inc_pc();
                opcodes::execute(instruction, &mut self.registers, &mut self.memory, stdout)
            }
            Err(e) => ControlFlow::Break(Err(e.into())),
        };
        if res.is_break() {
            self.halted = true;
        }
        res
    }

    /// Runs the fetch-decode-execute loop until `HALT`.
    ///
    /// # Errors
    /// - illegal opcode or unknown trap vector
    /// - reading input or writing output failed
    /// - execution was interrupted by the user
    pub fn execute(&mut self, stdout: &mut impl Write) -> Result<(), ExecutionError> {
        loop {
            if let ControlFlow::Break(result) = self.step(stdout) {
                return result;
            }
        }
    }

    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }
    /// Resets registers and the halted state, memory is kept so the program can run again.
    pub fn reset_registers(&mut self) {
        self.registers = Registers::new();
        self.halted = false;
    }
}
