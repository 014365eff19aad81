use crate::emulator::Emulator;
use crate::errors::ExecutionError;
use crate::hardware::keyboard::ScriptedKeyboard;
use crate::hardware::memory::{Memory, PROGRAM_SECTION_START};
use crate::hardware::registers::Registers;
use std::io;
use std::io::Write;

pub struct StringWriter {
    vec: Vec<u8>,
}
impl Write for StringWriter {
    fn write(&mut self, data: &[u8]) -> Result<usize, io::Error> {
        self.vec.write(data)
    }
    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}
impl StringWriter {
    pub fn new() -> Self {
        let vec = Vec::<u8>::with_capacity(120);
        Self { vec }
    }
    pub fn get_string(&self) -> String {
        String::from_utf8(self.vec.clone()).unwrap()
    }
}

/// Output that rejects every write.
pub struct FailingWriter;
impl Write for FailingWriter {
    fn write(&mut self, _data: &[u8]) -> Result<usize, io::Error> {
        Err(io::Error::other("output closed"))
    }
    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}

/// Memory with `program_no_header` loaded at `0x3000` and a keyboard delivering `input`.
pub fn create_memory(program_no_header: &[u16], input: &[u8]) -> Memory {
    let mut mem = Memory::new(Box::new(ScriptedKeyboard::new(input)));
    mem.load_words(PROGRAM_SECTION_START, program_no_header);
    mem
}

pub struct FakeEmulator {
    inner: Emulator,
    stdout: StringWriter,
}
impl FakeEmulator {
    pub fn new(program_no_header: &[u16]) -> Self {
        let mut program = Vec::with_capacity(program_no_header.len() + 1);
        program.push(PROGRAM_SECTION_START);
        program.extend_from_slice(program_no_header);

        let mut emu = Emulator::new(Box::new(ScriptedKeyboard::default()));
        emu.load_program(program.as_slice()).unwrap();
        Self {
            inner: emu,
            stdout: StringWriter::new(),
        }
    }
    pub fn add_stdin_input(&mut self, input: &[u8]) -> &mut Self {
        self.inner
            .memory
            .set_keyboard(Box::new(ScriptedKeyboard::new(input)));
        self
    }
    pub fn get_parts(&mut self) -> (&mut Registers, &mut Memory, &mut StringWriter) {
        (
            &mut self.inner.registers,
            &mut self.inner.memory,
            &mut self.stdout,
        )
    }
    pub fn execute(&mut self) -> Result<(), ExecutionError> {
        self.inner.execute(&mut self.stdout)
    }
    pub const fn emulator(&mut self) -> &mut Emulator {
        &mut self.inner
    }
    pub fn output(&self) -> String {
        self.stdout.get_string()
    }
}
