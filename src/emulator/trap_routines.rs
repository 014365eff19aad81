use crate::emulator::opcodes::Step;
use crate::errors::ExecutionError;
use crate::hardware::memory::Memory;
use crate::hardware::registers::{Registers, from_binary};
use log::debug;
use std::io;
use std::io::Write;
use std::ops::ControlFlow;

/// Trap vectors of the built-in service routines.
#[repr(u8)]
#[derive(enumn::N, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapVector {
    GetC = 0x20,
    Out = 0x21,
    PutS = 0x22,
    In = 0x23,
    PutSp = 0x24,
    Halt = 0x25,
}

pub const IN_PROMPT: &str = "Enter a character: ";
pub const HALT_MESSAGE: &str = "\nProgram halted\n";

/// Runs the service routine selected by `vector`.
///
/// Vectors without a routine are fatal.
pub fn dispatch(
    vector: u8,
    regs: &mut Registers,
    mem: &mut Memory,
    stdout: &mut dyn Write,
) -> Step {
    let Some(trap) = TrapVector::n(vector) else {
        return ControlFlow::Break(Err(ExecutionError::UnknownTrapVector {
            vector,
            address: regs.pc().wrapping_sub(1),
        }));
    };
    debug!("TRAP {trap:?} at {:#06X}", regs.pc().wrapping_sub(1));
    match trap {
        TrapVector::GetC => get_c(regs, mem),
        TrapVector::Out => out(regs, stdout),
        TrapVector::PutS => put_s(regs, mem, stdout),
        TrapVector::In => in_trap(regs, mem, stdout),
        TrapVector::PutSp => put_sp(regs, mem, stdout),
        TrapVector::Halt => halt(stdout),
    }
}

fn read_character_into_r0(regs: &mut Registers, mem: &mut Memory) -> io::Result<u8> {
    let b = mem.read_keyboard_byte()?;
    regs.set(0, from_binary(u16::from(b)));
    regs.update_conditional_register(0);
    Ok(b)
}

/// GETC: Read a single character from the keyboard. The character is not echoed onto the console.
///
/// Its ASCII code is copied into R0. The high eight bits of R0 are cleared.
pub fn get_c(regs: &mut Registers, mem: &mut Memory) -> Step {
    match read_character_into_r0(regs, mem) {
        Ok(_) => ControlFlow::Continue(()),
        Err(e) => wrap_io_error_in_cf(e),
    }
}

/// IN: Print a prompt on the screen and read a single character echoed back from the keyboard.
///
/// Otherwise, like 0x20 GETC.
pub fn in_trap(regs: &mut Registers, mem: &mut Memory, stdout: &mut dyn Write) -> Step {
    write_out(IN_PROMPT.as_bytes(), stdout)?;
    match read_character_into_r0(regs, mem) {
        Ok(b) => write_out(&[b], stdout),
        Err(e) => wrap_io_error_in_cf(e),
    }
}

/// OUT: Write a character in R0[7:0] to the console display.
pub fn out(regs: &Registers, stdout: &mut dyn Write) -> Step {
    write_out(&[low_byte(regs.get(0).as_binary())], stdout)
}

const fn low_byte(word: u16) -> u8 {
    word.to_le_bytes()[0]
}

fn put_one_char_per_u16(input: u16, append_to: &mut Vec<u8>) {
    append_to.push(low_byte(input));
}

fn put_two_chars_per_u16(input: u16, append_to: &mut Vec<u8>) {
    let [low, high] = input.to_le_bytes();
    append_to.push(low);
    if high != 0 {
        append_to.push(high);
    }
}

/// Writes the zero terminated string starting at the address in R0.
///
/// Reads storage directly, so strings never trigger memory mapped IO.
/// Without a zero word the output stops after one pass over the whole address space.
fn put(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut dyn Write,
    handle_char: fn(u16, &mut Vec<u8>),
) -> Step {
    let mut address = regs.get(0).as_binary();
    let mut s = Vec::with_capacity(120);
    for _ in 0..=u16::MAX {
        if mem[address] == 0 {
            break;
        }
        handle_char(mem[address], &mut s);
        address = address.wrapping_add(1);
    }
    write_out(&s, stdout)
}

/// PUTS: print null-delimited char* from register 0's address
pub fn put_s(regs: &Registers, mem: &Memory, stdout: &mut dyn Write) -> Step {
    put(regs, mem, stdout, put_one_char_per_u16)
}

/// PUTSP: Packed version of PUTS
///
/// The ASCII code contained in bits [7:0] of a memory location is written to the console first.
/// The second character of the last memory location can be 0x00.
/// Writing terminates with a 0x000 char.
pub fn put_sp(regs: &Registers, mem: &Memory, stdout: &mut dyn Write) -> Step {
    put(regs, mem, stdout, put_two_chars_per_u16)
}

/// HALT: End program and stdout a message
pub fn halt(stdout: &mut dyn Write) -> Step {
    write_out(HALT_MESSAGE.as_bytes(), stdout)?;
    ControlFlow::Break(Ok(()))
}

fn write_out(data: &[u8], stdout: &mut dyn Write) -> Step {
    match stdout.write_all(data).and_then(|()| stdout.flush()) {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => wrap_io_error_in_cf(e),
    }
}

fn wrap_io_error_in_cf(error: io::Error) -> Step {
    ControlFlow::Break(Err(ExecutionError::from(error)))
}
