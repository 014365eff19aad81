//! # LC-3 Virtual Machine.
//!
//! `lc3-vm` runs programs for the LC-3 system: 65536 words of memory, 8 general purpose
//! registers, condition flags and trap routines for character I/O.
//! Usage starts with loading program images via `emulator::Emulator::load_image_file`.
//!
//!  # Example
//! ```
//! use lc3_vm::emulator::Emulator;
//! use lc3_vm::hardware::ScriptedKeyboard;
//!
//! let mut emu = Emulator::new(Box::new(ScriptedKeyboard::default()));
//! // .ORIG x3000: LEA R0, msg; PUTS; HALT; msg: "Hi"
//! let image = [
//!     0x30u8, 0x00, 0xE0, 0x02, 0xF0, 0x22, 0xF0, 0x25, 0x00, 0x48, 0x00, 0x69, 0x00, 0x00,
//! ];
//! emu.load_image_bytes(&image)?;
//! let mut output = Vec::<u8>::new();
//! emu.execute(&mut output)?;
//! assert_eq!(output, b"Hi\nProgram halted\n");
//! assert!(emu.is_halted());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//! # Errors
//! - Image cannot be read or is missing its origin address
//! - Execution reaches a reserved opcode or an unknown trap vector
//! - Reading input or writing output fails

pub mod emulator;
pub mod errors;
pub mod hardware;
pub(crate) mod numbers;
pub mod terminal;
