//! Machine state of the LC-3: address space, register file and the keyboard behind it.
pub mod keyboard;
pub mod memory;
pub mod registers;

pub use keyboard::{
    KeyboardInputProvider, ReaderInputProvider, ScriptedKeyboard, TerminalInputProvider,
};
pub use memory::Memory;
pub use registers::{ConditionFlag, Register, Registers};
