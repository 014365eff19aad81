use crate::hardware::memory::PROGRAM_SECTION_START;
use crate::numbers;
use std::fmt::{Debug, Formatter};

/// Value of one of the general purpose registers.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub struct Register(u16);

impl Register {
    #[must_use]
    pub const fn from_binary(value: u16) -> Self {
        Self(value)
    }
    #[must_use]
    pub const fn from_decimal(value: i16) -> Self {
        Self(value.cast_unsigned())
    }
    #[must_use]
    pub const fn as_binary(self) -> u16 {
        self.0
    }
    #[must_use]
    pub const fn as_decimal(self) -> i16 {
        numbers::twos_complement_to_decimal(self.0)
    }
}
impl Debug for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06X} ({})", self.0, self.as_decimal())
    }
}

#[must_use]
pub const fn from_binary(value: u16) -> Register {
    Register::from_binary(value)
}
#[must_use]
pub const fn from_decimal(value: i16) -> Register {
    Register::from_decimal(value)
}

/// Condition flags, exactly one of them is active at any time.
///
/// The discriminants match the `nzp` bit positions used by `BR`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionFlag {
    /// Positive
    Pos = 1 << 0,
    Zero = 1 << 1,
    /// Negative
    Neg = 1 << 2,
}

impl From<u16> for ConditionFlag {
    fn from(value: u16) -> Self {
        if value == 0 {
            Self::Zero
        } else if value >> 15 == 1 {
            // leftmost bit is 1 for negative numbers
            Self::Neg
        } else {
            Self::Pos
        }
    }
}

/// The register file: R0 to R7, the program counter and the condition flags.
#[derive(Clone, PartialEq, Eq)]
pub struct Registers {
    general_purpose: [Register; 8],
    pc: u16,
    cond: ConditionFlag,
}
impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
impl Debug for Registers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PC: {:#06X}, COND: {:?}", self.pc, self.cond)?;
        for (idx, r) in self.general_purpose.iter().enumerate() {
            write!(f, ", R{idx}: {r:?}")?;
        }
        Ok(())
    }
}

impl Registers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            general_purpose: [Register(0); 8],
            pc: PROGRAM_SECTION_START,
            cond: ConditionFlag::Zero,
        }
    }

    /// # Panics
    /// - register number is greater than 7
    #[must_use]
    pub fn get(&self, r: u8) -> Register {
        assert!(r <= 7, "Invalid general purpose register get: {r}");
        self.general_purpose[usize::from(r)]
    }
    /// # Panics
    /// - register number is greater than 7
    pub fn set(&mut self, r: u8, value: Register) {
        assert!(r <= 7, "Invalid general purpose register set: {r}");
        self.general_purpose[usize::from(r)] = value;
    }
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }
    /// Advances the PC by one, wrapping around at the end of the address space.
    pub const fn inc_pc(&mut self) {
        self.pc = self.pc.wrapping_add(1);
    }
    #[must_use]
    pub const fn get_conditional_register(&self) -> ConditionFlag {
        self.cond
    }
    /// Sets the condition flags according to the current content of register `r`.
    pub fn update_conditional_register(&mut self, r: u8) {
        self.cond = ConditionFlag::from(self.get(r).as_binary());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;
    use yare::parameterized;

    #[parameterized(
        zero = { 0x0000, ConditionFlag::Zero },
        one = { 0x0001, ConditionFlag::Pos },
        max_positive = { 0x7FFF, ConditionFlag::Pos },
        min_negative = { 0x8000, ConditionFlag::Neg },
        minus_one = { 0xFFFF, ConditionFlag::Neg },
    )]
    fn test_update_conditional_register(value: u16, expected: ConditionFlag) {
        for r in 0..=7 {
            let mut regs = Registers::new();
            regs.set(r, from_binary(value));
            regs.update_conditional_register(r);
            assert_that!(regs.get_conditional_register(), eq(expected));
        }
    }

    #[gtest]
    pub fn test_exactly_one_flag_for_every_value() {
        for value in 0..=u16::MAX {
            let flag = ConditionFlag::from(value) as u8;
            expect_that!(flag.count_ones(), eq(1));
        }
    }
    #[gtest]
    pub fn test_initial_state() {
        let regs = Registers::new();
        expect_that!(regs.pc(), eq(0x3000));
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Zero));
        for r in 0..=7 {
            expect_that!(regs.get(r), eq(from_binary(0)));
        }
    }
    #[gtest]
    pub fn test_inc_pc_wraps() {
        let mut regs = Registers::new();
        regs.set_pc(0xFFFF);
        regs.inc_pc();
        expect_that!(regs.pc(), eq(0));
    }
    #[gtest]
    #[should_panic(expected = "Invalid general purpose register get: 8")]
    pub fn test_get_invalid_register() {
        let _ = Registers::new().get(8);
    }
}
