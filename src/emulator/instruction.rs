use crate::numbers;
use std::fmt::{Debug, Formatter};

/// The 16 LC-3 opcodes, the discriminant is the value of bits `[15:12]`.
#[repr(u8)]
#[derive(enumn::N, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Br = 0b0000,
    Add = 0b0001,
    Ld = 0b0010,
    St = 0b0011,
    Jsr = 0b0100,
    And = 0b0101,
    Ldr = 0b0110,
    Str = 0b0111,
    /// Return from interrupt, unsupported
    Rti = 0b1000,
    Not = 0b1001,
    Ldi = 0b1010,
    Sti = 0b1011,
    Jmp = 0b1100,
    /// Reserved
    Res = 0b1101,
    Lea = 0b1110,
    Trap = 0b1111,
}

/// Wrapper for LC-3 u16 instruction.
/// format is: `OOOO_DDD_P_PPPP_PPPP`
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Instruction(u16);

impl Instruction {
    /// Gives the value of only the specified bit range.
    ///
    /// # Parameters
    /// - `from`: starting index
    /// - `to`: end index (inclusive), mut be greater or equal to `from`
    ///
    /// # Panics
    /// - asserts that to is greater or equal from and both are valid indexes
    #[must_use]
    pub fn get_bit_range(self, from: u8, to: u8) -> u16 {
        debug_assert!(
            to >= from,
            "wrong direction of from: {from:?} and to: {to:?}"
        );
        debug_assert!(
            (0..u16::BITS).contains(&u32::from(to)),
            "index: {to:?} to u16 is greater than maximum value {:?}",
            u16::BITS - 1
        );
        let width = u32::from(to - from) + 1;
        let mask = u16::MAX.checked_shr(u16::BITS - width).unwrap_or(0);
        (self.0 >> from) & mask
    }
    /// Gives the value of a bit range of at most 8 bits as u8.
    /// See [`Instruction::get_bit_range()`]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "range is at most 8 bits wide"
    )]
    fn get_bit_range_u8(self, from: u8, to: u8) -> u8 {
        debug_assert!(to - from < 8, "bit range {from}..={to} does not fit into u8");
        self.get_bit_range(from, to) as u8
    }
    #[must_use]
    pub fn get_bit(self, index: u8) -> bool {
        self.get_bit_range(index, index) == 1
    }
    #[must_use]
    pub fn op_code(self) -> u8 {
        self.get_bit_range_u8(12, 15)
    }
    /// Destination register, also the source register of the store instructions.
    #[must_use]
    pub fn dr_number(self) -> u8 {
        self.get_bit_range_u8(9, 11)
    }
    /// First source register, also the base register of `LDR`, `STR`, `JMP` and `JSRR`.
    #[must_use]
    pub fn sr1_number(self) -> u8 {
        self.get_bit_range_u8(6, 8)
    }
    #[must_use]
    pub fn sr2_number(self) -> u8 {
        self.get_bit_range_u8(0, 2)
    }
    #[must_use]
    pub fn is_immediate(self) -> bool {
        self.get_bit(5)
    }
    /// Sign extended `imm5`.
    #[must_use]
    pub fn get_immediate(self) -> u16 {
        numbers::sign_extend(self.get_bit_range(0, 4), 5)
    }
    /// Sign extended offset of the lowest `len` bits, as bit pattern ready for wrapping addition.
    #[must_use]
    pub fn pc_offset(self, len: u8) -> u16 {
        numbers::sign_extend(self.get_bit_range(0, len - 1), len)
    }
    /// Condition mask `nzp` of `BR`, bit positions match [`crate::hardware::ConditionFlag`].
    #[must_use]
    pub fn nzp(self) -> u8 {
        self.get_bit_range_u8(9, 11)
    }
    #[must_use]
    pub fn trap_vector(self) -> u8 {
        self.get_bit_range_u8(0, 7)
    }
}

impl Debug for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match Opcode::n(self.op_code()) {
            Some(op) => write!(f, "{op:?} ({:#06X})", self.0),
            None => write!(f, "{:#06X}", self.0),
        }
    }
}

impl From<u16> for Instruction {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[expect(clippy::unusual_byte_groupings)]
    #[gtest]
    pub fn test_instr_get_bit_range_valid() {
        let sut = Instruction::from(0b1010_101_001010101);
        expect_that!(sut.op_code(), eq(0b1010));
        expect_that!(sut.dr_number(), eq(0b101));
        expect_that!(sut.pc_offset(9), eq(0b0_0101_0101));

        // Add: DR: 3, SR1: 2, Immediate: false, SR2: 1
        let sut = Instruction::from(0b0001_011_010_0_00_001);
        expect_that!(sut.op_code(), eq(1));
        expect_that!(sut.dr_number(), eq(3));
        expect_that!(sut.sr1_number(), eq(2));
        expect_that!(sut.sr2_number(), eq(1));
        expect_that!(sut.is_immediate(), eq(false));

        // Add: DR: 7, SR1: 0, Immediate: true, imm5: 14
        let sut = Instruction::from(0b0001_111_000_1_01110);
        expect_that!(sut.dr_number(), eq(7));
        expect_that!(sut.sr1_number(), eq(0));
        expect_that!(sut.is_immediate(), eq(true));
        expect_that!(sut.get_immediate(), eq(14));

        // Add: imm5: -3
        let sut = Instruction::from(0b0001_001_000_1_11101);
        expect_that!(sut.get_immediate(), eq(0xFFFD));
    }
    #[expect(clippy::unusual_byte_groupings)]
    #[gtest]
    pub fn test_instr_offsets_and_vectors() {
        // BR nzp: 101, PCoffset9: -1
        let sut = Instruction::from(0b0000_101_111111111);
        expect_that!(sut.nzp(), eq(0b101));
        expect_that!(sut.pc_offset(9), eq(0xFFFF));
        // JSR PCoffset11: -1024
        let sut = Instruction::from(0b0100_1_10000000000);
        expect_that!(sut.get_bit(11), eq(true));
        expect_that!(sut.pc_offset(11), eq(0xFC00));
        // TRAP x25
        let sut = Instruction::from(0xF025);
        expect_that!(Opcode::n(sut.op_code()), some(eq(Opcode::Trap)));
        expect_that!(sut.trap_vector(), eq(0x25));
        expect_that!(sut.get_bit_range(0, 15), eq(0xF025));
    }
    #[gtest]
    pub fn test_every_opcode_value_decodes() {
        for op in 0..16u8 {
            expect_that!(Opcode::n(op).map(|o| o as u8), some(eq(op)));
        }
    }
    #[gtest]
    #[should_panic(expected = "wrong direction of from: 2 and to: 1")]
    pub fn test_instr_get_bit_range_wrong_order() {
        let sut = Instruction::from(0b1010_1011_0101_0101);
        let _ = sut.get_bit_range(2, 1);
    }
    #[gtest]
    #[should_panic(expected = "index: 16 to u16 is greater than maximum value 15")]
    pub fn test_instr_get_bit_range_index_too_large() {
        let sut = Instruction::from(0b1010_1011_0101_0101);
        let _ = sut.get_bit_range(2, 16);
    }
}
