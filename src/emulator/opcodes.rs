//! Implemented operations for the LC 3.
use crate::emulator::instruction::{Instruction, Opcode};
use crate::emulator::trap_routines;
use crate::errors::ExecutionError;
use crate::hardware::memory::Memory;
use crate::hardware::registers::{Registers, from_binary};
use std::io;
use std::io::Write;
use std::ops::ControlFlow;

/// Outcome of executing one instruction: `Continue` to fetch the next one,
/// `Break(Ok)` after `HALT`, `Break(Err)` on a fatal error.
pub type Step = ControlFlow<Result<(), ExecutionError>>;

/// Execution rule of one opcode.
pub type Rule = fn(Instruction, &mut Registers, &mut Memory, &mut dyn Write) -> Step;

/// Execution rules indexed by the 4 bit opcode.
pub const DISPATCH_TABLE: [Rule; 16] = [
    |i, r, _, _| {
        br(i, r);
        ControlFlow::Continue(())
    },
    |i, r, _, _| {
        add(i, r);
        ControlFlow::Continue(())
    },
    |i, r, m, _| continue_or_break(ld(i, r, m)),
    |i, r, m, _| {
        st(i, r, m);
        ControlFlow::Continue(())
    },
    |i, r, _, _| {
        jsr(i, r);
        ControlFlow::Continue(())
    },
    |i, r, _, _| {
        and(i, r);
        ControlFlow::Continue(())
    },
    |i, r, m, _| continue_or_break(ldr(i, r, m)),
    |i, r, m, _| {
        str(i, r, m);
        ControlFlow::Continue(())
    },
    |i, r, _, _| ControlFlow::Break(Err(illegal(i, r))),
    |i, r, _, _| {
        not(i, r);
        ControlFlow::Continue(())
    },
    |i, r, m, _| continue_or_break(ldi(i, r, m)),
    |i, r, m, _| continue_or_break(sti(i, r, m)),
    |i, r, _, _| {
        jmp_or_ret(i, r);
        ControlFlow::Continue(())
    },
    |i, r, _, _| ControlFlow::Break(Err(illegal(i, r))),
    |i, r, _, _| {
        lea(i, r);
        ControlFlow::Continue(())
    },
    trap,
];

/// Executes `i` with the rule selected by its opcode.
pub fn execute(i: Instruction, r: &mut Registers, memory: &mut Memory, stdout: &mut dyn Write) -> Step {
    DISPATCH_TABLE[usize::from(i.op_code())](i, r, memory, stdout)
}

fn continue_or_break(result: io::Result<()>) -> Step {
    match result {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => ControlFlow::Break(Err(e.into())),
    }
}

/// RTI and the reserved opcode: fatal, there is no supervisor mode or interrupt support.
fn illegal(i: Instruction, r: &Registers) -> ExecutionError {
    ExecutionError::IllegalOpcode {
        opcode: i.op_code(),
        address: r.pc().wrapping_sub(1),
    }
}

/// ADD: Mathematical addition in 2 variants
/// - DR is set with result of SR 1 + SR 2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0001 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set with result of SR 1 + sign extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0001 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn add(i: Instruction, r: &mut Registers) {
    let operand = if i.is_immediate() {
        i.get_immediate()
    } else {
        r.get(i.sr2_number()).as_binary()
    };
    r.set(
        i.dr_number(),
        from_binary(r.get(i.sr1_number()).as_binary().wrapping_add(operand)),
    );
    r.update_conditional_register(i.dr_number());
}
/// AND: bit-wise AND in 2 variants
/// - DR is set with result of SR 1 AND SR 2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0101 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set with result of SR 1 AND sign extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0101 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn and(i: Instruction, r: &mut Registers) {
    let operand = if i.is_immediate() {
        i.get_immediate()
    } else {
        r.get(i.sr2_number()).as_binary()
    };
    r.set(
        i.dr_number(),
        from_binary(r.get(i.sr1_number()).as_binary() & operand),
    );
    r.update_conditional_register(i.dr_number());
}

/// NOT: bit-wise complement of the value in SR 1
/// ```text
///  15__12__11_9__8_6___5___0_
/// | 1001 |  DR | SR1 | 11111 |
///  --------------------------
/// ```
pub fn not(i: Instruction, r: &mut Registers) {
    r.set(
        i.dr_number(),
        from_binary(!r.get(i.sr1_number()).as_binary()),
    );
    r.update_conditional_register(i.dr_number());
}
/// BR: Conditional Branch
/// This opcode adds the value of the sign extended offset to PC if the current
/// [`ConditionFlag`](crate::hardware::ConditionFlag) matches a set bit of `n`, `z` or `p`.
/// With none of the bits set the branch is never taken.
/// ```text
///  15__12__11_9___8_______0_
/// | 0000 |  nzp | PCoffset9 |
///  -------------------------
/// ```
pub fn br(i: Instruction, r: &mut Registers) {
    if i.nzp() & (r.get_conditional_register() as u8) != 0 {
        r.set_pc(address_by_pc_offset(i, r));
    }
}
/// JSR: Jump to Sub-Routine.
/// Two variants:
/// - JSR to `PCOffset11`
/// ```text
///  15__12__11_10_________0
/// | 0100 | 1 | PCOffset11 |
///  -----------------------
/// ```
/// - JSRR: JSR to location in `BaseR`
/// ```text
///  15__12__11_9__8___6___5____0_
/// | 0100 | 000 | BaseR | 000000 |
///  -----------------------------
/// ```
/// The former PC is saved in R7 before the target is computed,
/// so `JSRR R7` continues with the next instruction.
pub fn jsr(i: Instruction, r: &mut Registers) {
    r.set(7, from_binary(r.pc()));
    let target = if i.get_bit(11) {
        r.pc().wrapping_add(i.pc_offset(11))
    } else {
        r.get(i.sr1_number()).as_binary()
    };
    r.set_pc(target);
}
/// JMP or RET operation.
/// - JMP sets the PC to the value of register `BaseR`
/// ```text
///  15__12__11_9___8_6____5____0_
/// | 1100 | 000 | BaseR | 000000 |
///  -----------------------------
/// ```
/// - RET same as JMP, but special case for returning from JSR where former PC is saved in R7.
/// ```text
///  15__12__11_9__8_6___5____0_
/// | 1100 | 000 | 111 | 000000 |
///  ---------------------------
/// ```
pub fn jmp_or_ret(i: Instruction, r: &mut Registers) {
    r.set_pc(r.get(i.sr1_number()).as_binary());
}

/// LD: Loads content of memory address of PC + sign extended offset into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 0010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
///
/// # Errors
/// - polling the keyboard failed when loading from the keyboard status register
pub fn ld(i: Instruction, r: &mut Registers, memory: &mut Memory) -> io::Result<()> {
    let value = memory.read(address_by_pc_offset(i, r))?;
    r.set(i.dr_number(), from_binary(value));
    r.update_conditional_register(i.dr_number());
    Ok(())
}

/// LDI: Load indirect.
/// Calculates memory address of PC + sign extended offset and reads another address from there,
/// the content of the memory at that indirectly loaded address is put into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
///
/// # Errors
/// - polling the keyboard failed when loading from the keyboard status register
pub fn ldi(i: Instruction, r: &mut Registers, memory: &mut Memory) -> io::Result<()> {
    let value_address = memory.read(address_by_pc_offset(i, r))?;
    let value = memory.read(value_address)?;
    r.set(i.dr_number(), from_binary(value));
    r.update_conditional_register(i.dr_number());
    Ok(())
}
/// LDR: Load address from base register and adds sign extended offset to load the memory content
/// from there into DR.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0110 |  DR | BaseR | offset6 |
///  ------------------------------
/// ```
///
/// # Errors
/// - polling the keyboard failed when loading from the keyboard status register
pub fn ldr(i: Instruction, r: &mut Registers, memory: &mut Memory) -> io::Result<()> {
    let value = memory.read(address_by_baser_offset(i, r))?;
    r.set(i.dr_number(), from_binary(value));
    r.update_conditional_register(i.dr_number());
    Ok(())
}

fn address_by_pc_offset(i: Instruction, r: &Registers) -> u16 {
    r.pc().wrapping_add(i.pc_offset(9))
}
fn address_by_baser_offset(i: Instruction, r: &Registers) -> u16 {
    r.get(i.sr1_number())
        .as_binary()
        .wrapping_add(i.pc_offset(6))
}

/// LEA: Load Effective Address loads PC + sign extended offset into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1110 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn lea(i: Instruction, r: &mut Registers) {
    r.set(i.dr_number(), from_binary(address_by_pc_offset(i, r)));
    r.update_conditional_register(i.dr_number());
}
/// ST: Store. The contents of the SR are written to memory address PC + sign extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 0011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
pub fn st(i: Instruction, r: &Registers, memory: &mut Memory) {
    memory.write(address_by_pc_offset(i, r), r.get(i.dr_number()).as_binary());
}
/// STI: Store Indirect. The contents of the SR are written to the address which is loaded from
/// memory address PC + sign extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 1011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
///
/// # Errors
/// - polling the keyboard failed when the pointer is read from the keyboard status register
pub fn sti(i: Instruction, r: &Registers, memory: &mut Memory) -> io::Result<()> {
    let store_address = memory.read(address_by_pc_offset(i, r))?;
    memory.write(store_address, r.get(i.dr_number()).as_binary());
    Ok(())
}
/// STR: Store contents of SR to memory address of base register plus sign extended offset.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0111 |  SR | BaseR | offset6 |
///  ------------------------------
/// ```
pub fn str(i: Instruction, r: &Registers, memory: &mut Memory) {
    memory.write(address_by_baser_offset(i, r), r.get(i.dr_number()).as_binary());
}
/// TRAP: System call. The PC is saved in R7, the trap vector selects the service routine.
/// ```text
///  15__12__11__8___7_______0_
/// | 1111 | 0000 | trapvect8 |
///  -------------------------
/// ```
/// See [`trap_routines`] for the routines.
pub fn trap(i: Instruction, r: &mut Registers, memory: &mut Memory, stdout: &mut dyn Write) -> Step {
    debug_assert_eq!(Opcode::n(i.op_code()), Some(Opcode::Trap));
    r.set(7, from_binary(r.pc()));
    trap_routines::dispatch(i.trap_vector(), r, memory, stdout)
}
