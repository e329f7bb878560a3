//! Instruction dispatch and the store, branch, call and return tails
use crate::zmachine::ZMachine;
use crate::{error::*, fatal_error};

use super::*;

mod processor_0op;
mod processor_1op;
mod processor_2op;
mod processor_var;

/// Execute a decoded instruction.
///
/// The dispatch table is a closed match per operand count and opcode
/// number; an unmapped opcode is fatal. `SAVE` and `RESTORE` are declared
/// but fail predictably.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `instruction` - Decoded [Instruction]
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn dispatch(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    match instruction.opcode().operand_count() {
        OperandCount::_0OP => match instruction.opcode().instruction() {
            0x0 => processor_0op::rtrue(zmachine, instruction),
            0x1 => processor_0op::rfalse(zmachine, instruction),
            0x2 => processor_0op::print(zmachine, instruction),
            0x3 => processor_0op::print_ret(zmachine, instruction),
            0x4 => processor_0op::nop(zmachine, instruction),
            0x5 => processor_0op::save(zmachine, instruction),
            0x6 => processor_0op::restore(zmachine, instruction),
            0x7 => processor_0op::restart(zmachine, instruction),
            0x8 => processor_0op::ret_popped(zmachine, instruction),
            0x9 => processor_0op::pop(zmachine, instruction),
            0xA => processor_0op::quit(zmachine, instruction),
            0xB => processor_0op::new_line(zmachine, instruction),
            0xD => processor_0op::verify(zmachine, instruction),
            // the extended-form marker byte occupies this slot
            0xE => fatal_error!(
                ErrorCode::UnimplementedInstruction,
                "Extended-form opcodes are not available"
            ),
            0xF => processor_0op::piracy(zmachine, instruction),
            _ => fatal_error!(
                ErrorCode::InvalidInstruction,
                "Unmapped instruction: {}",
                instruction
            ),
        },
        OperandCount::_1OP => match instruction.opcode().instruction() {
            0x0 => processor_1op::jz(zmachine, instruction),
            0x1 => processor_1op::get_sibling(zmachine, instruction),
            0x2 => processor_1op::get_child(zmachine, instruction),
            0x3 => processor_1op::get_parent(zmachine, instruction),
            0x4 => processor_1op::get_prop_len(zmachine, instruction),
            0x5 => processor_1op::inc(zmachine, instruction),
            0x6 => processor_1op::dec(zmachine, instruction),
            0x7 => processor_1op::print_addr(zmachine, instruction),
            0x9 => processor_1op::remove_obj(zmachine, instruction),
            0xA => processor_1op::print_obj(zmachine, instruction),
            0xB => processor_1op::ret(zmachine, instruction),
            0xC => processor_1op::jump(zmachine, instruction),
            0xD => processor_1op::print_paddr(zmachine, instruction),
            0xE => processor_1op::load(zmachine, instruction),
            0xF => processor_1op::not(zmachine, instruction),
            _ => fatal_error!(
                ErrorCode::InvalidInstruction,
                "Unmapped instruction: {}",
                instruction
            ),
        },
        OperandCount::_2OP => match instruction.opcode().instruction() {
            0x01 => processor_2op::je(zmachine, instruction),
            0x02 => processor_2op::jl(zmachine, instruction),
            0x03 => processor_2op::jg(zmachine, instruction),
            0x04 => processor_2op::dec_chk(zmachine, instruction),
            0x05 => processor_2op::inc_chk(zmachine, instruction),
            0x06 => processor_2op::jin(zmachine, instruction),
            0x07 => processor_2op::test(zmachine, instruction),
            0x08 => processor_2op::or(zmachine, instruction),
            0x09 => processor_2op::and(zmachine, instruction),
            0x0A => processor_2op::test_attr(zmachine, instruction),
            0x0B => processor_2op::set_attr(zmachine, instruction),
            0x0C => processor_2op::clear_attr(zmachine, instruction),
            0x0D => processor_2op::store(zmachine, instruction),
            0x0E => processor_2op::insert_obj(zmachine, instruction),
            0x0F => processor_2op::loadw(zmachine, instruction),
            0x10 => processor_2op::loadb(zmachine, instruction),
            0x11 => processor_2op::get_prop(zmachine, instruction),
            0x12 => processor_2op::get_prop_addr(zmachine, instruction),
            0x13 => processor_2op::get_next_prop(zmachine, instruction),
            0x14 => processor_2op::add(zmachine, instruction),
            0x15 => processor_2op::sub(zmachine, instruction),
            0x16 => processor_2op::mul(zmachine, instruction),
            0x17 => processor_2op::div(zmachine, instruction),
            0x18 => processor_2op::modulus(zmachine, instruction),
            _ => fatal_error!(
                ErrorCode::InvalidInstruction,
                "Unmapped instruction: {}",
                instruction
            ),
        },
        OperandCount::_VAR => match instruction.opcode().instruction() {
            0x00 => processor_var::call(zmachine, instruction),
            0x01 => processor_var::storew(zmachine, instruction),
            0x02 => processor_var::storeb(zmachine, instruction),
            0x03 => processor_var::put_prop(zmachine, instruction),
            0x04 => processor_var::sread(zmachine, instruction),
            0x05 => processor_var::print_char(zmachine, instruction),
            0x06 => processor_var::print_num(zmachine, instruction),
            0x07 => processor_var::random(zmachine, instruction),
            0x08 => processor_var::push(zmachine, instruction),
            0x09 => processor_var::pull(zmachine, instruction),
            _ => fatal_error!(
                ErrorCode::InvalidInstruction,
                "Unmapped instruction: {}",
                instruction
            ),
        },
    }
}

/// Run a store tail: the byte at the PC names the destination variable.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `value` - Value to store
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn store_result(zmachine: &mut ZMachine, value: u16) -> Result<(), RuntimeError> {
    let variable = zmachine.next_byte()?;
    zmachine.set_variable(variable, value)
}

/// Run a branch tail: read the 1- or 2-byte branch descriptor at the PC
/// and apply it.
///
/// The top bit of the descriptor is the polarity, bit 6 selects the short
/// form. A short descriptor carries a 6-bit unsigned offset; a long one a
/// 14-bit sign-extended offset. When the condition matches the polarity,
/// offsets 0 and 1 return false/true from the current routine and any other
/// offset moves the PC to `PC + offset - 2`.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `condition` - The instruction's predicate result
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn branch(zmachine: &mut ZMachine, condition: bool) -> Result<(), RuntimeError> {
    let descriptor = zmachine.next_byte()?;
    let polarity = descriptor & 0x80 == 0x80;
    let offset = if descriptor & 0x40 == 0x40 {
        (descriptor & 0x3F) as i16
    } else {
        let mut offset = (((descriptor & 0x3F) as u16) << 8) | zmachine.next_byte()? as u16;
        if offset & 0x2000 == 0x2000 {
            offset |= 0xC000;
        }
        offset as i16
    };

    if condition == polarity {
        match offset {
            0 => return_routine(zmachine, 0),
            1 => return_routine(zmachine, 1),
            _ => {
                let pc = (zmachine.pc() as isize + offset as isize - 2) as usize;
                debug!(target: "app::instruction", "Branch to ${:05x}", pc);
                zmachine.set_pc(pc);
                Ok(())
            }
        }
    } else {
        Ok(())
    }
}

/// Call a routine.
///
/// A packed address of 0 stores 0 and continues. Otherwise the frame is
/// pushed with the PC still pointing at the caller's store byte, which the
/// matching return consumes, and the callee's locals are pushed from the
/// declared defaults with any supplied arguments overriding them.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `packed` - Packed routine address
/// * `arguments` - Argument values
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn call_routine(
    zmachine: &mut ZMachine,
    packed: u16,
    arguments: &[u16],
) -> Result<(), RuntimeError> {
    if packed == 0 {
        return store_result(zmachine, 0);
    }

    let address = zmachine.unpack_routine_address(packed)?;
    debug!(target: "app::instruction", "Call routine @ ${:05x} with {} arguments", address, arguments.len());
    zmachine.push_frame(zmachine.pc())?;
    zmachine.set_pc(address);

    let count = zmachine.next_byte()?;
    if count > 15 {
        return fatal_error!(
            ErrorCode::InvalidRoutine,
            "Routine at {:#06x} declares {} local variables",
            address,
            count
        );
    }

    for i in 0..count as usize {
        let mut value = zmachine.next_word()?;
        if i < arguments.len() {
            value = arguments[i];
        }
        zmachine.push(value)?;
    }

    Ok(())
}

/// Return from the current routine.
///
/// The frame is popped, restoring the caller's PC at its store byte, and
/// the store tail is run with the return value.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `value` - Return value
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn return_routine(zmachine: &mut ZMachine, value: u16) -> Result<(), RuntimeError> {
    let return_pc = zmachine.pop_frame()?;
    debug!(target: "app::instruction", "Return {:04x} to ${:05x}", value, return_pc);
    zmachine.set_pc(return_pc);
    store_result(zmachine, value)
}
