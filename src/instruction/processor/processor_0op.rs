//! 0OP instruction handlers
use crate::{error::*, fatal_error, instruction::Instruction, text, zmachine::ZMachine};

use super::{branch, return_routine};

pub fn rtrue(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    return_routine(zmachine, 1)
}

pub fn rfalse(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    return_routine(zmachine, 0)
}

/// Decode the literal text trailing the instruction, advancing the PC past
/// it.
fn literal(zmachine: &mut ZMachine) -> Result<Vec<u16>, RuntimeError> {
    let ztext = zmachine.string_literal(zmachine.pc())?;
    zmachine.set_pc(zmachine.pc() + (ztext.len() * 2));
    text::from_vec(zmachine, &ztext, false)
}

pub fn print(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    let text = literal(zmachine)?;
    zmachine.print(&text);
    Ok(())
}

pub fn print_ret(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    let text = literal(zmachine)?;
    zmachine.print(&text);
    zmachine.new_line();
    return_routine(zmachine, 1)
}

pub fn nop(_zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    Ok(())
}

pub fn save(_zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    fatal_error!(ErrorCode::UnimplementedInstruction, "SAVE is not implemented")
}

pub fn restore(_zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    fatal_error!(
        ErrorCode::UnimplementedInstruction,
        "RESTORE is not implemented"
    )
}

pub fn restart(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    zmachine.reset()
}

pub fn ret_popped(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    let value = zmachine.pop()?;
    return_routine(zmachine, value)
}

pub fn pop(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    zmachine.pop()?;
    Ok(())
}

pub fn quit(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    zmachine.halt();
    Ok(())
}

pub fn new_line(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    zmachine.new_line();
    Ok(())
}

pub fn verify(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    branch(zmachine, true)
}

pub fn piracy(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<(), RuntimeError> {
    branch(zmachine, true)
}
