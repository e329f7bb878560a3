//! VAR instruction handlers
use crate::{error::*, instruction::Instruction, object::property, zmachine::ZMachine};

use super::{call_routine, store_result};

pub fn call(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let packed = instruction.operand(0);
    let arguments = instruction
        .operands()
        .iter()
        .skip(1)
        .map(|o| o.value())
        .collect::<Vec<u16>>();
    call_routine(zmachine, packed, &arguments)
}

pub fn storew(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    zmachine.write_table_word(
        instruction.operand(0) as usize,
        instruction.operand(1) as usize,
        instruction.operand(2),
    )
}

pub fn storeb(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    zmachine.write_table_byte(
        instruction.operand(0) as usize,
        instruction.operand(1) as usize,
        instruction.operand(2) as u8,
    )
}

pub fn put_prop(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    property::set_property(
        zmachine,
        instruction.operand(0) as usize,
        instruction.operand(1) as u8,
        instruction.operand(2),
    )
}

pub fn sread(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let text_buffer = instruction.operand(0) as usize;
    let parse_buffer = instruction.operand(1) as usize;
    match zmachine.dequeue_input() {
        Some(line) => zmachine.complete_read(text_buffer, parse_buffer, &line),
        None => {
            zmachine.request_read(text_buffer, parse_buffer);
            Ok(())
        }
    }
}

pub fn print_char(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    zmachine.print(&[instruction.operand(0)]);
    Ok(())
}

pub fn print_num(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let value = instruction.operand(0) as i16;
    zmachine.print_str(&value.to_string());
    Ok(())
}

pub fn random(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let range = instruction.operand(0) as i16;
    if range > 0 {
        let value = zmachine.random(range as u16);
        store_result(zmachine, value)
    } else {
        zmachine.seed_rng((-(range as i32)) as u16);
        store_result(zmachine, 0)
    }
}

pub fn push(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    zmachine.push(instruction.operand(0))
}

pub fn pull(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let variable = instruction.operand(0) as u8;
    let value = zmachine.pop()?;
    zmachine.set_variable_indirect(variable, value)
}
