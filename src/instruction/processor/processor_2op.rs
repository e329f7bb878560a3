//! 2OP instruction handlers
use crate::{
    error::*, fatal_error, instruction::Instruction, object, object::attribute, object::property,
    zmachine::ZMachine,
};

use super::{branch, store_result};

pub fn je(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let value = instruction.operand(0);
    let equal = instruction
        .operands()
        .iter()
        .skip(1)
        .any(|o| o.value() == value);
    branch(zmachine, equal)
}

pub fn jl(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let a = instruction.operand(0) as i16;
    let b = instruction.operand(1) as i16;
    branch(zmachine, a < b)
}

pub fn jg(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let a = instruction.operand(0) as i16;
    let b = instruction.operand(1) as i16;
    branch(zmachine, a > b)
}

pub fn dec_chk(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let variable = instruction.operand(0) as u8;
    let value = (zmachine.variable(variable)? as i16).wrapping_sub(1);
    zmachine.set_variable(variable, value as u16)?;
    branch(zmachine, value < instruction.operand(1) as i16)
}

pub fn inc_chk(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let variable = instruction.operand(0) as u8;
    let value = (zmachine.variable(variable)? as i16).wrapping_add(1);
    zmachine.set_variable(variable, value as u16)?;
    branch(zmachine, value > instruction.operand(1) as i16)
}

pub fn jin(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let parent = object::parent(zmachine, instruction.operand(0) as usize)?;
    branch(zmachine, parent == instruction.operand(1) as usize)
}

pub fn test(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let bitmap = instruction.operand(0);
    let flags = instruction.operand(1);
    branch(zmachine, bitmap & flags == flags)
}

pub fn or(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    store_result(zmachine, instruction.operand(0) | instruction.operand(1))
}

pub fn and(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    store_result(zmachine, instruction.operand(0) & instruction.operand(1))
}

pub fn test_attr(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let value = attribute::value(
        zmachine,
        instruction.operand(0) as usize,
        instruction.operand(1) as u8,
    )?;
    branch(zmachine, value)
}

pub fn set_attr(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    attribute::set(
        zmachine,
        instruction.operand(0) as usize,
        instruction.operand(1) as u8,
    )
}

pub fn clear_attr(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    attribute::clear(
        zmachine,
        instruction.operand(0) as usize,
        instruction.operand(1) as u8,
    )
}

pub fn store(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let variable = instruction.operand(0) as u8;
    zmachine.set_variable_indirect(variable, instruction.operand(1))
}

pub fn insert_obj(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    object::insert(
        zmachine,
        instruction.operand(0) as usize,
        instruction.operand(1) as usize,
    )
}

pub fn loadw(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let value = zmachine.read_table_word(
        instruction.operand(0) as usize,
        instruction.operand(1) as usize,
    )?;
    store_result(zmachine, value)
}

pub fn loadb(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let value = zmachine.read_table_byte(
        instruction.operand(0) as usize,
        instruction.operand(1) as usize,
    )?;
    store_result(zmachine, value as u16)
}

pub fn get_prop(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let value = property::property(
        zmachine,
        instruction.operand(0) as usize,
        instruction.operand(1) as u8,
    )?;
    store_result(zmachine, value)
}

pub fn get_prop_addr(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<(), RuntimeError> {
    let address = property::property_data_address(
        zmachine,
        instruction.operand(0) as usize,
        instruction.operand(1) as u8,
    )?;
    store_result(zmachine, address as u16)
}

pub fn get_next_prop(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<(), RuntimeError> {
    let next = property::next_property(
        zmachine,
        instruction.operand(0) as usize,
        instruction.operand(1) as u8,
    )?;
    store_result(zmachine, next as u16)
}

pub fn add(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let value = (instruction.operand(0) as i16).wrapping_add(instruction.operand(1) as i16);
    store_result(zmachine, value as u16)
}

pub fn sub(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let value = (instruction.operand(0) as i16).wrapping_sub(instruction.operand(1) as i16);
    store_result(zmachine, value as u16)
}

pub fn mul(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let value = (instruction.operand(0) as i16).wrapping_mul(instruction.operand(1) as i16);
    store_result(zmachine, value as u16)
}

pub fn div(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let divisor = instruction.operand(1) as i16;
    if divisor == 0 {
        return fatal_error!(ErrorCode::DivideByZero, "Division by zero");
    }
    // truncates toward zero
    let value = (instruction.operand(0) as i16).wrapping_div(divisor);
    store_result(zmachine, value as u16)
}

pub fn modulus(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<(), RuntimeError> {
    let divisor = instruction.operand(1) as i16;
    if divisor == 0 {
        return fatal_error!(ErrorCode::DivideByZero, "Remainder of division by zero");
    }
    let value = (instruction.operand(0) as i16).wrapping_rem(divisor);
    store_result(zmachine, value as u16)
}

#[cfg(test)]
mod tests {
    use crate::{assert_ok_eq, test_util::*};

    use super::*;

    #[test]
    fn test_je_any() {
        let mut map = test_map(3);
        mock_instruction_bytes(&mut map, &[0xD0]);
        let mut zmachine = mock_zmachine(map);

        let i = mock_2op(0x01, &[5, 3, 5, 9]);
        assert!(je(&mut zmachine, &i).is_ok());
        assert_eq!(zmachine.pc(), 0x401 + 0x10 - 2);
    }

    #[test]
    fn test_je_none() {
        let mut map = test_map(3);
        mock_instruction_bytes(&mut map, &[0xD0]);
        let mut zmachine = mock_zmachine(map);

        let i = mock_2op(0x01, &[5, 3, 9]);
        assert!(je(&mut zmachine, &i).is_ok());
        assert_eq!(zmachine.pc(), 0x401);
    }

    #[test]
    fn test_jl_signed() {
        let mut map = test_map(3);
        mock_instruction_bytes(&mut map, &[0xD0]);
        let mut zmachine = mock_zmachine(map);

        // -1 < 1
        let i = mock_2op(0x02, &[0xFFFF, 1]);
        assert!(jl(&mut zmachine, &i).is_ok());
        assert_eq!(zmachine.pc(), 0x401 + 0x10 - 2);
    }

    #[test]
    fn test_jg_signed() {
        let mut map = test_map(3);
        mock_instruction_bytes(&mut map, &[0xD0]);
        let mut zmachine = mock_zmachine(map);

        // 1 > -1
        let i = mock_2op(0x03, &[1, 0xFFFF]);
        assert!(jg(&mut zmachine, &i).is_ok());
        assert_eq!(zmachine.pc(), 0x401 + 0x10 - 2);
    }

    #[test]
    fn test_dec_chk() {
        let mut map = test_map(3);
        mock_instruction_bytes(&mut map, &[0xD0]);
        set_variable(&mut map, 0x10, 0);
        let mut zmachine = mock_zmachine(map);

        // 0 decrements to -1, which is less than 5
        let i = mock_2op(0x04, &[0x10, 5]);
        assert!(dec_chk(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x10), 0xFFFF);
        assert_eq!(zmachine.pc(), 0x401 + 0x10 - 2);
    }

    #[test]
    fn test_inc_chk() {
        let mut map = test_map(3);
        mock_instruction_bytes(&mut map, &[0xD0]);
        set_variable(&mut map, 0x10, 5);
        let mut zmachine = mock_zmachine(map);

        // 5 increments to 6, which is not greater than 6
        let i = mock_2op(0x05, &[0x10, 6]);
        assert!(inc_chk(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x10), 6);
        assert_eq!(zmachine.pc(), 0x401);
    }

    #[test]
    fn test_jin() {
        let mut map = test_map(3);
        mock_object(&mut map, 1, 0, (0, 0, 2), 0x280);
        mock_object(&mut map, 2, 0, (1, 0, 0), 0x280);
        mock_instruction_bytes(&mut map, &[0xD0]);
        let mut zmachine = mock_zmachine(map);

        let i = mock_2op(0x06, &[2, 1]);
        assert!(jin(&mut zmachine, &i).is_ok());
        assert_eq!(zmachine.pc(), 0x401 + 0x10 - 2);
    }

    #[test]
    fn test_test() {
        let mut map = test_map(3);
        mock_instruction_bytes(&mut map, &[0xD0, 0xD0]);
        let mut zmachine = mock_zmachine(map);

        let i = mock_2op(0x07, &[0xFF0F, 0x0F0F]);
        assert!(test(&mut zmachine, &i).is_ok());
        assert_eq!(zmachine.pc(), 0x401 + 0x10 - 2);

        zmachine.set_pc(0x401);
        let i = mock_2op(0x07, &[0xFF0F, 0x1F0F]);
        assert!(test(&mut zmachine, &i).is_ok());
        assert_eq!(zmachine.pc(), 0x402);
    }

    #[test]
    fn test_or_and() {
        let mut map = test_map(3);
        mock_instruction_bytes(&mut map, &[0x10, 0x11]);
        let mut zmachine = mock_zmachine(map);

        let i = mock_2op(0x08, &[0xF000, 0x000F]);
        assert!(or(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x10), 0xF00F);

        let i = mock_2op(0x09, &[0xFF00, 0x0FF0]);
        assert!(and(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x11), 0x0F00);
    }

    #[test]
    fn test_attr_ops() {
        let mut map = test_map(3);
        mock_object(&mut map, 1, 0, (0, 0, 0), 0x280);
        mock_instruction_bytes(&mut map, &[0xD0]);
        let mut zmachine = mock_zmachine(map);

        let i = mock_2op(0x0B, &[1, 5]);
        assert!(set_attr(&mut zmachine, &i).is_ok());
        assert_ok_eq!(attribute::value(&zmachine, 1, 5), true);

        let i = mock_2op(0x0A, &[1, 5]);
        assert!(test_attr(&mut zmachine, &i).is_ok());
        assert_eq!(zmachine.pc(), 0x401 + 0x10 - 2);

        let i = mock_2op(0x0C, &[1, 5]);
        assert!(clear_attr(&mut zmachine, &i).is_ok());
        assert_ok_eq!(attribute::value(&zmachine, 1, 5), false);
    }

    #[test]
    fn test_store() {
        let mut zmachine = mock_zmachine(test_map(3));
        let i = mock_2op(0x0D, &[0x10, 0x1234]);
        assert!(store(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x10), 0x1234);
    }

    #[test]
    fn test_store_stack_in_place() {
        let mut zmachine = mock_zmachine(test_map(3));
        assert!(zmachine.push(0xFFFF).is_ok());
        let sp = zmachine.sp();

        let i = mock_2op(0x0D, &[0, 0x1234]);
        assert!(store(&mut zmachine, &i).is_ok());
        assert_eq!(zmachine.sp(), sp);
        assert_ok_eq!(zmachine.pop(), 0x1234);
    }

    #[test]
    fn test_loadw_loadb() {
        let mut map = test_map(3);
        map[0x280] = 0x12;
        map[0x281] = 0x34;
        map[0x282] = 0x56;
        mock_instruction_bytes(&mut map, &[0x10, 0x11]);
        let mut zmachine = mock_zmachine(map);

        let i = mock_2op(0x0F, &[0x280, 1]);
        assert!(loadw(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x10), 0x5600);

        let i = mock_2op(0x10, &[0x280, 1]);
        assert!(loadb(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x11), 0x34);
    }

    #[test]
    fn test_get_prop() {
        let mut map = test_map(3);
        mock_object(&mut map, 1, 0, (0, 0, 0), 0x280);
        mock_property_table(&mut map, 0x280, &[0xB5C5], &[(17, &[0x12, 0x34])]);
        mock_instruction_bytes(&mut map, &[0x10]);
        let mut zmachine = mock_zmachine(map);

        let i = mock_2op(0x11, &[1, 17]);
        assert!(get_prop(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x10), 0x1234);
    }

    #[test]
    fn test_arithmetic() {
        let mut map = test_map(3);
        mock_instruction_bytes(&mut map, &[0x10, 0x11, 0x12, 0x13, 0x14]);
        let mut zmachine = mock_zmachine(map);

        let i = mock_2op(0x14, &[7, 5]);
        assert!(add(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x10), 12);

        // 5 - 7 = -2
        let i = mock_2op(0x15, &[5, 7]);
        assert!(sub(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x11), 0xFFFE);

        // -4 * 3 = -12
        let i = mock_2op(0x16, &[0xFFFC, 3]);
        assert!(mul(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x12), 0xFFF4);

        // -7 / 2 truncates toward zero
        let i = mock_2op(0x17, &[0xFFF9, 2]);
        assert!(div(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x13), 0xFFFD);

        // -7 % 2 = -1
        let i = mock_2op(0x18, &[0xFFF9, 2]);
        assert!(modulus(&mut zmachine, &i).is_ok());
        assert_ok_eq!(zmachine.variable(0x14), 0xFFFF);
    }

    #[test]
    fn test_divide_by_zero() {
        let mut zmachine = mock_zmachine(test_map(3));
        let i = mock_2op(0x17, &[1, 0]);
        assert!(div(&mut zmachine, &i).is_err());
        let i = mock_2op(0x18, &[1, 0]);
        assert!(modulus(&mut zmachine, &i).is_err());
    }
}
