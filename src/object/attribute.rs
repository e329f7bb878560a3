//! Object attribute flags
use crate::{error::*, fatal_error, zmachine::ZMachine};

use super::object_address;

/// Byte address and bit mask for an attribute
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `attribute` - Attribute number
///
/// # Returns
/// [Result] with an (address, mask) tuple or a [RuntimeError]
fn location(
    zmachine: &ZMachine,
    object: usize,
    attribute: u8,
) -> Result<(usize, u8), RuntimeError> {
    if attribute >= zmachine.traits().max_attributes() {
        fatal_error!(
            ErrorCode::InvalidObjectAttribute,
            "Invalid attribute {} on object {}",
            attribute,
            object
        )
    } else {
        let address = object_address(zmachine, object)? + (attribute as usize / 8);
        let mask = 0x80 >> (attribute % 8);
        Ok((address, mask))
    }
}

/// Gets the value of an attribute for an object
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `attribute` - Attribute number
///
/// # Returns
/// [Result] with the attribute value - `true` when set, `false` when clear -
/// or a [RuntimeError]
pub fn value(zmachine: &ZMachine, object: usize, attribute: u8) -> Result<bool, RuntimeError> {
    let (address, mask) = location(zmachine, object, attribute)?;
    let value = zmachine.read_byte(address)?;
    Ok(value & mask == mask)
}

/// Sets an attribute for an object
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
/// * `attribute` - Attribute number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn set(zmachine: &mut ZMachine, object: usize, attribute: u8) -> Result<(), RuntimeError> {
    let (address, mask) = location(zmachine, object, attribute)?;
    let attribute_byte = zmachine.read_byte(address)?;
    zmachine.write_byte(address, attribute_byte | mask)
}

/// Clears an attribute for an object
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
/// * `attribute` - Attribute number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn clear(zmachine: &mut ZMachine, object: usize, attribute: u8) -> Result<(), RuntimeError> {
    let (address, mask) = location(zmachine, object, attribute)?;
    let attribute_byte = zmachine.read_byte(address)?;
    zmachine.write_byte(address, attribute_byte & !mask)
}
