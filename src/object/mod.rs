//! Object tree
use crate::{
    error::*,
    fatal_error,
    zmachine::{header::HeaderField, ZMachine},
};

pub mod attribute;
pub mod property;

/// Gets the byte address of an object's table entry
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the byte address of the object table entry or a [RuntimeError]
fn object_address(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let traits = zmachine.traits();
    if object == 0 || object > traits.max_objects() {
        fatal_error!(ErrorCode::InvalidObject, "Invalid object {}", object)
    } else {
        let table = zmachine.header_word(HeaderField::ObjectTable)? as usize;
        let base = table + (traits.max_properties() * 2);
        Ok(base + ((object - 1) * traits.object_entry_size()))
    }
}

/// Gets one of an object's relatives (parent, sibling, or child)
///
/// If `object` is 0, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `offset` - Byte offset of the relative in the object's table entry
///
/// # Returns
/// [Result] with the relative object number, 0, or a [RuntimeError]
fn relative(zmachine: &ZMachine, object: usize, offset: usize) -> Result<usize, RuntimeError> {
    if object == 0 {
        Ok(0)
    } else {
        let address = object_address(zmachine, object)? + offset;
        match zmachine.traits().object_index_bytes() {
            1 => Ok(zmachine.read_byte(address)? as usize),
            _ => Ok(zmachine.read_word(address)? as usize),
        }
    }
}

/// Sets one of an object's relatives (parent, sibling, or child)
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
/// * `offset` - Byte offset of the relative in the object's table entry
/// * `relative` - New relative object number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
fn set_relative(
    zmachine: &mut ZMachine,
    object: usize,
    offset: usize,
    relative: usize,
) -> Result<(), RuntimeError> {
    let address = object_address(zmachine, object)? + offset;
    match zmachine.traits().object_index_bytes() {
        1 => zmachine.write_byte(address, relative as u8),
        _ => zmachine.write_word(address, relative as u16),
    }
}

/// Gets an object's parent
///
/// If `object` is 0, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the parent object number, 0, or a [RuntimeError]
pub fn parent(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    relative(zmachine, object, zmachine.traits().attribute_bytes())
}

/// Gets an object's first sibling
///
/// If `object` is 0, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the sibling object number, 0, or a [RuntimeError]
pub fn sibling(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let traits = zmachine.traits();
    relative(
        zmachine,
        object,
        traits.attribute_bytes() + traits.object_index_bytes(),
    )
}

/// Gets an object's first child
///
/// If `object` is 0, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the child object number, 0, or a [RuntimeError]
pub fn child(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let traits = zmachine.traits();
    relative(
        zmachine,
        object,
        traits.attribute_bytes() + (traits.object_index_bytes() * 2),
    )
}

/// Sets an object's parent.
///
/// Only the `object` table entry is updated; the object tree is not
/// otherwise repaired.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
/// * `parent` - New parent object number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
fn set_parent(zmachine: &mut ZMachine, object: usize, parent: usize) -> Result<(), RuntimeError> {
    let offset = zmachine.traits().attribute_bytes();
    set_relative(zmachine, object, offset, parent)
}

/// Sets an object's sibling.
///
/// Only the `object` table entry is updated; the object tree is not
/// otherwise repaired.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
/// * `sibling` - New sibling object number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
fn set_sibling(zmachine: &mut ZMachine, object: usize, sibling: usize) -> Result<(), RuntimeError> {
    let traits = zmachine.traits();
    let offset = traits.attribute_bytes() + traits.object_index_bytes();
    set_relative(zmachine, object, offset, sibling)
}

/// Sets an object's child.
///
/// Only the `object` table entry is updated; the object tree is not
/// otherwise repaired.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
/// * `child` - New child object number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
fn set_child(zmachine: &mut ZMachine, object: usize, child: usize) -> Result<(), RuntimeError> {
    let traits = zmachine.traits();
    let offset = traits.attribute_bytes() + (traits.object_index_bytes() * 2);
    set_relative(zmachine, object, offset, child)
}

/// Moves an object to a new parent.
///
/// The object is spliced out of its old parent's child chain, then linked
/// in as the new parent's first child. A new parent of 0 detaches the
/// object from the tree.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
/// * `new_parent` - New parent object number, or 0 to detach
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn insert(
    zmachine: &mut ZMachine,
    object: usize,
    new_parent: usize,
) -> Result<(), RuntimeError> {
    debug!(target: "app::state", "Insert object {} into {}", object, new_parent);
    let old_parent = parent(zmachine, object)?;
    if old_parent != 0 {
        let next = sibling(zmachine, object)?;
        let mut prev = 0;
        let mut current = child(zmachine, old_parent)?;
        while current != 0 && current != object {
            prev = current;
            current = sibling(zmachine, current)?;
        }

        if current == 0 {
            return fatal_error!(
                ErrorCode::InvalidObjectTree,
                "Object {} is not among the children of its parent {}",
                object,
                old_parent
            );
        }

        if prev == 0 {
            set_child(zmachine, old_parent, next)?;
        } else {
            set_sibling(zmachine, prev, next)?;
        }
        set_sibling(zmachine, object, 0)?;
    }

    set_parent(zmachine, object, new_parent)?;
    if new_parent != 0 {
        let first = child(zmachine, new_parent)?;
        set_sibling(zmachine, object, first)?;
        set_child(zmachine, new_parent, object)?;
    }

    Ok(())
}

/// Detaches an object from the tree.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn remove(zmachine: &mut ZMachine, object: usize) -> Result<(), RuntimeError> {
    insert(zmachine, object, 0)
}
