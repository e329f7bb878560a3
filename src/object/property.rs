//! Object properties
use std::cmp::Ordering;

use crate::{
    error::*,
    fatal_error, text,
    zmachine::{header::HeaderField, ZMachine},
};

use super::object_address;

/// Gets the property table byte address for an object
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the byte address of the property table or a [RuntimeError]
fn property_table_address(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let traits = zmachine.traits();
    let offset = traits.attribute_bytes() + (traits.object_index_bytes() * 3);
    let object_address = object_address(zmachine, object)?;
    Ok(zmachine.read_word(object_address + offset)? as usize)
}

/// Gets the byte address of a property's size byte for an object.
///
/// Properties are stored in strictly descending number order, which the
/// walk relies on to stop early. If the property does not exist for the
/// object, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number
///
/// # Returns
/// [Result] with the byte address of the property entry, 0, or a [RuntimeError]
fn address(zmachine: &ZMachine, object: usize, property: u8) -> Result<usize, RuntimeError> {
    if property as usize > zmachine.traits().max_properties() {
        return fatal_error!(
            ErrorCode::InvalidObjectProperty,
            "Invalid property {} on object {}",
            property,
            object
        );
    }

    let table = property_table_address(zmachine, object)?;
    let header_size = zmachine.read_byte(table)? as usize;
    let mut property_address = table + 1 + (header_size * 2);
    loop {
        let size_byte = zmachine.read_byte(property_address)?;
        if size_byte == 0 {
            return Ok(0);
        }

        let number = size_byte & 0x1F;
        match number.cmp(&property) {
            Ordering::Equal => return Ok(property_address),
            Ordering::Less => return Ok(0),
            Ordering::Greater => property_address = property_address + 1 + size(size_byte),
        }
    }
}

/// Size in bytes of a property's data
///
/// # Arguments
/// * `size_byte` - The property's size byte
///
/// # Returns
/// Property data size in bytes
fn size(size_byte: u8) -> usize {
    (size_byte as usize >> 5) + 1
}

/// Gets the byte address of an object's property data.
///
/// If the property does not exist for the object, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number
///
/// # Returns
/// [Result] with the byte address of the property data, 0, or a [RuntimeError]
pub fn property_data_address(
    zmachine: &ZMachine,
    object: usize,
    property: u8,
) -> Result<usize, RuntimeError> {
    let property_address = address(zmachine, object, property)?;
    if property_address == 0 {
        Ok(0)
    } else {
        Ok(property_address + 1)
    }
}

/// Gets the length of a property's data from its data address.
///
/// If `property_data_address` is 0, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `property_data_address` - Byte address of the property's data
///
/// # Returns
/// [Result] with the length of the property's data, 0, or a [RuntimeError]
pub fn property_length(
    zmachine: &ZMachine,
    property_data_address: usize,
) -> Result<usize, RuntimeError> {
    if property_data_address == 0 {
        Ok(0)
    } else {
        let size_byte = zmachine.read_byte(property_data_address - 1)?;
        Ok(size(size_byte))
    }
}

/// Gets the encoded short name of an object
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with a vector of encoded words or a [RuntimeError]
pub fn short_name(zmachine: &ZMachine, object: usize) -> Result<Vec<u16>, RuntimeError> {
    let table = property_table_address(zmachine, object)?;
    let header_size = zmachine.read_byte(table)? as usize;
    let mut ztext = Vec::new();
    for i in 0..header_size {
        ztext.push(zmachine.read_word(table + 1 + (i * 2))?);
    }

    Ok(ztext)
}

/// Gets the default value of a property from the object table's defaults
/// block
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `property` - Property number
///
/// # Returns
/// [Result] with the default word value of the property or a [RuntimeError]
fn default_property(zmachine: &ZMachine, property: u8) -> Result<u16, RuntimeError> {
    if property == 0 {
        return fatal_error!(
            ErrorCode::InvalidObjectProperty,
            "Read of property 0 has no default"
        );
    }
    let object_table = zmachine.header_word(HeaderField::ObjectTable)? as usize;
    zmachine.read_table_word(object_table, property as usize - 1)
}

/// Gets the value of a property for an object.
///
/// The property data must be a byte or a word. If the property does not
/// exist for the object, the default property value is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number
///
/// # Returns
/// [Result] with the property value or a [RuntimeError]
pub fn property(zmachine: &ZMachine, object: usize, property: u8) -> Result<u16, RuntimeError> {
    let property_address = address(zmachine, object, property)?;
    if property_address == 0 {
        default_property(zmachine, property)
    } else {
        let size_byte = zmachine.read_byte(property_address)?;
        match size(size_byte) {
            1 => Ok(zmachine.read_byte(property_address + 1)? as u16),
            2 => zmachine.read_word(property_address + 1),
            _ => fatal_error!(
                ErrorCode::InvalidObjectPropertySize,
                "Read of property {} on object {} should have size 1 or 2, was {}",
                property,
                object,
                size(size_byte)
            ),
        }
    }
}

/// Gets the next property set on an object.
///
/// Properties are ordered in descending number order. If `property` is 0,
/// the first property number on the object is returned; if there is no next
/// property, 0 is returned. Stepping from a property the object does not
/// have is a [RuntimeError].
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number, or 0 for the first property
///
/// # Returns
/// [Result] with the next property number, 0, or a [RuntimeError]
pub fn next_property(zmachine: &ZMachine, object: usize, property: u8) -> Result<u8, RuntimeError> {
    if property == 0 {
        let table = property_table_address(zmachine, object)?;
        let header_size = zmachine.read_byte(table)? as usize;
        let size_byte = zmachine.read_byte(table + 1 + (header_size * 2))?;
        Ok(size_byte & 0x1F)
    } else {
        let property_address = address(zmachine, object, property)?;
        if property_address == 0 {
            fatal_error!(
                ErrorCode::InvalidObjectProperty,
                "Next property from property {} that object {} does not have",
                property,
                object
            )
        } else {
            let size_byte = zmachine.read_byte(property_address)?;
            let next = zmachine.read_byte(property_address + 1 + size(size_byte))?;
            Ok(next & 0x1F)
        }
    }
}

/// Sets the value of a property for an object.
///
/// The property must exist on the object and must be a byte or word value.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number
/// * `value` - Byte or word value to set
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn set_property(
    zmachine: &mut ZMachine,
    object: usize,
    property: u8,
    value: u16,
) -> Result<(), RuntimeError> {
    let property_address = address(zmachine, object, property)?;
    if property_address == 0 {
        let name = text::to_string(&text::from_vec(
            zmachine,
            &short_name(zmachine, object)?,
            false,
        )?);
        fatal_error!(
            ErrorCode::InvalidObjectProperty,
            "Object {} \"{}\" does not have property {}",
            object,
            name,
            property
        )
    } else {
        let size_byte = zmachine.read_byte(property_address)?;
        match size(size_byte) {
            1 => zmachine.write_byte(property_address + 1, value as u8),
            2 => zmachine.write_word(property_address + 1, value),
            _ => fatal_error!(
                ErrorCode::InvalidObjectPropertySize,
                "Write of property {} on object {} should have size 1 or 2, was {}",
                property,
                object,
                size(size_byte)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{assert_ok_eq, test_util::*};

    use super::*;

    fn property_map() -> Vec<u8> {
        let mut map = test_map(3);
        // object 1 "hi" with properties 17 (word), 10 (byte), 4 (3 bytes)
        mock_object(&mut map, 1, 0, (0, 0, 0), 0x280);
        mock_property_table(
            &mut map,
            0x280,
            &[0xB5C5],
            &[(17, &[0x12, 0x34]), (10, &[0x56]), (4, &[1, 2, 3])],
        );
        // property 5 defaults to 0xBEEF
        mock_default_property(&mut map, 5, 0xBEEF);
        map
    }

    #[test]
    fn test_property() {
        let zmachine = mock_zmachine(property_map());
        assert_ok_eq!(property(&zmachine, 1, 17), 0x1234);
        assert_ok_eq!(property(&zmachine, 1, 10), 0x56);
    }

    #[test]
    fn test_property_default() {
        let zmachine = mock_zmachine(property_map());
        assert_ok_eq!(property(&zmachine, 1, 5), 0xBEEF);
        assert_ok_eq!(property(&zmachine, 1, 31), 0);
    }

    #[test]
    fn test_property_bad_size() {
        let zmachine = mock_zmachine(property_map());
        assert!(property(&zmachine, 1, 4).is_err());
    }

    #[test]
    fn test_property_invalid_number() {
        let zmachine = mock_zmachine(property_map());
        assert!(property(&zmachine, 1, 0).is_err());
        assert!(property(&zmachine, 1, 32).is_err());
    }

    #[test]
    fn test_property_data_address() {
        let zmachine = mock_zmachine(property_map());
        // header: size byte + 2 name bytes, then prop 17's size byte
        assert_ok_eq!(property_data_address(&zmachine, 1, 17), 0x284);
        assert_ok_eq!(property_data_address(&zmachine, 1, 10), 0x287);
        assert_ok_eq!(property_data_address(&zmachine, 1, 12), 0);
    }

    #[test]
    fn test_property_length() {
        let zmachine = mock_zmachine(property_map());
        let addr = property_data_address(&zmachine, 1, 17).expect("Property address");
        assert_ok_eq!(property_length(&zmachine, addr), 2);
        let addr = property_data_address(&zmachine, 1, 10).expect("Property address");
        assert_ok_eq!(property_length(&zmachine, addr), 1);
        assert_ok_eq!(property_length(&zmachine, 0), 0);
    }

    #[test]
    fn test_short_name() {
        let zmachine = mock_zmachine(property_map());
        let ztext = short_name(&zmachine, 1).expect("Short name");
        let name = text::from_vec(&zmachine, &ztext, false).expect("Decode failed");
        assert_eq!(text::to_string(&name), "hi");
    }

    #[test]
    fn test_first_property_probe() {
        // get_next_prop(o, 0) names a property with a non-zero data address
        // exactly when the object has one
        let mut map = property_map();
        mock_object(&mut map, 2, 0, (0, 0, 0), 0x2C0);
        mock_property_table(&mut map, 0x2C0, &[], &[]);
        let zmachine = mock_zmachine(map);

        let first = next_property(&zmachine, 1, 0).expect("First property");
        assert_eq!(first, 17);
        assert!(property_data_address(&zmachine, 1, first).expect("Address") != 0);

        let first = next_property(&zmachine, 2, 0).expect("First property");
        assert_eq!(first, 0);
        assert_ok_eq!(property_data_address(&zmachine, 2, first), 0);
    }

    #[test]
    fn test_next_property() {
        let zmachine = mock_zmachine(property_map());
        assert_ok_eq!(next_property(&zmachine, 1, 0), 17);
        assert_ok_eq!(next_property(&zmachine, 1, 17), 10);
        assert_ok_eq!(next_property(&zmachine, 1, 10), 4);
        assert_ok_eq!(next_property(&zmachine, 1, 4), 0);
        assert!(next_property(&zmachine, 1, 12).is_err());
    }

    #[test]
    fn test_set_property() {
        let mut zmachine = mock_zmachine(property_map());
        assert!(set_property(&mut zmachine, 1, 17, 0xCAFE).is_ok());
        assert_ok_eq!(property(&zmachine, 1, 17), 0xCAFE);
        assert!(set_property(&mut zmachine, 1, 10, 0x1299).is_ok());
        assert_ok_eq!(property(&zmachine, 1, 10), 0x99);
    }

    #[test]
    fn test_set_property_missing() {
        let mut zmachine = mock_zmachine(property_map());
        let error = set_property(&mut zmachine, 1, 12, 0).expect_err("Missing property");
        // diagnostic names the object
        assert!(error.message().contains("hi"));
    }
}
