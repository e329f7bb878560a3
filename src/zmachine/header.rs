//! Story file header fields
use crate::error::RuntimeError;

use super::memory::Memory;

/// Header field byte offsets.
///
/// The header occupies the first 64 bytes of the story file; fields wider
/// than a byte are big-endian words.
pub enum HeaderField {
    Version = 0x00,
    Flags1 = 0x01,
    Release = 0x02,
    HighMark = 0x04,
    InitialPC = 0x06,
    Dictionary = 0x08,
    ObjectTable = 0x0A,
    GlobalTable = 0x0C,
    StaticMark = 0x0E,
    Flags2 = 0x10,
    Serial = 0x12,
    AbbreviationsTable = 0x18,
    FileLength = 0x1A,
    Checksum = 0x1C,
    RoutinesOffset = 0x28,
    StringsOffset = 0x2A,
    AlphabetTable = 0x34,
    ExtensionTable = 0x36,
}

/// Read a byte-sized header field
///
/// # Arguments
/// * `memory` - Reference to the memory map
/// * `field` - Header field
///
/// # Returns
/// [Result] with the field value or a [RuntimeError]
pub fn field_byte(memory: &Memory, field: HeaderField) -> Result<u8, RuntimeError> {
    memory.read_byte(field as usize)
}

/// Read a word-sized header field
///
/// # Arguments
/// * `memory` - Reference to the memory map
/// * `field` - Header field
///
/// # Returns
/// [Result] with the field value or a [RuntimeError]
pub fn field_word(memory: &Memory, field: HeaderField) -> Result<u16, RuntimeError> {
    memory.read_word(field as usize)
}
