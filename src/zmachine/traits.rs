//! Version-dependent machine parameters
use std::fmt;

/// Per-version machine parameters.
///
/// Collects the constants that vary between Z-Machine versions: object
/// table geometry, packed-address scaling, and the width of encoded
/// dictionary words. One record exists per supported version; the rest of
/// the core consults the record instead of matching on the version number,
/// so adding a version means adding a record and a dispatch table rather
/// than restructuring.
pub struct Traits {
    /// Machine version
    version: u8,
    /// Size of an object index in bytes
    object_index_bytes: usize,
    /// Size of an object table entry in bytes
    object_entry_size: usize,
    /// Number of bytes of attribute flags per object
    attribute_bytes: usize,
    /// Maximum number of object properties
    max_properties: usize,
    /// Packed address scale applied to the header base offset
    paddr_base_scale: usize,
    /// Packed address scale applied to the packed value
    paddr_offset_scale: usize,
    /// Number of words in an encoded dictionary entry
    dictionary_word_count: usize,
}

impl fmt::Debug for Traits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Traits: version {}", self.version)
    }
}

const V3: Traits = Traits {
    version: 3,
    object_index_bytes: 1,
    object_entry_size: 9,
    attribute_bytes: 4,
    max_properties: 31,
    paddr_base_scale: 0,
    paddr_offset_scale: 2,
    dictionary_word_count: 2,
};

impl Traits {
    /// Look up the traits record for a machine version
    ///
    /// # Arguments
    /// * `version` - Machine version from the story header
    ///
    /// # Returns
    /// [Option] with the traits record, or [None] for unsupported versions
    pub fn for_version(version: u8) -> Option<&'static Traits> {
        match version {
            3 => Some(&V3),
            _ => None,
        }
    }

    /// Get the machine version
    ///
    /// # Returns
    /// Machine version
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Get the size of an object index in bytes
    ///
    /// # Returns
    /// Object index size in bytes
    pub fn object_index_bytes(&self) -> usize {
        self.object_index_bytes
    }

    /// Get the size of an object table entry in bytes
    ///
    /// # Returns
    /// Object entry size in bytes
    pub fn object_entry_size(&self) -> usize {
        self.object_entry_size
    }

    /// Get the number of attribute flag bytes per object
    ///
    /// # Returns
    /// Attribute flag bytes per object
    pub fn attribute_bytes(&self) -> usize {
        self.attribute_bytes
    }

    /// Get the maximum number of object properties
    ///
    /// # Returns
    /// Maximum property number
    pub fn max_properties(&self) -> usize {
        self.max_properties
    }

    /// Get the number of words in an encoded dictionary entry
    ///
    /// # Returns
    /// Encoded dictionary entry width in words
    pub fn dictionary_word_count(&self) -> usize {
        self.dictionary_word_count
    }

    /// Get the highest valid object number
    ///
    /// # Returns
    /// Highest object number representable in an object index
    pub fn max_objects(&self) -> usize {
        (1 << (self.object_index_bytes * 8)) - 1
    }

    /// Get the number of attribute flags per object
    ///
    /// # Returns
    /// Attribute flag count
    pub fn max_attributes(&self) -> u8 {
        (self.attribute_bytes * 8) as u8
    }

    /// Unpack a packed address
    ///
    /// # Arguments
    /// * `packed` - Packed address
    /// * `base` - Header base offset for the address kind (routines or
    ///   static strings)
    ///
    /// # Returns
    /// Unpacked byte address
    pub fn unpack(&self, packed: u16, base: u16) -> usize {
        (base as usize * self.paddr_base_scale) + (packed as usize * self.paddr_offset_scale)
    }
}
