//! ZSCII text encoding, dictionary lookup and lexical analysis
use std::cmp::Ordering;

use crate::{
    error::*,
    fatal_error,
    zmachine::{header::HeaderField, ZMachine},
};

/// Default alphabets.
///
/// Alphabet 2 carries the ZSCII newline (13) in slot 1; slot 0 is never
/// produced by the decoder because Z-character 6 in alphabet 2 begins a raw
/// ZSCII escape instead.
const ALPHABET_V3: [[char; 26]; 3] = [
    [
        'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
        's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    ],
    [
        'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
        'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    ],
    [
        ' ', '\r', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', ',', '!', '?', '_', '#',
        '\'', '"', '/', '\\', '-', ':', '(', ')',
    ],
];

/// Map a ZSCII code to an output character.
///
/// # Arguments
/// * `zscii` - ZSCII code
///
/// # Returns
/// [Option] with the output character; 13 maps to a newline, the printable
/// ASCII range maps to itself, and any other code produces no output
pub fn zscii_to_char(zscii: u16) -> Option<char> {
    match zscii {
        13 => Some('\n'),
        32..=126 => Some(zscii as u8 as char),
        _ => None,
    }
}

/// Render a decoded ZSCII vector as a string
///
/// # Arguments
/// * `text` - ZSCII codes
///
/// # Returns
/// String with every printable code rendered
pub fn to_string(text: &[u16]) -> String {
    text.iter().filter_map(|c| zscii_to_char(*c)).collect()
}

/// Decode an abbreviation to ZSCII
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `bank` - Abbreviation bank (1 - 3)
/// * `index` - Abbreviation index within the bank
///
/// # Returns
/// [Result] containing the abbreviation text or a [RuntimeError]
fn abbreviation(zmachine: &ZMachine, bank: u8, index: u8) -> Result<Vec<u16>, RuntimeError> {
    let table = zmachine.header_word(HeaderField::AbbreviationsTable)? as usize;
    let entry = (((bank - 1) as usize) << 5) | index as usize;
    let packed = zmachine.read_table_word(table, entry)?;
    let address = zmachine.unpack_string_address(packed)?;
    as_text(zmachine, address, true)
}

/// Read encoded text from an address and decode it to ZSCII
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `address` - Address of the text
/// * `is_abbreviation` - `true` when decoding an abbreviation, `false` if not
///
/// # Returns
/// [Result] containing the decoded text or a [RuntimeError]
pub fn as_text(
    zmachine: &ZMachine,
    address: usize,
    is_abbreviation: bool,
) -> Result<Vec<u16>, RuntimeError> {
    from_vec(
        zmachine,
        &zmachine.string_literal(address)?,
        is_abbreviation,
    )
}

/// Decode a vector of encoded words to ZSCII.
///
/// Abbreviations may not nest; encountering an abbreviation while decoding
/// one is a [RuntimeError].
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `ztext` - Vector of encoded words
/// * `is_abbreviation` - `true` when decoding an abbreviation, `false` if not
///
/// # Returns
/// [Result] containing the decoded text or a [RuntimeError]
pub fn from_vec(
    zmachine: &ZMachine,
    ztext: &[u16],
    is_abbreviation: bool,
) -> Result<Vec<u16>, RuntimeError> {
    let mut alphabet_shift: usize = 0;
    let mut s = Vec::new();

    let mut abbrev = 0;
    let mut zscii_read1 = false;
    let mut zscii_read2 = false;
    let mut zscii_b1 = 0;

    for w in ztext {
        let b1 = (w >> 10 & 0x1F) as u8;
        let b2 = (w >> 5 & 0x1F) as u8;
        let b3 = (w & 0x1F) as u8;

        for b in [b1, b2, b3] {
            if abbrev > 0 {
                let mut a = abbreviation(zmachine, abbrev, b)?;
                s.append(&mut a);
                abbrev = 0;
            } else if zscii_read1 {
                zscii_b1 = b;
                zscii_read2 = true;
                zscii_read1 = false;
            } else if zscii_read2 {
                let z = ((zscii_b1 as u16) << 5) | b as u16;
                s.push(z);
                zscii_read2 = false;
            } else {
                match b {
                    0 => s.push(0x20),
                    1..=3 => {
                        if !is_abbreviation {
                            abbrev = b
                        } else {
                            return fatal_error!(
                                ErrorCode::InvalidAbbreviation,
                                "Abbreviations can't nest",
                            );
                        }
                    }
                    4 => alphabet_shift = 1,
                    5 => alphabet_shift = 2,
                    6 => {
                        if alphabet_shift == 2 {
                            zscii_read1 = true;
                        } else {
                            s.push(ALPHABET_V3[alphabet_shift][b as usize - 6] as u16);
                        }
                    }
                    _ => s.push(ALPHABET_V3[alphabet_shift][b as usize - 6] as u16),
                }
            }
            if b != 4 && b != 5 {
                alphabet_shift = 0;
            }
        }
    }
    Ok(s)
}

/// Find the Z-character sequence of an input character.
///
/// Alphabet 0 is searched first, then alphabet 2 (whose slot 0 cannot be
/// emitted); anything else becomes a 4-character raw ZSCII escape.
///
/// # Arguments
/// * `zchar` - Character to look up
///
/// # Returns
/// Vector containing the Z-character sequence for the character
fn find_char(zchar: u16) -> Vec<u16> {
    let c = (zchar as u8) as char;
    if c == ' ' {
        return vec![0];
    }

    for i in 0..26 {
        if ALPHABET_V3[0][i] == c {
            return vec![i as u16 + 6];
        }
    }

    for i in 1..26 {
        if ALPHABET_V3[2][i] == c {
            return vec![5, i as u16 + 6];
        }
    }

    let z1 = (zchar >> 5) & 0x1F;
    let z2 = zchar & 0x1F;
    vec![5, 6, z1, z2]
}

/// Pack 3 5-bit Z-characters into a word: 01111122 22233333
///
/// # Arguments
/// * `z1` - first character
/// * `z2` - second character
/// * `z3` - third character
///
/// # Returns
/// Word encoding of the sequence
fn as_word(z1: u16, z2: u16, z3: u16) -> u16 {
    ((z1 & 0x1F) << 10) | ((z2 & 0x1F) << 5) | (z3 & 0x1F)
}

/// Encode a word for dictionary lookup.
///
/// The Z-character sequence is truncated or padded with shift characters
/// (5) to fill exactly `words` encoded words, and the end bit is set on the
/// final word.
///
/// # Arguments
/// * `word` - Word to encode as a vector of characters
/// * `words` - Number of encoded words in the result; 2 for v3 (6 characters)
///
/// # Returns
/// Vector of encoded words
pub fn encode_text(word: &mut Vec<u16>, words: usize) -> Vec<u16> {
    let mut zchars = Vec::new();

    word.truncate(words * 3);
    for c in word {
        zchars.append(&mut find_char(*c));
    }

    zchars.resize(words * 3, 5);

    let mut zwords = Vec::new();
    for i in 0..words {
        let index = i * 3;
        let mut w = as_word(zchars[index], zchars[index + 1], zchars[index + 2]);
        if i == words - 1 {
            w |= 0x8000;
        }
        zwords.push(w);
    }

    zwords
}

/// Get the set of word separators from a dictionary
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `dictionary_address` - Address of the dictionary
///
/// # Returns
/// [Result] containing a vector of word separator bytes or a [RuntimeError]
fn separators(zmachine: &ZMachine, dictionary_address: usize) -> Result<Vec<u8>, RuntimeError> {
    let separator_count = zmachine.read_byte(dictionary_address)?;
    let mut sep = Vec::new();
    for i in 1..=separator_count as usize {
        sep.push(zmachine.read_byte(dictionary_address + i)?);
    }

    Ok(sep)
}

/// Binary search a sorted dictionary for an encoded word
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `address` - Address of the first entry in the dictionary
/// * `entry_count` - Number of entries in the dictionary
/// * `entry_size` - Dictionary entry size
/// * `words` - Encoded text of the word to find
///
/// # Returns
/// [Result] containing the address of the matching dictionary entry, 0 if
/// not found, or a [RuntimeError]
fn search_entry(
    zmachine: &ZMachine,
    address: usize,
    entry_count: usize,
    entry_size: usize,
    words: &[u16],
) -> Result<usize, RuntimeError> {
    let mut min = 0;
    let mut max = entry_count;

    while min < max {
        let pivot = min + ((max - min) / 2);
        let addr = address + (pivot * entry_size);
        let mut ordering = Ordering::Equal;
        for (i, w) in words.iter().enumerate() {
            let entry_word = zmachine.read_word(addr + (i * 2))?;
            match entry_word.cmp(w) {
                Ordering::Equal => {}
                o => {
                    ordering = o;
                    break;
                }
            }
        }

        match ordering {
            Ordering::Equal => return Ok(addr),
            Ordering::Less => min = pivot + 1,
            Ordering::Greater => max = pivot,
        }
    }

    Ok(0)
}

/// Find the address of the dictionary entry for a word, if any.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `dictionary_address` - Address of the dictionary
/// * `word` - Word to find as a vector of characters
///
/// # Returns
/// [Result] containing the address of the matching dictionary entry, 0 if
/// not found, or a [RuntimeError]
fn from_dictionary(
    zmachine: &ZMachine,
    dictionary_address: usize,
    word: &[char],
) -> Result<usize, RuntimeError> {
    let separator_count = zmachine.read_byte(dictionary_address)? as usize;
    let entry_size = zmachine.read_byte(dictionary_address + separator_count + 1)? as usize;
    let entry_count = zmachine.read_word(dictionary_address + separator_count + 2)? as usize;
    let word_count = zmachine.traits().dictionary_word_count();
    debug!(target: "app::state", "Lexical analysis: dictionary @ {:04x}, {} separators, {} entries of size {}", dictionary_address, separator_count, entry_count, entry_size);

    let mut zchars = word.iter().map(|c| *c as u16).collect::<Vec<u16>>();
    let words = encode_text(&mut zchars, word_count);
    debug!(target: "app::state", "Lexical analysis: encoded text: {:04x?}", words);

    search_entry(
        zmachine,
        dictionary_address + separator_count + 4,
        entry_count,
        entry_size,
        &words,
    )
}

/// Split the text buffer contents into words.
///
/// A space ends the current word; a separator byte always forms a
/// one-character word of its own.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `text_buffer` - Input text buffer address
/// * `separators` - Word separator bytes
///
/// # Returns
/// [Result] with a vector of (word, text buffer offset) pairs or a
/// [RuntimeError]
fn split_input(
    zmachine: &ZMachine,
    text_buffer: usize,
    separators: &[u8],
) -> Result<Vec<(Vec<char>, usize)>, RuntimeError> {
    let max_length = zmachine.read_byte(text_buffer)? as usize;
    let mut words = Vec::new();
    let mut word = Vec::new();
    let mut start = 0;

    for index in 1..=max_length {
        let b = zmachine.read_byte(text_buffer + index)?;
        if b == 0 {
            break;
        }

        if b == b' ' {
            if !word.is_empty() {
                words.push((word.clone(), start));
                word.clear();
            }
        } else if separators.contains(&b) {
            if !word.is_empty() {
                words.push((word.clone(), start));
                word.clear();
            }
            words.push((vec![b as char], index));
        } else {
            if word.is_empty() {
                start = index;
            }
            word.push(b as char);
        }
    }

    if !word.is_empty() {
        words.push((word, start));
    }

    Ok(words)
}

/// Run lexical analysis over the text buffer into the parse buffer.
///
/// Each parsed word produces a 4-byte parse entry: the dictionary entry
/// address (0 when the word is not in the dictionary), the word length,
/// and the word's offset in the text buffer. The entry count is capped by
/// the parse buffer's declared capacity and written to `parse_buffer + 1`.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `text_buffer` - Input text buffer address
/// * `parse_buffer` - Parse buffer address
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn parse_text(
    zmachine: &mut ZMachine,
    text_buffer: usize,
    parse_buffer: usize,
) -> Result<(), RuntimeError> {
    let dictionary = zmachine.header_word(HeaderField::Dictionary)? as usize;
    let separators = separators(zmachine, dictionary)?;
    let max_words = zmachine.read_byte(parse_buffer)? as usize;

    let words = split_input(zmachine, text_buffer, &separators)?;
    let count = usize::min(words.len(), max_words);

    for (i, (word, start)) in words.iter().take(count).enumerate() {
        let entry = from_dictionary(zmachine, dictionary, word)?;
        let entry_address = parse_buffer + 2 + (4 * i);
        debug!(target: "app::state", "Lexical analysis: {:?} => ${:04x} stored to ${:04x}", word, entry, entry_address);
        zmachine.write_word(entry_address, entry as u16)?;
        zmachine.write_byte(entry_address + 2, word.len() as u8)?;
        zmachine.write_byte(entry_address + 3, *start as u8)?;
    }

    zmachine.write_byte(parse_buffer + 1, count as u8)
}
