//! Token bytes and masks.
//!
//! The leading byte of a token is interpreted against one of two tables
//! depending on parser context: values use the value table, field names
//! inside objects use the name table. The same numeric byte can mean
//! different things in the two tables; the decoder always dispatches on
//! context first.

/// Stream magic, `:)\n`.
pub const MAGIC: [u8; 3] = [0x3A, 0x29, 0x0A];
/// Header length in bytes, magic plus options byte.
pub const HEADER_LEN: usize = 4;
/// Options-byte bit: body may contain raw binary content.
pub const FLAG_RAW_BINARY: u8 = 0x04;
/// Options-byte bit: shared string values enabled.
pub const FLAG_SHARED_STRINGS: u8 = 0x02;
/// Options-byte bit: shared field names enabled.
pub const FLAG_SHARED_NAMES: u8 = 0x01;

/// Empty string, in both value and name context.
pub const EMPTY_STRING: u8 = 0x20;
/// `null` literal.
pub const LIT_NULL: u8 = 0x21;
/// `false` literal.
pub const LIT_FALSE: u8 = 0x22;
/// `true` literal.
pub const LIT_TRUE: u8 = 0x23;
/// Integer escape; a zigzag vint payload follows.
pub const TOKEN_INT: u8 = 0x24;
/// Single-precision float marker, 5 payload bytes.
pub const TOKEN_FLOAT_32: u8 = 0x28;
/// Double-precision float marker, 10 payload bytes.
pub const TOKEN_FLOAT_64: u8 = 0x29;

/// Mask extracting a shared string value index from its `0x00..=0x1F`
/// token.
pub const MASK_SHARED_STRING: u8 = 0x1F;

/// Short one-byte-content string values, `0x40..=0x7F`; lead is
/// `TINY_ASCII_PREFIX - 1 + length`, length 1..=64.
pub const TINY_ASCII_PREFIX: u8 = 0x40;
/// Short multi-byte-content string values, `0x80..=0xBE`; lead is
/// `TINY_UNICODE_PREFIX - 2 + length`, length 2..=64.
pub const TINY_UNICODE_PREFIX: u8 = 0x80;
/// Longest string encodable with a short (length-in-lead-byte) token.
pub const TINY_STR_MAX_LEN: usize = 64;
/// Long one-byte-content string value marker.
pub const LONG_ASCII: u8 = 0xE0;
/// Long multi-byte-content string value marker.
pub const LONG_UNICODE: u8 = 0xE4;
/// Terminator sentinel closing every long string and long name.
pub const END_OF_STRING: u8 = 0xFC;

/// Small integers, `0xC0..=0xDF`; zigzag value in the low 5 bits.
pub const SMALL_INT_PREFIX: u8 = 0xC0;
/// Largest zigzag value that fits a small-int token.
pub const SMALL_INT_MAX: u8 = 0x1F;
/// Mask extracting a small-int zigzag value.
pub const MASK_SMALL_INT: u8 = 0x1F;

/// High bit marking the terminal byte of an integer vint.
pub const VINT_TERMINAL: u8 = 0x80;
/// Mask for the 6 bits carried by a vint terminal byte.
pub const VINT_LOW_MASK: u8 = 0x3F;

/// Array start marker.
pub const START_ARRAY: u8 = 0xF8;
/// Array end marker.
pub const END_ARRAY: u8 = 0xF9;
/// Object start marker.
pub const START_OBJECT: u8 = 0xFA;
/// Object end marker, legal only where a field name may start.
pub const END_OBJECT: u8 = 0xFB;

/// Long field name marker, name context only.
pub const NAME_LONG: u8 = 0x34;
/// Shared name references, `0x40..=0x7F`; index in the low 6 bits.
pub const NAME_SHARED_PREFIX: u8 = 0x40;
/// Mask extracting a shared name index.
pub const MASK_SHARED_NAME: u8 = 0x3F;
/// Short one-byte-content names, `0x80..=0xBF`; lead is
/// `NAME_ASCII_PREFIX - 1 + length`, length 1..=64.
pub const NAME_ASCII_PREFIX: u8 = 0x80;
/// Short multi-byte-content names, `0xC0..=0xF6`; lead is
/// `NAME_UNICODE_PREFIX - 2 + length`, length 2..=56.
pub const NAME_UNICODE_PREFIX: u8 = 0xC0;
/// Longest one-byte-content name encodable with a short token.
pub const NAME_ASCII_MAX_LEN: usize = 64;
/// Longest multi-byte-content name encodable with a short token.
pub const NAME_UNICODE_MAX_LEN: usize = 56;

/// Capacity of the shared string value table; the token indexes 5 bits.
pub const SHARED_STRING_CAPACITY: usize = 32;
/// Capacity of the shared name table; the token indexes 6 bits.
pub const SHARED_NAME_CAPACITY: usize = 64;
/// Longest string eligible for either shared table.
pub const SHARED_MAX_LEN: usize = 64;

/// Containers nested deeper than this fail decoding rather than recurse.
pub const MAX_DEPTH: usize = 1024;
