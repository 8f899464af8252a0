use super::{
    constants::*,
    shared::{shareable, SharedStringTable, StringTable},
};
use crate::{
    float::Float,
    util::zigzag,
    Smile::{self, *},
};
use bytes::Bytes;
use smallvec::{smallvec, SmallVec};

/// Encoder options; the field set mirrors the options byte of the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Format version, `0..=15`, written to the header's top nibble.
    pub version: u8,
    /// Whether to start the output with the 4-byte preamble.
    pub include_header: bool,
    /// Advertises raw binary content in the header. The value model has no
    /// binary kind, so this only sets the flag bit.
    pub raw_binary: bool,
    /// Encode repeated string values as back-references.
    pub shared_strings: bool,
    /// Encode repeated field names as back-references.
    pub shared_names: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        EncodeConfig {
            version: 0,
            include_header: true,
            raw_binary: false,
            shared_strings: false,
            shared_names: true,
        }
    }
}

impl EncodeConfig {
    /// Headerless output with all sharing disabled; the plain token stream.
    pub fn bare() -> Self {
        EncodeConfig {
            include_header: false,
            shared_names: false,
            ..EncodeConfig::default()
        }
    }
}

/// Walks a [`Smile`] tree depth-first and emits its token stream.
///
/// The two back-reference tables are injected collaborators; [`Encoder::new`]
/// supplies [`SharedStringTable`]s sized to the token index spaces. Tables
/// are reset at the start of every document.
#[derive(Clone, Debug)]
pub struct Encoder<T: StringTable = SharedStringTable> {
    conf: EncodeConfig,
    string_values: T,
    names: T,
}

impl Encoder {
    /// Creates an encoder with the default back-reference tables.
    pub fn new(conf: EncodeConfig) -> Encoder {
        Encoder::with_tables(
            conf,
            SharedStringTable::string_values(),
            SharedStringTable::names(),
        )
    }
}

impl<T: StringTable> Encoder<T> {
    /// Creates an encoder around caller-supplied back-reference tables.
    pub fn with_tables(conf: EncodeConfig, string_values: T, names: T) -> Encoder<T> {
        Encoder {
            conf,
            string_values,
            names,
        }
    }

    /// The options this encoder was built with.
    pub fn config(&self) -> EncodeConfig { self.conf }

    /// Encodes one document into a fresh buffer.
    pub fn encode(&mut self, v: &Smile) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(v, &mut out);
        out
    }

    /// Encodes one document, appending to `out`.
    pub fn encode_into(&mut self, v: &Smile, out: &mut Vec<u8>) {
        self.string_values.clear();
        self.names.clear();
        if self.conf.include_header {
            self.put_header(out);
        }
        self.put_value(v, out);
    }

    fn put_header(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        let mut options = (self.conf.version & 0x0F) << 4;
        if self.conf.raw_binary {
            options |= FLAG_RAW_BINARY;
        }
        if self.conf.shared_strings {
            options |= FLAG_SHARED_STRINGS;
        }
        if self.conf.shared_names {
            options |= FLAG_SHARED_NAMES;
        }
        out.push(options);
    }

    fn put_value(&mut self, v: &Smile, out: &mut Vec<u8>) {
        match v {
            Null => out.push(LIT_NULL),
            Bool(true) => out.push(LIT_TRUE),
            Bool(false) => out.push(LIT_FALSE),
            Int(i) => put_int(*i, out),
            Sfloat(f) => put_float(*f, out),
            Str(bs) => self.put_str(bs, out),
            Array(vs) => {
                out.push(START_ARRAY);
                for v in vs {
                    self.put_value(v, out);
                }
                out.push(END_ARRAY);
            }
            Map(m) => {
                out.push(START_OBJECT);
                for (k, v) in m.iter() {
                    self.put_name(k, out);
                    self.put_value(v, out);
                }
                out.push(END_OBJECT);
            }
        }
    }

    fn put_str(&mut self, bs: &Bytes, out: &mut Vec<u8>) {
        if bs.is_empty() {
            out.push(EMPTY_STRING);
            return;
        }
        if self.conf.shared_strings {
            if let Some(idx) = self.string_values.lookup(bs) {
                // an oversized index cannot be expressed; keep the literal
                if idx <= MASK_SHARED_STRING as usize {
                    out.push(idx as u8);
                    return;
                }
            }
        }
        let len = bs.len();
        if is_one_byte_content(bs) {
            if len <= TINY_STR_MAX_LEN {
                out.push(TINY_ASCII_PREFIX - 1 + len as u8);
                out.extend_from_slice(bs);
            } else {
                out.push(LONG_ASCII);
                out.extend_from_slice(bs);
                out.push(END_OF_STRING);
            }
        } else if len <= TINY_STR_MAX_LEN {
            out.push(TINY_UNICODE_PREFIX - 2 + len as u8);
            out.extend_from_slice(bs);
        } else {
            out.push(LONG_UNICODE);
            out.extend_from_slice(bs);
            out.push(END_OF_STRING);
        }
        if self.conf.shared_strings && shareable(bs) {
            self.string_values.insert(bs);
        }
    }

    fn put_name(&mut self, bs: &Bytes, out: &mut Vec<u8>) {
        if bs.is_empty() {
            out.push(EMPTY_STRING);
            return;
        }
        if self.conf.shared_names {
            if let Some(idx) = self.names.lookup(bs) {
                if idx <= MASK_SHARED_NAME as usize {
                    out.push(NAME_SHARED_PREFIX | idx as u8);
                    return;
                }
            }
        }
        let len = bs.len();
        let one_byte = is_one_byte_content(bs);
        if one_byte && len <= NAME_ASCII_MAX_LEN {
            out.push(NAME_ASCII_PREFIX - 1 + len as u8);
            out.extend_from_slice(bs);
        } else if !one_byte && len <= NAME_UNICODE_MAX_LEN {
            out.push(NAME_UNICODE_PREFIX - 2 + len as u8);
            out.extend_from_slice(bs);
        } else {
            out.push(NAME_LONG);
            out.extend_from_slice(bs);
            out.push(END_OF_STRING);
        }
        if self.conf.shared_names && shareable(bs) {
            self.names.insert(bs);
        }
    }
}

/// True when every code point of the payload occupies exactly one byte.
///
/// Derived from code-point structure: in UTF-8 the one-byte code points are
/// exactly the bytes with the high bit clear, so a single scan for a set
/// high bit counts multi-byte code points exactly.
pub(crate) fn is_one_byte_content(bs: &[u8]) -> bool { bs.iter().all(|b| b & 0x80 == 0) }

fn put_int(n: i64, out: &mut Vec<u8>) {
    let zz = zigzag(n);
    if zz <= u64::from(SMALL_INT_MAX) {
        out.push(SMALL_INT_PREFIX | zz as u8);
        return;
    }
    out.push(TOKEN_INT);
    // big-endian 7-bit groups of the high bits, leading zero groups omitted
    let mut groups: SmallVec<[u8; 9]> = smallvec![];
    let mut hi = zz >> 6;
    while hi != 0 {
        groups.push((hi & 0x7F) as u8);
        hi >>= 7;
    }
    for g in groups.iter().rev() {
        out.push(*g);
    }
    out.push(VINT_TERMINAL | (zz & u64::from(VINT_LOW_MASK)) as u8);
}

fn put_float(f: Float, out: &mut Vec<u8>) {
    match f {
        Float::Single(bits) => {
            out.push(TOKEN_FLOAT_32);
            for i in (0..5).rev() {
                out.push(((u64::from(bits) >> (7 * i)) & 0x7F) as u8);
            }
        }
        Float::Double(bits) => {
            out.push(TOKEN_FLOAT_64);
            for i in (0..10).rev() {
                out.push(((bits >> (7 * i)) & 0x7F) as u8);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_class_is_per_code_point() {
        assert!(is_one_byte_content(b""));
        assert!(is_one_byte_content(b"strtest"));
        // 2-byte code point
        assert!(!is_one_byte_content("\u{153}".as_bytes()));
        // 3-byte code point
        assert!(!is_one_byte_content("\u{2248}".as_bytes()));
        assert!(!is_one_byte_content("strtest\u{153}".as_bytes()));
    }

    #[test]
    fn vint_groups_are_minimal() {
        let out = &mut Vec::new();
        // zigzag(16) = 32: escape plus terminal, no groups
        put_int(16, out);
        assert_eq!(*out, vec![TOKEN_INT, 0xA0]);

        // zigzag(4095) = 8190: one group
        let out = &mut Vec::new();
        put_int(4095, out);
        assert_eq!(*out, vec![TOKEN_INT, 0x7F, 0xBE]);
    }
}
