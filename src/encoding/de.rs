use super::{
    constants::*,
    shared::{shareable, SharedStringTable, StringTable},
};
use crate::{
    errors::DecodeError,
    fieldmap::FieldMap,
    float::Float,
    util::unzigzag,
    Smile::{self, *},
};
use bytes::Bytes;
use std::ops::Deref;

/// A bounds-checked sequential cursor over decode input.
///
/// Owns the remaining bytes and the count of bytes already consumed; every
/// read is checked and fails with [`DecodeError::UnexpectedEof`] rather than
/// running past the end.
#[derive(Clone, Debug)]
pub struct SmileBytes {
    bytes: Bytes,
    offset: usize,
}

impl SmileBytes {
    pub fn new(bytes: Bytes) -> SmileBytes { SmileBytes { bytes, offset: 0 } }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> usize { self.offset }

    /// Returns the next byte without consuming it.
    #[inline]
    pub fn peek_byte(&self) -> Result<u8, DecodeError> {
        if self.bytes.is_empty() {
            Err(DecodeError::UnexpectedEof {
                offset: self.offset,
            })
        } else {
            Ok(self.bytes[0])
        }
    }

    /// Consumes and returns the next byte.
    #[inline]
    pub fn take_byte(&mut self) -> Result<u8, DecodeError> {
        let byte = self.peek_byte()?;
        self.bytes.advance(1);
        self.offset += 1;
        Ok(byte)
    }

    /// Consumes and returns the next `len` bytes.
    #[inline]
    pub fn read_many(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        if self.bytes.len() >= len {
            self.offset += len;
            Ok(self.bytes.split_to(len))
        } else {
            Err(DecodeError::UnexpectedEof {
                offset: self.offset + self.bytes.len(),
            })
        }
    }

    /// Reads payload bytes up to, and consumes, the next terminator
    /// sentinel.
    fn read_terminated(&mut self) -> Result<Bytes, DecodeError> {
        match self.bytes.iter().position(|b| *b == END_OF_STRING) {
            Some(i) => {
                let payload = self.read_many(i)?;
                self.take_byte()?;
                Ok(payload)
            }
            None => Err(DecodeError::UnexpectedEof {
                offset: self.offset + self.bytes.len(),
            }),
        }
    }

    /// Parses the 4-byte stream preamble.
    pub fn read_header(&mut self) -> Result<Header, DecodeError> {
        let at = self.offset;
        if self.bytes.len() < HEADER_LEN {
            return Err(DecodeError::HeaderInvalid { offset: at });
        }
        let magic = self.read_many(MAGIC.len())?;
        if magic[..] != MAGIC[..] {
            return Err(DecodeError::HeaderInvalid { offset: at });
        }
        let options = self.take_byte()?;
        Ok(Header {
            version: options >> 4,
            raw_binary: options & FLAG_RAW_BINARY != 0,
            shared_strings: options & FLAG_SHARED_STRINGS != 0,
            shared_names: options & FLAG_SHARED_NAMES != 0,
        })
    }

    /// Classifies the next byte against the value-context token table and
    /// consumes it.
    pub fn read_value_tag(&mut self) -> Result<ValueTag, DecodeError> {
        let at = self.offset;
        let byte = self.take_byte()?;
        let tag = match byte {
            0x00..=0x1F => ValueTag::SharedStr(usize::from(byte & MASK_SHARED_STRING)),
            EMPTY_STRING => ValueTag::EmptyStr,
            LIT_NULL => ValueTag::Null,
            LIT_FALSE => ValueTag::Bool(false),
            LIT_TRUE => ValueTag::Bool(true),
            TOKEN_INT => ValueTag::Int,
            TOKEN_FLOAT_32 => ValueTag::Float32,
            TOKEN_FLOAT_64 => ValueTag::Float64,
            0x40..=0x7F => {
                ValueTag::ShortStr(StrClass::OneByte, usize::from(byte - TINY_ASCII_PREFIX) + 1)
            }
            0x80..=0xBE => {
                ValueTag::ShortStr(StrClass::Multi, usize::from(byte - TINY_UNICODE_PREFIX) + 2)
            }
            0xC0..=0xDF => ValueTag::SmallInt(byte & MASK_SMALL_INT),
            LONG_ASCII => ValueTag::LongStr(StrClass::OneByte),
            LONG_UNICODE => ValueTag::LongStr(StrClass::Multi),
            START_ARRAY => ValueTag::ArrStart,
            END_ARRAY => ValueTag::ArrEnd,
            START_OBJECT => ValueTag::MapStart,
            _ => return Err(DecodeError::MalformedToken { offset: at, byte }),
        };
        Ok(tag)
    }

    /// Classifies the next byte against the field-name token table and
    /// consumes it. The byte values overlap [`read_value_tag`]'s ranges on
    /// purpose; only the caller's parser state decides which classifier
    /// runs.
    ///
    /// [`read_value_tag`]: SmileBytes::read_value_tag
    pub fn read_name_tag(&mut self) -> Result<NameTag, DecodeError> {
        let at = self.offset;
        let byte = self.take_byte()?;
        let tag = match byte {
            EMPTY_STRING => NameTag::Empty,
            NAME_LONG => NameTag::Long,
            0x40..=0x7F => NameTag::Shared(usize::from(byte & MASK_SHARED_NAME)),
            0x80..=0xBF => {
                NameTag::Short(StrClass::OneByte, usize::from(byte - NAME_ASCII_PREFIX) + 1)
            }
            0xC0..=0xF6 => {
                NameTag::Short(StrClass::Multi, usize::from(byte - NAME_UNICODE_PREFIX) + 2)
            }
            END_OBJECT => NameTag::End,
            _ => return Err(DecodeError::MalformedToken { offset: at, byte }),
        };
        Ok(tag)
    }

    fn read_vint(&mut self) -> Result<i64, DecodeError> {
        let mut acc: u64 = 0;
        loop {
            let at = self.offset;
            let byte = self.take_byte()?;
            if byte & VINT_TERMINAL != 0 {
                if acc >> 58 != 0 {
                    return Err(DecodeError::MalformedToken { offset: at, byte });
                }
                let zz = (acc << 6) | u64::from(byte & VINT_LOW_MASK);
                return Ok(unzigzag(zz));
            }
            if acc >> 57 != 0 {
                return Err(DecodeError::MalformedToken { offset: at, byte });
            }
            acc = (acc << 7) | u64::from(byte);
        }
    }

    fn read_f32_bits(&mut self) -> Result<u32, DecodeError> {
        let start = self.offset;
        let mut first = 0;
        let mut acc: u64 = 0;
        for i in 0..5 {
            let at = self.offset;
            let byte = self.take_byte()?;
            if byte & 0x80 != 0 {
                return Err(DecodeError::MalformedToken { offset: at, byte });
            }
            if i == 0 {
                first = byte;
            }
            acc = (acc << 7) | u64::from(byte);
        }
        // 35-bit container; the top 3 bits are padding and must be clear
        if acc >> 32 != 0 {
            return Err(DecodeError::MalformedToken {
                offset: start,
                byte: first,
            });
        }
        Ok(acc as u32)
    }

    fn read_f64_bits(&mut self) -> Result<u64, DecodeError> {
        let start = self.offset;
        let mut first = 0;
        let mut acc: u128 = 0;
        for i in 0..10 {
            let at = self.offset;
            let byte = self.take_byte()?;
            if byte & 0x80 != 0 {
                return Err(DecodeError::MalformedToken { offset: at, byte });
            }
            if i == 0 {
                first = byte;
            }
            acc = (acc << 7) | u128::from(byte);
        }
        // 70-bit container; the top 6 bits are padding and must be clear
        if acc >> 64 != 0 {
            return Err(DecodeError::MalformedToken {
                offset: start,
                byte: first,
            });
        }
        Ok(acc as u64)
    }
}

impl Deref for SmileBytes {
    type Target = Bytes;

    fn deref(&self) -> &Bytes { &self.bytes }
}

impl From<Bytes> for SmileBytes {
    fn from(b: Bytes) -> Self { SmileBytes::new(b) }
}

impl From<Vec<u8>> for SmileBytes {
    fn from(v: Vec<u8>) -> Self { SmileBytes::new(Bytes::from(v)) }
}

impl<'a> From<&'a Vec<u8>> for SmileBytes {
    fn from(v: &'a Vec<u8>) -> Self { SmileBytes::new(Bytes::from(v.as_slice())) }
}

impl<'a> From<&'a [u8]> for SmileBytes {
    fn from(s: &'a [u8]) -> Self { SmileBytes::new(Bytes::from(s)) }
}

/// Content class of a short or long string token.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StrClass {
    /// Every code point occupies one byte.
    OneByte,
    /// At least one code point occupies several bytes.
    Multi,
}

/// A leading byte interpreted in value context.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueTag {
    Null,
    Bool(bool),
    EmptyStr,
    /// Small integer; carries the zigzag value from the token's low bits.
    SmallInt(u8),
    /// Integer escape; a vint payload follows.
    Int,
    Float32,
    Float64,
    /// Short string; carries the payload length taken from the lead byte.
    ShortStr(StrClass, usize),
    /// Long string; payload runs to the terminator sentinel.
    LongStr(StrClass),
    /// Back-reference into the shared string value table.
    SharedStr(usize),
    ArrStart,
    ArrEnd,
    MapStart,
}

/// The same leading-byte space interpreted in field-name context.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NameTag {
    Empty,
    Short(StrClass, usize),
    Long,
    /// Back-reference into the shared name table.
    Shared(usize),
    /// Object end marker.
    End,
}

/// Decoder options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Whether the input starts with the 4-byte preamble. When it does, the
    /// header's flag bits govern back-reference handling.
    pub include_header: bool,
    /// Shared string values for headerless input; ignored when a header is
    /// present.
    pub shared_strings: bool,
    /// Shared field names for headerless input; ignored when a header is
    /// present.
    pub shared_names: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            include_header: true,
            shared_strings: false,
            shared_names: false,
        }
    }
}

impl DecodeConfig {
    /// Headerless input with all sharing disabled; the plain token stream.
    pub fn bare() -> Self {
        DecodeConfig {
            include_header: false,
            ..DecodeConfig::default()
        }
    }
}

/// A parsed stream preamble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub raw_binary: bool,
    pub shared_strings: bool,
    pub shared_names: bool,
}

/// Rebuilds a [`Smile`] tree from a token stream.
///
/// Parser context is explicit: [`SmileBytes::read_value_tag`] runs where a
/// value may start and [`SmileBytes::read_name_tag`] where a field name may
/// start, so a byte's meaning is never inferred from its numeric range
/// alone. Container recursion is bounded; input deeper than
/// [`MAX_DEPTH`](super::constants::MAX_DEPTH) fails with
/// [`DecodeError::DepthExceeded`] instead of overflowing the stack.
#[derive(Clone, Debug)]
pub struct Decoder<T: StringTable = SharedStringTable> {
    conf: DecodeConfig,
    string_values: T,
    names: T,
    shared_strings: bool,
    shared_names: bool,
}

impl Decoder {
    /// Creates a decoder with the default back-reference tables.
    pub fn new(conf: DecodeConfig) -> Decoder {
        Decoder::with_tables(
            conf,
            SharedStringTable::string_values(),
            SharedStringTable::names(),
        )
    }
}

impl<T: StringTable> Decoder<T> {
    /// Creates a decoder around caller-supplied back-reference tables.
    pub fn with_tables(conf: DecodeConfig, string_values: T, names: T) -> Decoder<T> {
        Decoder {
            conf,
            string_values,
            names,
            shared_strings: false,
            shared_names: false,
        }
    }

    /// The options this decoder was built with.
    pub fn config(&self) -> DecodeConfig { self.conf }

    /// Decodes one document, leaving the cursor just past its last token.
    pub fn decode(&mut self, dat: &mut SmileBytes) -> Result<Smile, DecodeError> {
        self.string_values.clear();
        self.names.clear();
        if self.conf.include_header {
            let header = dat.read_header()?;
            self.shared_strings = header.shared_strings;
            self.shared_names = header.shared_names;
        } else {
            self.shared_strings = self.conf.shared_strings;
            self.shared_names = self.conf.shared_names;
        }
        self.value(dat, 0)
    }

    fn value(&mut self, dat: &mut SmileBytes, depth: usize) -> Result<Smile, DecodeError> {
        let at = dat.offset();
        let tag = dat.read_value_tag()?;
        self.value_of(dat, tag, at, depth)
    }

    fn value_of(
        &mut self,
        dat: &mut SmileBytes,
        tag: ValueTag,
        at: usize,
        depth: usize,
    ) -> Result<Smile, DecodeError> {
        match tag {
            ValueTag::Null => Ok(Null),
            ValueTag::Bool(b) => Ok(Bool(b)),
            ValueTag::EmptyStr => Ok(Str(Bytes::new())),
            ValueTag::SmallInt(zz) => Ok(Int(unzigzag(u64::from(zz)))),
            ValueTag::Int => Ok(Int(dat.read_vint()?)),
            ValueTag::Float32 => Ok(Sfloat(Float::Single(dat.read_f32_bits()?))),
            ValueTag::Float64 => Ok(Sfloat(Float::Double(dat.read_f64_bits()?))),
            ValueTag::ShortStr(_, len) => {
                let bs = dat.read_many(len)?;
                self.record_string(&bs);
                Ok(Str(bs))
            }
            ValueTag::LongStr(_) => {
                let bs = dat.read_terminated()?;
                self.record_string(&bs);
                Ok(Str(bs))
            }
            ValueTag::SharedStr(idx) => self.shared_string(idx, at).map(Str),
            ValueTag::ArrStart => self.array(dat, at, depth + 1),
            ValueTag::MapStart => self.object(dat, at, depth + 1),
            // legal only while an array is open; the array loop consumes it
            ValueTag::ArrEnd => Err(DecodeError::MalformedToken {
                offset: at,
                byte: END_ARRAY,
            }),
        }
    }

    fn array(
        &mut self,
        dat: &mut SmileBytes,
        at: usize,
        depth: usize,
    ) -> Result<Smile, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::DepthExceeded { offset: at });
        }
        let mut items = Vec::new();
        loop {
            let at = dat.offset();
            match dat.read_value_tag()? {
                ValueTag::ArrEnd => return Ok(Array(items)),
                tag => items.push(self.value_of(dat, tag, at, depth)?),
            }
        }
    }

    fn object(
        &mut self,
        dat: &mut SmileBytes,
        at: usize,
        depth: usize,
    ) -> Result<Smile, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::DepthExceeded { offset: at });
        }
        let mut entries: Vec<(Bytes, Smile)> = Vec::new();
        loop {
            let at = dat.offset();
            let lead = dat.peek_byte()?;
            let name = match dat.read_name_tag()? {
                NameTag::End => return Ok(Map(FieldMap::from_entries(entries))),
                NameTag::Empty => Bytes::new(),
                NameTag::Short(_, len) => {
                    let bs = dat.read_many(len)?;
                    self.record_name(&bs);
                    bs
                }
                NameTag::Long => {
                    let bs = dat.read_terminated()?;
                    self.record_name(&bs);
                    bs
                }
                NameTag::Shared(idx) => self.shared_name(idx, at)?,
            };
            // names are unique within one object
            if entries.iter().any(|(k, _)| *k == name) {
                return Err(DecodeError::MalformedToken {
                    offset: at,
                    byte: lead,
                });
            }
            let value = self.value(dat, depth)?;
            entries.push((name, value));
        }
    }

    fn record_string(&mut self, bs: &Bytes) {
        if self.shared_strings && shareable(bs) {
            self.string_values.insert(bs);
        }
    }

    fn record_name(&mut self, bs: &Bytes) {
        if self.shared_names && shareable(bs) {
            self.names.insert(bs);
        }
    }

    fn shared_string(&self, idx: usize, at: usize) -> Result<Bytes, DecodeError> {
        if !self.shared_strings {
            return Err(DecodeError::UnsupportedFeature {
                offset: at,
                reason: "shared string values are not enabled for this stream",
            });
        }
        match self.string_values.get(idx) {
            Some(bs) => Ok(bs.clone()),
            None => Err(DecodeError::UnsupportedFeature {
                offset: at,
                reason: "shared string reference out of range",
            }),
        }
    }

    fn shared_name(&self, idx: usize, at: usize) -> Result<Bytes, DecodeError> {
        if !self.shared_names {
            return Err(DecodeError::UnsupportedFeature {
                offset: at,
                reason: "shared field names are not enabled for this stream",
            });
        }
        match self.names.get(idx) {
            Some(bs) => Ok(bs.clone()),
            None => Err(DecodeError::UnsupportedFeature {
                offset: at,
                reason: "shared name reference out of range",
            }),
        }
    }
}
