//! # Smile
//!
//! A codec for a compact, self-describing binary interchange format covering
//! the JSON data model: null, booleans, integers, floats, strings, arrays,
//! and ordered field maps, packed into a dense byte stream with
//! variable-length integers, short-string inlining, and optional
//! back-reference tables for repeated strings and field names.
//!
//! # Usage
//!
//! Values are built as [`Smile`] trees and moved through
//! [`encode_full`]/[`decode_full`] (or their headerless and
//! explicitly-configured siblings in [`encoding`]):
//!
//! ```
//! use smile::prelude::*;
//!
//! let breakfast = Smile::from(vec![
//!     Smile::from("spam"),
//!     Smile::from("eggs"),
//!     Smile::from(2),
//! ]);
//!
//! // encode
//! let encoded = encode_full(&breakfast);
//!
//! // and then immediately decode, because this is a silly example
//! let decoded = decode_full(&encoded).unwrap();
//!
//! assert_eq!(breakfast, decoded);
//! ```
//!
//! Host types convert through the [`SmileRep`](rep::SmileRep) trait; see
//! [`rep`] for hand-written mapping with deterministic field order.
//!
//! # An overview of Smile types
//!
//! ## Integers
//!
//! The wire integer is a signed 64-bit value ([`Smile::Int`]). All other
//! integer widths convert through it.
//!
//! ```
//! use smile::prelude::*;
//!
//! let small = Smile::from(23u8);
//!
//! let negative = Smile::from(-99i64);
//! ```
//!
//! ## Floats
//!
//! Single and double precision floats are carried as raw IEEE754 bit
//! patterns ([`Float`](float::Float)), so NaN payloads and signed zeros
//! survive a round-trip and equality is bitwise.
//!
//! ```
//! use smile::prelude::*;
//!
//! let single = Smile::from(1f32);
//!
//! let double = Smile::from(1f64);
//! ```
//!
//! ## Strings
//!
//! Strings are byte sequences expected (but not required) to hold UTF-8.
//!
//! ```
//! use smile::prelude::*;
//!
//! let a_str = Smile::from("hello world");
//!
//! let literal = Smile::from_static(b"this is a bytestring literal");
//!
//! let a_string = "This is a string".to_string();
//! let k_string = Smile::from(a_string);
//! ```
//!
//! ## Arrays
//!
//! Arrays are ordered sequences of Smile values.
//!
//! ```
//! use smile::prelude::*;
//!
//! let some_numbers = Smile::from(vec![1, 2, 3, 4, 5]);
//! ```
//!
//! ## Maps
//!
//! Maps are ordered sequences of unique (field name, value) pairs, stored as
//! a [`FieldMap`](fieldmap::FieldMap). Decoding preserves stream order;
//! conversions from the standard map types sort lexicographically so
//! free-form maps always encode in one reproducible order.
//!
//! ```
//! use std::collections::HashMap;
//! use smile::prelude::*;
//!
//! let mut a_map = HashMap::new();
//!
//! a_map.insert(Bytes::from("key"), 250);
//!
//! let k_map = a_map.into_smile();
//! ```
//!
//! # Specification
//!
//! This section describes the binary format.
//!
//! ## Header
//!
//! A stream opens with 3 magic bytes `3A 29 0A` (`:)\n`) and one options
//! byte:
//!
//! | Bits  | Semantics                    |
//! | ---   | ---                          |
//! | 7..4  | format version               |
//! | 3     | reserved                     |
//! | 2     | raw binary content present   |
//! | 1     | shared string values enabled |
//! | 0     | shared field names enabled   |
//!
//! The two shared bits govern whether back-reference tokens are legal in the
//! body. Headerless streams are supported where both sides agree on the
//! options out of band.
//!
//! ## Tokens
//!
//! The leading byte of every token is interpreted against one of two tables
//! depending on parser context. In *value* context:
//!
//! | Lead byte     | Semantics                                              |
//! | ---           | ---                                                    |
//! | `0x00..=0x1F` | shared string value, index in the low 5 bits           |
//! | `0x20`        | empty string                                           |
//! | `0x21`        | `null`                                                 |
//! | `0x22`/`0x23` | `false` / `true`                                       |
//! | `0x24`        | integer escape, vint payload follows                   |
//! | `0x28`/`0x29` | 32-bit / 64-bit float, fixed-width payload follows     |
//! | `0x40..=0x7F` | short one-byte-content string, `0x40 - 1 + length`     |
//! | `0x80..=0xBE` | short multi-byte-content string, `0x80 - 2 + length`   |
//! | `0xC0..=0xDF` | small integer, zigzag value in the low 5 bits          |
//! | `0xE0`/`0xE4` | long one-byte / multi-byte string, `0xFC`-terminated   |
//! | `0xF8`/`0xF9` | array start / end                                      |
//! | `0xFA`        | object start                                           |
//!
//! Inside an object, where a field name may start, the *same* byte values
//! are reinterpreted:
//!
//! | Lead byte     | Semantics                                              |
//! | ---           | ---                                                    |
//! | `0x20`        | empty name                                             |
//! | `0x34`        | long name, `0xFC`-terminated                           |
//! | `0x40..=0x7F` | shared name, index in the low 6 bits                   |
//! | `0x80..=0xBF` | short one-byte-content name, `0x80 - 1 + length` (≤64) |
//! | `0xC0..=0xF6` | short multi-byte-content name, `0xC0 - 2 + length` (≤56) |
//! | `0xFB`        | object end                                             |
//!
//! String content is classed by code-point structure: *one-byte* content is
//! a string in which every code point occupies a single byte.
//!
//! ## Integers
//!
//! Integers are zigzag-transformed (`0, -1, 1, -2, … → 0, 1, 2, 3, …`) so
//! small magnitudes stay small. A zigzag value up to 31 fits the small-int
//! token. Larger values follow the `0x24` escape as big-endian 7-bit groups
//! with the high bit clear (leading all-zero groups omitted), closed by a
//! terminal byte carrying the low 6 bits with the high bit set. The full
//! 64-bit range takes at most 11 bytes.
//!
//! ## Floats
//!
//! Float payloads are fixed-width big-endian 7-bit groups of the IEEE754
//! bit pattern: 5 bytes for 32-bit, 10 bytes for 64-bit. Every payload byte
//! has the high bit clear and the container padding bits are zero. Bit
//! patterns pass through literally.
//!
//! ## Back-references
//!
//! With the corresponding header bit set, each side remembers every literal
//! non-empty string of at most 64 encoded bytes, in stream order: value
//! strings in a 32-entry table, field names in a 64-entry table. A repeat
//! may then be sent as a table index. Full tables stop growing and repeats
//! fall back to literals, so the two sides never need to negotiate.
//!
//! ## A known limitation
//!
//! The `0xFC` terminator is *not* escaped when it occurs inside a long
//! string's payload; such a string decodes truncated at the first `0xFC`
//! byte. Strings of at most 64 bytes always use length-prefixed tokens and
//! are immune. Callers storing arbitrary binary-ish text in longer strings
//! should be aware of this limitation.

#![warn(
//    missing_docs,
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_copy_implementations,
    missing_debug_implementations,
    macro_use_extern_crate,
    unreachable_pub,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]

pub mod encoding;
pub mod errors;
pub mod fieldmap;
pub mod float;
pub mod prelude;
pub mod rep;
pub mod util;

use bytes::Bytes;
use failure::*;
use fieldmap::*;
use float::*;
use rep::SmileRep;
use std::{
    collections::HashMap,
    convert::{TryFrom, TryInto},
};

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
/// [`Smile`] and its variants.
///
/// # Example
///
/// ```
/// use smile::prelude::*;
///
/// let b = Smile::Bool(true);
///
/// let val = match b {
///     Smile::Bool(b) => b,
///     _ => panic!(),
/// };
///
/// assert!(val);
/// ```
pub enum Smile {
    /// Null. Corresponds to [`None`].
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::*;
    ///
    /// let k_null = Smile::Null;
    /// ```
    Null,
    /// Boolean.
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::{Smile::Bool, *};
    ///
    /// let k_bool = Bool(true);
    /// ```
    Bool(bool),
    /// Signed 64-bit integer.
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::{Smile::Int, *};
    ///
    /// let k_num = Int(1);
    /// ```
    Int(i64),
    /// Floating point number, stored as its bit pattern.
    ///
    /// ```
    /// use smile::prelude::{Smile::Sfloat, *};
    ///
    /// let f = Float::Single(1f32.to_bits());
    ///
    /// let k_float = Sfloat(f);
    /// ```
    Sfloat(Float),
    /// String: a byte sequence expected to hold UTF-8.
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::{Smile::Str, *};
    ///
    /// let bytes = Bytes::from_static(b"hello world");
    ///
    /// let k_str = Str(bytes);
    /// ```
    Str(Bytes),
    /// Array.
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::{Smile::Array, *};
    ///
    /// let k_array = Array(vec![1, 2, 3, 4].into_iter().map(Smile::from).collect());
    /// ```
    Array(Vec<Smile>),
    /// Map: ordered fields with unique names.
    ///
    /// ```
    /// use smile::prelude::{Smile::Map, *};
    ///
    /// let fmap = FieldMap::from_entries(vec![(Bytes::from("hello"), Smile::from(1))]);
    ///
    /// let k_map = Map(fmap);
    /// ```
    Map(FieldMap<Bytes, Smile>),
}

use Smile::*;

impl Smile {
    /// Converts a [`Smile`] value to a vector of [`Smile`].
    /// This will return a [`Error`] if the value is not a [`Smile::Array`].
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::*;
    ///
    /// let ks = Smile::from(vec![1, 2, 3]);
    ///
    /// let k_numbers = ks.to_vec().unwrap();
    ///
    /// assert_eq!(k_numbers.len(), 3);
    /// ```
    pub fn to_vec(&self) -> Result<&Vec<Smile>, Error> {
        match self {
            Array(a) => Ok(a),
            _ => bail!("This value is not an `Array`"),
        }
    }

    /// Consumes a [`Smile`] value, converting it into a vector of [`Smile`]
    /// values. This will return a [`Error`] if the value is not a
    /// [`Smile::Array`].
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::*;
    ///
    /// let ks = Smile::from(vec![1, 2, 3]);
    ///
    /// let k_numbers = ks.into_vec().unwrap();
    ///
    /// assert_eq!(k_numbers.len(), 3);
    /// ```
    pub fn into_vec(self) -> Result<Vec<Smile>, Error> {
        match self.try_into() {
            Ok(v) => Ok(v),
            Err(_e) => bail!("This value is not an `Array`"),
        }
    }

    /// Converts a [`Smile`] value to a [`FieldMap`].
    /// This will return a [`Error`] if the value is not a [`Smile`] map.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use smile::prelude::*;
    ///
    /// let mut simple_map = HashMap::new();
    /// simple_map.insert(Bytes::from("foo"), 1);
    ///
    /// let k_map = simple_map.into_smile();
    ///
    /// let fmap = k_map.to_fieldmap().unwrap();
    /// ```
    pub fn to_fieldmap(&self) -> Result<&FieldMap<Bytes, Smile>, Error> {
        match self {
            Map(fmap) => Ok(fmap),
            _ => bail!("This value is not a `Map`"),
        }
    }

    /// Consumes a [`Smile`] value, converting it into a [`FieldMap`].
    /// This will return a [`Error`] if the value is not a [`Smile`] map.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use smile::prelude::*;
    ///
    /// let mut simple_map = HashMap::new();
    /// simple_map.insert(Bytes::from("foo"), 1);
    ///
    /// let k_map = simple_map.into_smile();
    ///
    /// let fmap = k_map.into_fieldmap().unwrap();
    /// ```
    pub fn into_fieldmap(self) -> Result<FieldMap<Bytes, Smile>, Error> {
        match self.try_into() {
            Ok(v) => Ok(v),
            Err(_e) => bail!("This value is not a `Map`"),
        }
    }

    /// Consumes a [`Smile`] value, converting it into a [`HashMap`].
    /// This will return a [`Error`] if the value is not a [`Smile::Map`].
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use smile::prelude::*;
    ///
    /// let mut simple_map = HashMap::new();
    /// simple_map.insert(Bytes::from("foo"), 1);
    ///
    /// let k_map = simple_map.into_smile();
    ///
    /// let hmap = k_map.into_map().unwrap();
    ///
    /// assert_eq!(hmap.len(), 1);
    /// ```
    pub fn into_map(self) -> Result<HashMap<Bytes, Smile>, Error> {
        Ok(self.into_fieldmap()?.into_hashmap())
    }

    /// Consumes a [`Smile`] value, converting it to a value of type `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::*;
    ///
    /// let ks_num = 1.to_smile();
    ///
    /// let num: u8 = ks_num.into_rep().unwrap();
    ///
    /// assert_eq!(num, 1);
    /// ```
    pub fn into_rep<T: SmileRep>(self) -> Result<T, Error> { T::from_smile(self) }

    /// Converts a bytestring literal to [`Smile`].
    ///
    /// # Arguments
    ///
    /// * `bytes: &'static [u8]` - the bytestring literal to be converted.
    ///
    /// # Example
    /// ```
    /// use smile::prelude::*;
    ///
    /// let foo = b"this is an example";
    ///
    /// let ks_foo = Smile::from_static(foo);
    /// ```
    pub fn from_static(bytes: &'static [u8]) -> Smile { Str(Bytes::from_static(bytes)) }

    /// Indicates whether a value is [`Null`].
    ///
    /// # Example
    ///
    /// ```
    /// use smile::Smile::Null;
    ///
    /// let foo = Null;
    ///
    /// assert!(foo.is_null());
    /// ```
    pub fn is_null(&self) -> bool {
        match self {
            Null => true,
            _ => false,
        }
    }

    /// Tries to convert a value to an [`i64`].
    /// This will return a [`Error`] if the value is not a [`Smile::Int`].
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::*;
    ///
    /// let n = Smile::from(1).to_i64().unwrap();
    ///
    /// assert_eq!(n, 1);
    /// ```
    pub fn to_i64(&self) -> Result<i64, Error> {
        match self {
            Int(i) => Ok(*i),
            _ => bail!("Value is not `Int`, cannot convert to `i64`"),
        }
    }

    /// Tries to convert a value to a [`Float`].
    /// This will return a [`Error`] if the value is not a [`Smile::Sfloat`].
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::*;
    ///
    /// let f = Smile::from(1f32).to_float().unwrap();
    ///
    /// assert_eq!(f, Float::Single(1f32.to_bits()));
    /// ```
    pub fn to_float(&self) -> Result<Float, Error> {
        match self {
            Sfloat(f) => Ok(*f),
            _ => bail!("Value is not `Sfloat`, cannot convert to `Float`"),
        }
    }

    /// Tries to convert a value to a [`bool`].
    /// This will return a [`Error`] if the value is not a [`Smile::Bool`].
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::*;
    ///
    /// let b = Smile::from(true);
    ///
    /// assert!(b.to_bool().unwrap());
    /// ```
    pub fn to_bool(&self) -> Result<bool, Error> {
        match self {
            Bool(b) => Ok(*b),
            _ => bail!("Value is not `Bool`"),
        }
    }

    /// Tries to convert a value to [`Bytes`].
    /// This will return a [`Error`] if the value is not a [`Smile::Str`].
    ///
    /// # Example
    ///
    /// ```
    /// use smile::Smile;
    ///
    /// let foo = Smile::from_static(b"This is an example");
    ///
    /// let foo_bytes = foo.to_bytes().unwrap();
    /// ```
    pub fn to_bytes(&self) -> Result<&Bytes, Error> {
        match self {
            Str(s) => Ok(s),
            _ => bail!("Value is not a string"),
        }
    }
}

fn fmt_bytes(bytes: &Bytes) -> String {
    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => {
            let mut string: String = "\"".to_owned();
            string.push_str(&s);
            string.push_str("\"");

            string
        }
        Err(_) => {
            let mut bytes_string: String = "b\"".to_owned();
            bytes
                .iter()
                .for_each(|c| bytes_string.push_str(&format!("{:x}", c)));
            bytes_string.push_str("\"");

            bytes_string
        }
    }
}

// TODO make the display nicer for recursive structures
impl std::fmt::Display for Smile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        fn fmt_map(m: &FieldMap<Bytes, Smile>, indent: usize) -> String {
            let mut map_string: String = "{".to_owned();
            for (i, (k, v)) in m.iter().enumerate() {
                if i == 0 {
                    map_string.push_str(&format!("\n{:indent$}", "", indent = indent + 2));
                } else {
                    map_string.push_str(&format!(",\n{:indent$}", "", indent = indent + 2));
                }

                let value = fmt_helper(v, indent + 2);
                map_string.push_str(&format!(
                    "{key}: {value}",
                    key = fmt_bytes(k),
                    value = value,
                ));

                // check if we're at last element
                if i == m.len() - 1 {
                    map_string.push_str(&format!("\n{:indent$}", "", indent = indent));
                }
            }
            map_string.push('}');

            map_string
        }

        fn fmt_helper(ks: &Smile, indent: usize) -> String {
            match ks {
                Null => "NULL".to_owned(),
                Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_owned(),
                Int(i) => format!("{}", i),
                Sfloat(float) => format!("{}", float),
                Str(bytes) => fmt_bytes(bytes),
                Array(a) => {
                    let mut arr_string: String = "[".to_owned();
                    for (i, ks) in a.iter().enumerate() {
                        if i != 0 {
                            arr_string.push_str(", ");
                        }
                        arr_string.push_str(&format!("{}", ks));
                    }
                    arr_string.push(']');

                    arr_string
                }
                Map(m) => fmt_map(m, indent),
            }
        }

        write!(f, "{}", fmt_helper(self, 0))
    }
}

impl From<&str> for Smile {
    fn from(s: &str) -> Smile { Str(Bytes::from(s)) }
}

impl From<String> for Smile {
    fn from(s: String) -> Smile { Str(Bytes::from(s)) }
}

impl<T: Into<Smile>> From<Vec<T>> for Smile {
    fn from(v: Vec<T>) -> Smile { Array(v.into_iter().map(T::into).collect()) }
}

impl<T: Into<Smile>> From<FieldMap<Bytes, T>> for Smile {
    fn from(m: FieldMap<Bytes, T>) -> Smile {
        Map(FieldMap::from_entries(
            m.into_iter().map(|(k, v)| (k, v.into())).collect(),
        ))
    }
}

// bool -> Smile, From
from_fn!(Smile, bool, Bool);
// bool -> Smile, TryFrom
try_from_ctor!(Smile, bool, Bool);

// i64 -> Smile, From
from_fn!(Smile, i64, Int);
// i64 -> Smile, TryFrom
try_from_ctor!(Smile, i64, Int);

// Bytes -> Smile, From
from_fn!(Smile, Bytes, Str);
// Bytes -> Smile, TryFrom
try_from_ctor!(Smile, Bytes, Str);

// Float -> Smile, From
from_fn!(Smile, Float, Sfloat);
// Float -> Smile, TryFrom
try_from_ctor!(Smile, Float, Sfloat);

try_from_ctor!(Smile, Vec<Smile>, Array);
try_from_ctor!(Smile, FieldMap<Bytes, Smile>, Map);

// Integers
from_prims!(Smile);

// Floats
compose_from!(Smile, Float, f32);
compose_from!(Smile, Float, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_tests() {
        assert!(Null.is_null());

        assert!(Smile::from(5).to_i64().is_ok());

        assert!(Smile::from(true).to_bool().unwrap());

        assert_eq!(
            Smile::from(Bytes::from("word")).to_bytes().unwrap(),
            &Bytes::from("word")
        );
    }

    #[test]
    fn from_vec() {
        let v: Vec<u8> = vec![0, 1, 2, 3, 4];
        let val: Vec<u8> = Smile::from(v.clone()).into_rep().unwrap();
        assert_eq!(val, v);
    }

    #[test]
    fn display_renders_nested_values() {
        let m = FieldMap::from_entries(vec![(Bytes::from("xs"), Smile::from(vec![1, 2]))]);
        let rendered = format!("{}", Smile::from(m));
        assert!(rendered.contains("\"xs\": [1, 2]"));
    }
}
