//! Mapping between host types and [`Smile`] values.
//!
//! [`SmileRep`] is the seam between the codec and a program's own structs:
//! the codec itself only ever sees [`Smile`] trees. Implementations are
//! written by hand as static, explicit descriptors; a struct lists its
//! fields once, in declaration order, and that order is what appears on the
//! wire. No reflection, no iteration-order surprises.
//!
//! # Example
//!
//! ```
//! use smile::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! impl SmileRep for Point {
//!     fn into_smile(self) -> Smile {
//!         Smile::Map(FieldMap::from_entries(vec![
//!             (Bytes::from("x"), self.x.into_smile()),
//!             (Bytes::from("y"), self.y.into_smile()),
//!         ]))
//!     }
//!
//!     fn from_smile(sm: Smile) -> Result<Point, Error> {
//!         let fields = sm.into_fieldmap()?;
//!         let x = match fields.get(&Bytes::from("x")) {
//!             Some(v) => i64::from_smile(v.clone())?,
//!             None => bail!("missing field `x`"),
//!         };
//!         let y = match fields.get(&Bytes::from("y")) {
//!             Some(v) => i64::from_smile(v.clone())?,
//!             None => bail!("missing field `y`"),
//!         };
//!         Ok(Point { x, y })
//!     }
//! }
//!
//! let p = Point { x: 1, y: -2 };
//!
//! let enc = encode_full(&p.to_smile());
//! let dec = Point::from_smile(decode_full(&enc).unwrap()).unwrap();
//!
//! assert_eq!(p, dec);
//! ```

use crate::{
    fieldmap::FieldMap,
    float::Float,
    Smile::{self, *},
};
use bytes::Bytes;
use failure::*;
use std::{
    collections::{BTreeMap, HashMap},
    convert::TryFrom,
};

/// A value representable as [`Smile`].
///
/// At least one of [`to_smile`](SmileRep::to_smile) and
/// [`into_smile`](SmileRep::into_smile) must be overridden; their default
/// implementations are defined in terms of each other.
pub trait SmileRep: Clone + Sized {
    /// Converts value into [`Smile`].
    ///
    /// # Example
    ///
    /// ```
    /// use smile::rep::*;
    ///
    /// let k_num = 1.to_smile();
    /// ```
    fn to_smile(&self) -> Smile { self.clone().into_smile() }

    /// Consumes value, converting it into [`Smile`].
    ///
    /// # Example
    ///
    /// ```
    /// use smile::rep::*;
    ///
    /// let k_num = 1.into_smile();
    /// ```
    fn into_smile(self) -> Smile { self.to_smile() }

    /// Converts value from [`Smile`].
    ///
    /// # Example
    ///
    /// ```
    /// use smile::rep::*;
    ///
    /// let k_str = "foo".to_string().into_smile();
    ///
    /// assert_eq!(String::from_smile(k_str).unwrap(), "foo");
    /// ```
    fn from_smile(sm: Smile) -> Result<Self, Error>;
}

/// Pops the next element from an array iterator and converts it.
///
/// A convenience for hand-written tuple-struct and enum representations that
/// read their fields in sequence.
pub fn pop_rep<T: SmileRep>(iter: &mut std::vec::IntoIter<Smile>) -> Result<T, Error> {
    match iter.next() {
        Some(sm) => T::from_smile(sm),
        None => bail!("expected another array element"),
    }
}

impl SmileRep for Smile {
    fn to_smile(&self) -> Smile { self.clone() }

    fn into_smile(self) -> Smile { self }

    fn from_smile(sm: Smile) -> Result<Smile, Error> { Ok(sm) }
}

impl SmileRep for bool {
    fn into_smile(self) -> Smile { Bool(self) }

    fn from_smile(sm: Smile) -> Result<bool, Error> {
        match sm {
            Bool(b) => Ok(b),
            sm => bail!("expected `Bool`, found {:?}", sm),
        }
    }
}

impl SmileRep for i64 {
    fn into_smile(self) -> Smile { Int(self) }

    fn from_smile(sm: Smile) -> Result<i64, Error> {
        match sm {
            Int(i) => Ok(i),
            sm => bail!("expected `Int`, found {:?}", sm),
        }
    }
}

macro_rules! int_rep {
    ($typ:tt) => {
        impl SmileRep for $typ {
            fn into_smile(self) -> Smile { Int(i64::from(self)) }

            fn from_smile(sm: Smile) -> Result<$typ, Error> {
                match sm {
                    Int(i) => match $typ::try_from(i) {
                        Ok(v) => Ok(v),
                        Err(_) => bail!("integer {} does not fit `{}`", i, stringify!($typ)),
                    },
                    sm => bail!("expected `Int`, found {:?}", sm),
                }
            }
        }
    };
}

int_rep!(i8);
int_rep!(i16);
int_rep!(i32);
int_rep!(u8);
int_rep!(u16);
int_rep!(u32);

impl SmileRep for Float {
    fn into_smile(self) -> Smile { Sfloat(self) }

    fn from_smile(sm: Smile) -> Result<Float, Error> {
        match sm {
            Sfloat(f) => Ok(f),
            sm => bail!("expected `Sfloat`, found {:?}", sm),
        }
    }
}

impl SmileRep for f32 {
    fn into_smile(self) -> Smile { Sfloat(Float::from(self)) }

    fn from_smile(sm: Smile) -> Result<f32, Error> {
        match sm {
            Sfloat(Float::Single(bits)) => Ok(f32::from_bits(bits)),
            sm => bail!("expected a single-precision float, found {:?}", sm),
        }
    }
}

impl SmileRep for f64 {
    fn into_smile(self) -> Smile { Sfloat(Float::from(self)) }

    fn from_smile(sm: Smile) -> Result<f64, Error> {
        match sm {
            Sfloat(Float::Double(bits)) => Ok(f64::from_bits(bits)),
            sm => bail!("expected a double-precision float, found {:?}", sm),
        }
    }
}

impl SmileRep for Bytes {
    fn into_smile(self) -> Smile { Str(self) }

    fn from_smile(sm: Smile) -> Result<Bytes, Error> {
        match sm {
            Str(bs) => Ok(bs),
            sm => bail!("expected `Str`, found {:?}", sm),
        }
    }
}

impl SmileRep for String {
    fn into_smile(self) -> Smile { Str(Bytes::from(self)) }

    fn from_smile(sm: Smile) -> Result<String, Error> {
        match sm {
            Str(bs) => match String::from_utf8(bs.to_vec()) {
                Ok(s) => Ok(s),
                Err(_) => bail!("string is not valid UTF-8"),
            },
            sm => bail!("expected `Str`, found {:?}", sm),
        }
    }
}

impl SmileRep for () {
    fn into_smile(self) -> Smile { Null }

    fn from_smile(sm: Smile) -> Result<(), Error> {
        match sm {
            Null => Ok(()),
            sm => bail!("expected `Null`, found {:?}", sm),
        }
    }
}

// `None` is `Null`; `Some(v)` wraps `v` in a one-element array so that
// `Some(None)` stays distinguishable from `None`.
impl<T: SmileRep> SmileRep for Option<T> {
    fn into_smile(self) -> Smile {
        match self {
            None => Null,
            Some(t) => Array(vec![t.into_smile()]),
        }
    }

    fn from_smile(sm: Smile) -> Result<Option<T>, Error> {
        match sm {
            Null => Ok(None),
            Array(v) => {
                let mut iter = v.into_iter();
                match (iter.next(), iter.next()) {
                    (Some(inner), None) => Ok(Some(T::from_smile(inner)?)),
                    _ => bail!("expected a one-element array for `Option`"),
                }
            }
            sm => bail!("expected `Null` or a one-element array, found {:?}", sm),
        }
    }
}

impl<T: SmileRep> SmileRep for Vec<T> {
    fn to_smile(&self) -> Smile { Array(self.iter().map(T::to_smile).collect()) }

    fn into_smile(self) -> Smile { Array(self.into_iter().map(T::into_smile).collect()) }

    fn from_smile(sm: Smile) -> Result<Vec<T>, Error> {
        match sm {
            Array(v) => v.into_iter().map(T::from_smile).collect(),
            sm => bail!("expected `Array`, found {:?}", sm),
        }
    }
}

impl<T: SmileRep> SmileRep for BTreeMap<Bytes, T> {
    fn into_smile(self) -> Smile {
        Map(FieldMap::from(
            self.into_iter()
                .map(|(k, v)| (k, v.into_smile()))
                .collect::<BTreeMap<Bytes, Smile>>(),
        ))
    }

    fn from_smile(sm: Smile) -> Result<BTreeMap<Bytes, T>, Error> {
        match sm {
            Map(fm) => {
                fm.into_iter()
                    .map(|(k, v)| Ok((k, T::from_smile(v)?)))
                    .collect()
            }
            sm => bail!("expected `Map`, found {:?}", sm),
        }
    }
}

impl<T: SmileRep> SmileRep for HashMap<Bytes, T> {
    fn into_smile(self) -> Smile {
        Map(FieldMap::from(
            self.into_iter()
                .map(|(k, v)| (k, v.into_smile()))
                .collect::<HashMap<Bytes, Smile>>(),
        ))
    }

    fn from_smile(sm: Smile) -> Result<HashMap<Bytes, T>, Error> {
        match sm {
            Map(fm) => {
                fm.into_iter()
                    .map(|(k, v)| Ok((k, T::from_smile(v)?)))
                    .collect()
            }
            sm => bail!("expected `Map`, found {:?}", sm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: SmileRep + PartialEq + std::fmt::Debug>(v: T) {
        assert_eq!(T::from_smile(v.clone().into_smile()).unwrap(), v);
    }

    #[test]
    fn primitives() {
        roundtrip(true);
        roundtrip(0i64);
        roundtrip(-1i64);
        roundtrip(255u8);
        roundtrip(-32768i16);
        roundtrip(1.5f32);
        roundtrip(2.5f64);
        roundtrip("hello".to_string());
        roundtrip(Bytes::from("raw"));
        roundtrip(());
    }

    #[test]
    fn narrowing_is_checked() {
        assert!(u8::from_smile(Int(256)).is_err());
        assert!(u8::from_smile(Int(-1)).is_err());
        assert!(i8::from_smile(Int(128)).is_err());
        assert!(u8::from_smile(Bool(true)).is_err());
    }

    #[test]
    fn float_widths_do_not_cross() {
        assert!(f32::from_smile(2.5f64.into_smile()).is_err());
        assert!(f64::from_smile(1.5f32.into_smile()).is_err());
    }

    #[test]
    fn options() {
        roundtrip(None::<u8>);
        roundtrip(Some(3u8));
        roundtrip(Some(None::<u8>));
        roundtrip(Some(Some(3u8)));

        assert!(Option::<u8>::from_smile(Array(vec![Int(1), Int(2)])).is_err());
    }

    #[test]
    fn collections() {
        roundtrip(vec![1i64, 2, 3]);

        let mut hm = HashMap::new();
        hm.insert(Bytes::from("a"), 1i64);
        hm.insert(Bytes::from("b"), 2);
        roundtrip(hm);

        let mut bt = BTreeMap::new();
        bt.insert(Bytes::from("x"), "y".to_string());
        roundtrip(bt);
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let sm = Str(Bytes::from(vec![0xFF, 0xFE]));
        assert!(String::from_smile(sm).is_err());
    }

    #[test]
    fn pop_rep_reads_in_sequence() {
        let v = Array(vec![Int(1), Bool(true)]);
        let iter = &mut v.into_vec().unwrap().into_iter();

        let n: i64 = pop_rep(iter).unwrap();
        let b: bool = pop_rep(iter).unwrap();
        assert_eq!((n, b), (1, true));

        assert!(pop_rep::<i64>(iter).is_err());
    }
}
