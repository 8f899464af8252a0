use std::convert::TryFrom;

/// A floating-point value stored as its raw IEEE754 bit pattern.
///
/// Keeping the bits rather than the host float means values pass through the
/// codec literally: NaN payloads and signed zeros survive a round-trip, and
/// equality is bitwise.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub enum Float {
    Single(u32),
    Double(u64),
}

use Float::*;

impl From<f32> for Float {
    fn from(f: f32) -> Float { Single(f.to_bits()) }
}

impl From<f64> for Float {
    fn from(f: f64) -> Float { Double(f.to_bits()) }
}

impl TryFrom<Float> for f32 {
    type Error = Float;

    fn try_from(f: Float) -> Result<Self, Float> {
        match f {
            Single(n) => Ok(f32::from_bits(n)),
            _ => Err(f),
        }
    }
}

impl TryFrom<Float> for f64 {
    type Error = Float;

    fn try_from(f: Float) -> Result<Self, Float> {
        match f {
            Double(n) => Ok(f64::from_bits(n)),
            _ => Err(f),
        }
    }
}

impl std::fmt::Display for Float {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Single(n) => write!(f, "{}", f32::from_bits(*n)),
            Double(n) => write!(f, "{}", f64::from_bits(*n)),
        }
    }
}
