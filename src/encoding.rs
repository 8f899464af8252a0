//! # Binary encoder and decoder
//!
//! Encode and decode functions for the compact binary interchange format.
//!
//! # Example
//!
//! ```
//! use smile::prelude::*;
//!
//! // a value worth keeping
//! let breakfast = Smile::from(vec![
//!     Smile::from("spam"),
//!     Smile::from("eggs"),
//!     Smile::from(2),
//! ]);
//!
//! // encoded with the 4-byte header
//! let enc_full = encode_full(&breakfast);
//!
//! // decoding returns a `Result`
//! let dec: Smile = decode_full(&enc_full).unwrap();
//!
//! // round-trips exactly
//! assert_eq!(dec, breakfast);
//! ```

use crate::{errors::DecodeError, Smile};

pub mod constants;
pub mod de;
pub use de::*;
pub mod ser;
pub use ser::*;
pub mod shared;
pub use shared::{SharedStringTable, StringTable};

/// Encodes a [`Smile`] value as a bare token stream, appending to `out`.
///
/// No header is written and no back-references are used; this is the plain
/// body encoding, symmetric with [`decode`].
///
/// # Arguments
///
/// * `v: &Smile` - A reference to the value to be encoded.
/// * `out: &mut Vec<u8>` - The buffer the encoder output is appended to.
///
/// # Example
///
/// ```
/// use smile::prelude::*;
///
/// let out = &mut Vec::new();
///
/// encode(&Smile::from(3), out);
///
/// assert_eq!(*out, vec![0xC6]);
/// ```
pub fn encode(v: &Smile, out: &mut Vec<u8>) {
    let mut enc = Encoder::new(EncodeConfig::bare());
    enc.encode_into(v, out);
}

/// Encodes a [`Smile`] value with the default options: header included,
/// shared field names enabled.
///
/// # Arguments
///
/// * `v: &Smile` - A reference to the value to be encoded.
///
/// # Example
///
/// ```
/// use smile::prelude::*;
///
/// let enc: Vec<u8> = encode_full(&Smile::Null);
///
/// // magic, options byte, null token
/// assert_eq!(enc, vec![0x3A, 0x29, 0x0A, 0x01, 0x21]);
/// ```
pub fn encode_full(v: &Smile) -> Vec<u8> { encode_config(v, EncodeConfig::default()) }

/// Encodes a [`Smile`] value with explicit options.
///
/// # Example
///
/// ```
/// use smile::prelude::*;
///
/// let conf = EncodeConfig {
///     version: 3,
///     ..EncodeConfig::default()
/// };
///
/// let enc = encode_config(&Smile::Null, conf);
///
/// assert_eq!(enc[3] >> 4, 3);
/// ```
pub fn encode_config(v: &Smile, conf: EncodeConfig) -> Vec<u8> { Encoder::new(conf).encode(v) }

/// Decodes one bare token stream from a cursor, leaving the cursor just past
/// the value's last token.
///
/// No header is expected and back-references are rejected; symmetric with
/// [`encode`]. Trailing input is left for the caller, which allows strictly
/// sequential reading of concatenated documents.
///
/// # Example
///
/// ```
/// use smile::prelude::*;
///
/// let out = &mut Vec::new();
/// encode(&Smile::from(3), out);
/// encode(&Smile::Null, out);
///
/// let dat = &mut SmileBytes::from(out.clone());
///
/// assert_eq!(decode(dat).unwrap(), Smile::from(3));
/// assert_eq!(decode(dat).unwrap(), Smile::Null);
/// ```
pub fn decode(dat: &mut SmileBytes) -> Result<Smile, DecodeError> {
    Decoder::new(DecodeConfig::bare()).decode(dat)
}

/// Decodes a whole buffer with the default options: header expected, its
/// flag bits governing back-references.
///
/// Fails unless the buffer holds exactly one document.
///
/// # Example
///
/// ```
/// use smile::prelude::*;
///
/// let bs = encode_full(&Smile::Null);
///
/// let dec: Result<Smile, DecodeError> = decode_full(&bs);
///
/// assert_eq!(dec.unwrap(), Smile::Null);
/// ```
pub fn decode_full<B: Into<SmileBytes>>(bytes: B) -> Result<Smile, DecodeError> {
    decode_config(bytes, DecodeConfig::default())
}

/// Decodes a whole buffer with explicit options.
///
/// Fails unless the buffer holds exactly one document; the first trailing
/// byte, if any, is reported as a malformed token.
pub fn decode_config<B: Into<SmileBytes>>(
    bytes: B,
    conf: DecodeConfig,
) -> Result<Smile, DecodeError> {
    let dat = &mut bytes.into();
    let value = Decoder::new(conf).decode(dat)?;
    if !dat.is_empty() {
        return Err(DecodeError::MalformedToken {
            offset: dat.offset(),
            byte: dat.peek_byte()?,
        });
    }
    Ok(value)
}
