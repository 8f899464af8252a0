pub use crate::{
    encoding::{
        decode, decode_config, decode_full, encode, encode_config, encode_full, DecodeConfig,
        Decoder, EncodeConfig, Encoder, Header, SharedStringTable, SmileBytes, StringTable,
    },
    errors::DecodeError,
    fieldmap::FieldMap,
    float::Float,
    rep::*,
    Smile,
};
pub use bytes::Bytes;
pub use failure::{bail, Error};
pub use std::convert::TryFrom;
