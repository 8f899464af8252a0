use bytes::Bytes;
use proptest::prelude::*;
use smile::{fieldmap::FieldMap, float::Float, Smile};

/// arbitrary Bytes for use with proptest
pub fn arb_bs() -> impl Strategy<Value = Bytes> {
    ".*".prop_map(|s| -> Bytes { Bytes::from(s) })
}

/// arbitrary Float for use with proptest; drawn from raw bit patterns so
/// NaNs and signed zeros are exercised
pub fn arb_float() -> impl Strategy<Value = Float> {
    prop_oneof![
        any::<u32>().prop_map(Float::Single),
        any::<u64>().prop_map(Float::Double),
    ]
}

/// arbitrary Smile value for use with proptest
pub fn arb_smile() -> impl Strategy<Value = Smile> {
    let leaf = prop_oneof![
        Just(Smile::Null),
        // misc
        any::<bool>().prop_map(Smile::from),
        any::<()>().prop_map(|()| Smile::Null),
        // integers
        // 8-bit
        any::<u8>().prop_map(Smile::from),
        any::<i8>().prop_map(Smile::from),
        // 16-bit
        any::<u16>().prop_map(Smile::from),
        any::<i16>().prop_map(Smile::from),
        // 32-bit
        any::<u32>().prop_map(Smile::from),
        any::<i32>().prop_map(Smile::from),
        // 64-bit
        any::<i64>().prop_map(Smile::from),
        // floats
        any::<f32>().prop_map(Smile::from),
        any::<f64>().prop_map(Smile::from),
        arb_float().prop_map(Smile::from),
        // strings
        arb_bs().prop_map(Smile::from),
    ];
    leaf.prop_recursive(
        8,  // max depth
        64, // max nodes
        10, // max items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..10).prop_map(Smile::from),
                prop::collection::btree_map(arb_bs(), inner, 0..10)
                    .prop_map(|m| Smile::from(FieldMap::from(m)))
            ]
        },
    )
}
