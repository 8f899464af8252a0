use proptest::prelude::*;
use smile::prelude::*;
use smile_strategy::*;

proptest! {
    #![proptest_config(ProptestConfig { cases: 1_000, ..ProptestConfig::default() })]

    #[test]
    fn encode_decode(k in arb_smile()) {
        let enc = encode_full(&k);

        let dec = decode_full(&enc).ok();

        if dec != Some(k.clone()) {
            panic!("Tried encoding\n {:?}\n as \n{:x?}\n got \n{:?}\n", k, enc, dec)
        }
    }

    #[test]
    fn encode_decode_bare(k in arb_smile()) {
        let mut enc = Vec::new();
        encode(&k, &mut enc);

        let dec = decode_config(&enc, DecodeConfig::bare()).ok();

        if dec != Some(k.clone()) {
            panic!("Tried encoding\n {:?}\n as \n{:x?}\n got \n{:?}\n", k, enc, dec)
        }
    }

    #[test]
    fn encode_decode_all_sharing(k in arb_smile()) {
        let conf = EncodeConfig {
            shared_strings: true,
            shared_names: true,
            ..EncodeConfig::default()
        };
        let enc = encode_config(&k, conf);

        let dec = decode_full(&enc).ok();

        if dec != Some(k.clone()) {
            panic!("Tried encoding\n {:?}\n as \n{:x?}\n got \n{:?}\n", k, enc, dec)
        }
    }

    #[test]
    fn encode_decode_headerless_sharing(k in arb_smile()) {
        let econf = EncodeConfig {
            include_header: false,
            shared_strings: true,
            shared_names: true,
            ..EncodeConfig::default()
        };
        let dconf = DecodeConfig {
            include_header: false,
            shared_strings: true,
            shared_names: true,
        };
        let enc = encode_config(&k, econf);

        let dec = decode_config(&enc, dconf).ok();

        if dec != Some(k.clone()) {
            panic!("Tried encoding\n {:?}\n as \n{:x?}\n got \n{:?}\n", k, enc, dec)
        }
    }
}
