//! # Address Flows
//!
//! Addresses derived by the codec are the qualifiers of realtime channels
//! and the identity of announced transaction signers. These flows check
//! the codec output survives every crate boundary unchanged.

#[cfg(test)]
mod tests {
    use crate::support::fixtures::{ADDRESS, OTHER_ADDRESS, OTHER_PUBLIC_KEY, PUBLIC_KEY};
    use ll_01_address::{
        decode, encode, encode_bytes, normalize_public_key, Address, AddressCodec, AddressError,
        NetworkType, ADDRESS_ENCODED_SIZE,
    };
    use ll_02_realtime::{Channel, Topic};
    use proptest::prelude::*;
    use shared_types::PublicKey;

    // =============================================================================
    // CODEC → CHANNEL
    // =============================================================================

    #[test]
    fn test_encoded_address_qualifies_channel() {
        let address = encode(PUBLIC_KEY, NetworkType::MijinTest).unwrap();
        let channel = Channel::qualified(Topic::ConfirmedAdded, address).unwrap();

        assert_eq!(channel.to_string(), format!("confirmedAdded/{}", ADDRESS));

        let parsed: Channel = channel.to_string().parse().unwrap();
        assert_eq!(parsed, channel);
        assert_eq!(parsed.qualifier().map(Address::network), Some(NetworkType::MijinTest));
    }

    #[test]
    fn test_channel_accepts_pretty_and_lowercase_qualifiers() {
        let address = decode(ADDRESS).unwrap();
        let pretty = format!("status/{}", address.pretty());
        let lower = format!("status/{}", ADDRESS.to_lowercase());

        let expected = Channel::qualified(Topic::Status, address).unwrap();
        assert_eq!(pretty.parse::<Channel>().unwrap(), expected);
        assert_eq!(lower.parse::<Channel>().unwrap(), expected);
    }

    #[test]
    fn test_channel_rejects_corrupted_qualifier() {
        let mut corrupted = OTHER_ADDRESS.to_string();
        corrupted.replace_range(39.., "A");
        assert!(format!("unconfirmedAdded/{}", corrupted).parse::<Channel>().is_err());
    }

    // =============================================================================
    // KEY NORMALISATION
    // =============================================================================

    #[test]
    fn test_length_prefixed_key_yields_same_address() {
        let prefixed = format!("20{}", OTHER_PUBLIC_KEY);
        let key = normalize_public_key(&prefixed).unwrap();

        let codec = AddressCodec::new(NetworkType::MijinTest);
        assert_eq!(codec.encode_bytes(&key).to_string(), OTHER_ADDRESS);
        assert_eq!(codec.encode(OTHER_PUBLIC_KEY).unwrap().to_string(), OTHER_ADDRESS);
    }

    #[test]
    fn test_wrong_network_address_is_still_valid_but_distinct() {
        let main = encode(PUBLIC_KEY, NetworkType::MainNet).unwrap();
        let test = encode(PUBLIC_KEY, NetworkType::MijinTest).unwrap();

        assert_ne!(main, test);
        assert_eq!(main.digest(), test.digest());
        assert_eq!(decode(&main.to_string()).unwrap().network(), NetworkType::MainNet);
    }

    #[test]
    fn test_truncated_address_rejected() {
        let err = decode(&ADDRESS[..39]).unwrap_err();
        assert!(err.is_invalid_address());
        assert!(matches!(err, AddressError::InvalidAddress(_)));
    }

    // =============================================================================
    // PROPERTIES
    // =============================================================================

    proptest! {
        #[test]
        fn prop_any_key_round_trips(key in any::<[u8; 32]>(), index in 0usize..4) {
            let network = NetworkType::ALL[index];
            let address = encode_bytes(&PublicKey(key), network);
            let text = address.to_string();

            prop_assert_eq!(text.len(), ADDRESS_ENCODED_SIZE);
            let decoded = decode(&text).unwrap();
            prop_assert_eq!(decoded, address);
            prop_assert_eq!(decoded.network(), network);
        }
    }
}
