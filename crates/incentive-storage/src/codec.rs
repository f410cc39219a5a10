//! bincode encoding of stored values

use incentive_core::{IncentiveError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a value for storage
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| IncentiveError::SerializationError(e.to_string()))
}

/// Decode a stored value
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| IncentiveError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use incentive_core::{Claim, ClaimType, Coin, Coins, Dec, MultiRewardIndexes, RewardIndexes};
    use incentive_core::Address;

    #[test]
    fn test_claim_survives_storage() {
        let reward = Coins::from_coins(vec![Coin::new("jinx", 12_235_400)]).expect("coins");
        let indexes = MultiRewardIndexes::new().with(
            "bnb",
            RewardIndexes::new().with("jinx", "0.0105713856".parse::<Dec>().expect("dec")),
        );
        let claim = Claim::new(ClaimType::Borrow, Address::new([7; 20]), reward, indexes);

        let bytes = encode(&claim).expect("encode");
        let decoded: Claim = decode(&bytes).expect("decode");
        assert_eq!(decoded, claim);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result: Result<Claim> = decode(&[0xff, 0x00]);
        assert!(matches!(result, Err(IncentiveError::SerializationError(_))));
    }
}
