//! Store key layout
//!
//! | Prefix        | Record               | Key suffix        |
//! |---------------|----------------------|-------------------|
//! | `0x01..=0x07` | Claim                | owner bytes       |
//! | `0x11..=0x17` | Global reward index  | source key (UTF-8)|
//! | `0x21..=0x27` | Previous accrual time| source key (UTF-8)|
//! | `params`      | Parameters           | -                 |
//!
//! The low nibble of each prefix is the category.

use incentive_core::ClaimType;

/// Key holding the parameter set
pub const PARAMS_KEY: &[u8] = b"params";

const CLAIM_BASE: u8 = 0x00;
const REWARD_INDEX_BASE: u8 = 0x10;
const ACCRUAL_TIME_BASE: u8 = 0x20;

fn category_byte(claim_type: ClaimType) -> u8 {
    match claim_type {
        ClaimType::Minting => 0x01,
        ClaimType::Supply => 0x02,
        ClaimType::Borrow => 0x03,
        ClaimType::Delegator => 0x04,
        ClaimType::Swap => 0x05,
        ClaimType::Savings => 0x06,
        ClaimType::Earn => 0x07,
    }
}

/// Prefix of the claims of a category
pub fn claim_prefix(claim_type: ClaimType) -> Vec<u8> {
    vec![CLAIM_BASE | category_byte(claim_type)]
}

/// Prefix of the global reward indexes of a category
pub fn reward_index_prefix(claim_type: ClaimType) -> Vec<u8> {
    vec![REWARD_INDEX_BASE | category_byte(claim_type)]
}

/// Prefix of the previous accrual times of a category
pub fn accrual_time_prefix(claim_type: ClaimType) -> Vec<u8> {
    vec![ACCRUAL_TIME_BASE | category_byte(claim_type)]
}
