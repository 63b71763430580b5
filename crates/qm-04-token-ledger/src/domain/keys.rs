//! Key layout inside the token store.
//!
//! Amounts are stored as 32 big-endian bytes.

use shared_types::{Address, Hash};

/// `bal:{account}`
pub const BALANCE_PREFIX: &[u8] = b"bal:";

/// `alw:{owner}{spender}`
pub const ALLOWANCE_PREFIX: &[u8] = b"alw:";

/// `used:{commitment}`
pub const USED_PROOF_PREFIX: &[u8] = b"used:";

pub const TOTAL_SUPPLY_KEY: &[u8] = b"meta:total_supply";

/// Marker value stored under a used commitment.
pub const USED_MARKER: &[u8] = &[1];

fn prefixed(prefix: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let len = prefix.len() + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.extend_from_slice(prefix);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

pub fn balance_key(account: &Address) -> Vec<u8> {
    prefixed(BALANCE_PREFIX, &[account])
}

pub fn allowance_key(owner: &Address, spender: &Address) -> Vec<u8> {
    prefixed(ALLOWANCE_PREFIX, &[owner, spender])
}

pub fn used_proof_key(commitment: &Hash) -> Vec<u8> {
    prefixed(USED_PROOF_PREFIX, &[commitment])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_do_not_collide() {
        let a = [0xAA; 20];
        let b = [0xBB; 20];
        assert_ne!(allowance_key(&a, &b), allowance_key(&b, &a));
        assert_eq!(balance_key(&a).len(), 24);
        assert_eq!(used_proof_key(&[0x11; 32]).len(), 37);
    }
}
