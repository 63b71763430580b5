//! # Core Domain Entities
//!
//! Identities, commitments and amounts used across the subsystems.
//!
//! All byte layouts follow the EVM conventions the off-chain signers use:
//! addresses are 20 bytes, commitments are 32 bytes and amounts are 256-bit
//! unsigned integers encoded big-endian when hashed.

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 32-byte hash (keccak256 digests, proof commitments, request ids).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Token amount. Balances never go negative, so an unsigned type is enough.
pub type Amount = U256;

/// The null identity. Never a valid signer, actor, recipient or owner.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// The zero commitment. Never a valid proof key.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Returns true for the null identity.
pub fn is_zero_address(address: &Address) -> bool {
    *address == ZERO_ADDRESS
}

/// Returns true for the zero commitment.
pub fn is_zero_hash(hash: &Hash) -> bool {
    *hash == ZERO_HASH
}

/// Encode an amount as 32 big-endian bytes (`abi.encodePacked(uint256)`).
pub fn amount_to_be_bytes(amount: &Amount) -> [u8; 32] {
    let mut out = [0u8; 32];
    amount.to_big_endian(&mut out);
    out
}

/// Decode an amount from big-endian bytes.
pub fn amount_from_be_bytes(bytes: &[u8]) -> Amount {
    U256::from_big_endian(bytes)
}

/// Render an address as `0x`-prefixed lowercase hex.
pub fn address_to_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Render a hash as `0x`-prefixed lowercase hex.
pub fn hash_to_hex(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Parse a 20-byte address from hex, with or without the `0x` prefix.
pub fn parse_address(input: &str) -> Option<Address> {
    let bytes = hex::decode(input.trim_start_matches("0x")).ok()?;
    bytes.try_into().ok()
}

/// Parse a 32-byte hash from hex, with or without the `0x` prefix.
pub fn parse_hash(input: &str) -> Option<Hash> {
    let bytes = hex::decode(input.trim_start_matches("0x")).ok()?;
    bytes.try_into().ok()
}
