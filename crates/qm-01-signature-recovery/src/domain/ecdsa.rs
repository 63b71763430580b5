//! # ECDSA Recovery (secp256k1)
//!
//! Pure domain logic for recovering verifier identities.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: S must be STRICTLY LESS THAN SECP256K1_HALF_ORDER
//! - **Scalar Range Validation**: R and S must be in [1, n-1]
//! - **Constant-Time Operations**: Uses `subtle` crate for side-channel resistance
//! - Uses k256 crate for cryptographic operations

use super::entities::EcdsaSignature;
use super::errors::SignatureError;
use crate::ports::inbound::SignatureRecoveryApi;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use shared_types::{Address, Hash};
use subtle::{Choice, ConstantTimeEq};

/// secp256k1 curve order n
/// n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Half of the secp256k1 curve order (for malleability check).
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Prefix of the signed-message envelope for a 32-byte payload.
const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

// =============================================================================
// ECDSA RECOVERER
// =============================================================================

/// Default `SignatureRecoveryApi` implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaRecoverer;

impl EcdsaRecoverer {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureRecoveryApi for EcdsaRecoverer {
    fn decode(&self, bytes: &[u8]) -> Result<EcdsaSignature, SignatureError> {
        let signature = EcdsaSignature::from_bytes(bytes)?;
        validate_signature(&signature)?;
        Ok(signature)
    }

    fn recover_signer(
        &self,
        digest: &Hash,
        signature: &EcdsaSignature,
    ) -> Result<Address, SignatureError> {
        recover_address(&to_eth_signed_message_hash(digest), signature)
    }
}

// =============================================================================
// CORE FUNCTIONS
// =============================================================================

/// Range and malleability checks performed before any curve arithmetic.
///
/// 1. R is in valid range [1, n-1] per SEC1 standard
/// 2. S is in valid range [1, n-1] per SEC1 standard
/// 3. S is in lower half per EIP-2 malleability protection
/// 4. Recovery ID (v) is valid (0, 1, 27, or 28)
pub fn validate_signature(signature: &EcdsaSignature) -> Result<(), SignatureError> {
    if !is_valid_scalar(&signature.r) || !is_valid_scalar(&signature.s) {
        return Err(SignatureError::InvalidFormat);
    }
    if !is_low_s(&signature.s) {
        return Err(SignatureError::MalleableSignature);
    }
    parse_recovery_id(signature.v)?;
    Ok(())
}

/// Recover the signer's address from a signature over `prehash`.
///
/// `prehash` is used as-is; callers that follow the signed-message
/// convention pass the output of `to_eth_signed_message_hash`.
pub fn recover_address(
    prehash: &Hash,
    signature: &EcdsaSignature,
) -> Result<Address, SignatureError> {
    use zeroize::Zeroize;

    validate_signature(signature)?;
    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);

    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let sig = parsed.map_err(|_| SignatureError::InvalidFormat)?;

    let recovered_key = VerifyingKey::recover_from_prehash(prehash, &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered_key))
}

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Wrap a 32-byte digest in the signed-message envelope.
pub fn to_eth_signed_message_hash(digest: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(SIGNED_MESSAGE_PREFIX);
    hasher.update(digest);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Derive Ethereum address from public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let pubkey_bytes = public_key.to_encoded_point(false);
    let pubkey_slice = pubkey_bytes.as_bytes();

    // Keccak256 hash of public key (without 0x04 prefix)
    let hash = keccak256(&pubkey_slice[1..]);

    // Take last 20 bytes as address
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Sign `digest` the way a verifier does off-chain.
///
/// The digest is wrapped in the signed-message envelope, S is normalized to
/// the lower half and `v` is returned in the 27/28 convention.
pub fn sign_prehash(digest: &Hash, key: &SigningKey) -> Result<EcdsaSignature, SignatureError> {
    let prehash = to_eth_signed_message_hash(digest);
    let (sig, recid) = key
        .sign_prehash_recoverable(&prehash)
        .map_err(|_| SignatureError::InvalidFormat)?;

    let sig_bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig_bytes[..32]);
    s.copy_from_slice(&sig_bytes[32..]);

    if is_low_s(&s) {
        return Ok(EcdsaSignature {
            r,
            s,
            v: recid.to_byte() + 27,
        });
    }

    // S was inverted, flip recovery id
    let v = if recid.to_byte() == 0 { 28 } else { 27 };
    Ok(EcdsaSignature {
        r,
        s: invert_s(&s),
        v,
    })
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Check if S value is in lower half of curve order (EIP-2 malleability protection).
///
/// Per EIP-2: S must be STRICTLY LESS THAN half_order (not equal).
/// Runs in fixed time regardless of input values.
fn is_low_s(s: &[u8; 32]) -> bool {
    less_than(s, &SECP256K1_HALF_ORDER).into()
}

/// Check if a scalar value is in valid range [1, n-1] for ECDSA.
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for &byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }
    (!is_zero & less_than(scalar, &SECP256K1_ORDER)).into()
}

/// Constant-time big-endian `a < b`.
fn less_than(a: &[u8; 32], b: &[u8; 32]) -> Choice {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        // Only update if we haven't already determined the result
        let not_decided = !(less | greater);
        let byte_less = Choice::from((a[i] < b[i]) as u8);
        let byte_greater = Choice::from((a[i] > b[i]) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    less
}

/// Parse recovery ID from v value.
///
/// Valid v values: 0, 1, 27, 28
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| SignatureError::InvalidRecoveryId(v))
}

/// s' = n - s
fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;

    for i in (0..32).rev() {
        let diff = (SECP256K1_ORDER[i] as i32) - (s[i] as i32) - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_keypair() -> (SigningKey, Address) {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let address = address_from_pubkey(signing_key.verifying_key());
        (signing_key, address)
    }

    #[test]
    fn test_recover_signed_digest() {
        let (key, address) = generate_keypair();
        let digest = keccak256(b"action output");
        let signature = sign_prehash(&digest, &key).unwrap();

        let recovered = EcdsaRecoverer::new()
            .recover_signer(&digest, &signature)
            .unwrap();
        assert_eq!(recovered, address);
    }

    #[test]
    fn test_recovery_is_deterministic() {
        let (key, address) = generate_keypair();
        let digest = keccak256(b"determinism");
        let signature = sign_prehash(&digest, &key).unwrap();

        for _ in 0..10 {
            let prehash = to_eth_signed_message_hash(&digest);
            assert_eq!(recover_address(&prehash, &signature).unwrap(), address);
        }
    }

    #[test]
    fn test_wrong_digest_recovers_different_address() {
        let (key, address) = generate_keypair();
        let signature = sign_prehash(&keccak256(b"message 1"), &key).unwrap();

        // The signature is valid for SOME public key, just not the signer's
        let recovered = EcdsaRecoverer::new()
            .recover_signer(&keccak256(b"message 2"), &signature)
            .unwrap();
        assert_ne!(recovered, address);
    }

    #[test]
    fn test_envelope_changes_digest() {
        let digest = keccak256(b"payload");
        assert_ne!(to_eth_signed_message_hash(&digest), digest);

        // Unwrapped recovery yields a different identity than the signer
        let (key, address) = generate_keypair();
        let signature = sign_prehash(&digest, &key).unwrap();
        let raw = recover_address(&digest, &signature);
        assert_ne!(raw.ok(), Some(address));
    }

    #[test]
    fn test_signature_malleability_rejected() {
        let (key, _) = generate_keypair();
        let digest = keccak256(b"test");
        let signature = sign_prehash(&digest, &key).unwrap();

        let malleable = EcdsaSignature {
            r: signature.r,
            s: invert_s(&signature.s),
            v: signature.v,
        };

        assert_eq!(
            validate_signature(&malleable),
            Err(SignatureError::MalleableSignature)
        );
        assert!(EcdsaRecoverer::new().decode(&malleable.to_bytes()).is_err());
    }

    #[test]
    fn test_decode_round_trip_of_valid_signature() {
        let (key, _) = generate_keypair();
        let signature = sign_prehash(&keccak256(b"decode"), &key).unwrap();
        let decoded = EcdsaRecoverer::new().decode(&signature.to_bytes()).unwrap();
        assert_eq!(decoded, signature);
    }

    #[test]
    fn test_is_low_s_boundary() {
        // Exactly half order should be INVALID (strict inequality per EIP-2)
        assert!(!is_low_s(&SECP256K1_HALF_ORDER));

        let mut low_s = SECP256K1_HALF_ORDER;
        low_s[31] = low_s[31].wrapping_sub(1);
        assert!(is_low_s(&low_s));

        let mut high_s = SECP256K1_HALF_ORDER;
        high_s[31] = high_s[31].wrapping_add(1);
        assert!(!is_low_s(&high_s));
    }

    #[test]
    fn test_zero_scalars_rejected() {
        let zero_s = EcdsaSignature {
            r: [0x01; 32],
            s: [0x00; 32],
            v: 27,
        };
        let zero_r = EcdsaSignature {
            r: [0x00; 32],
            s: [0x01; 32],
            v: 27,
        };
        assert_eq!(validate_signature(&zero_s), Err(SignatureError::InvalidFormat));
        assert_eq!(validate_signature(&zero_r), Err(SignatureError::InvalidFormat));
    }

    #[test]
    fn test_r_equal_to_order_rejected() {
        let sig = EcdsaSignature {
            r: SECP256K1_ORDER,
            s: [0x01; 32],
            v: 27,
        };
        assert_eq!(validate_signature(&sig), Err(SignatureError::InvalidFormat));
    }

    #[test]
    fn test_recovery_ids() {
        for v in [0u8, 1, 27, 28] {
            assert!(parse_recovery_id(v).is_ok(), "v={} should be valid", v);
        }
        for v in (2..27).chain(29..=255) {
            assert!(parse_recovery_id(v).is_err(), "v={} should be invalid", v);
        }
    }

    #[test]
    fn test_invert_s_is_involution() {
        let s = [0x01; 32];
        assert_eq!(invert_s(&invert_s(&s)), s);
    }
}
