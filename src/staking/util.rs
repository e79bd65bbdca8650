use super::error::StakingError;
use alloy_primitives::{keccak256, Address, B256};
use alloy_rlp::Encodable;

/// Length of an uncompressed secp256k1 public key.
pub const UNCOMPRESSED_PK_LEN: usize = 65;

/// Keccak-256 of the RLP encoding of `x`.
pub fn rlp_hash<T: Encodable + ?Sized>(x: &T) -> B256 {
    keccak256(alloy_rlp::encode(x))
}

/// Rejects the reserved relayer system address.
pub fn forbid_address(addr: Address, reserved: Address) -> Result<(), StakingError> {
    if addr == reserved {
        return Err(StakingError::ForbiddenAddress(addr));
    }
    Ok(())
}

/// Checks that `pk` is an uncompressed secp256k1 public key.
pub fn valid_pk(pk: &[u8]) -> Result<(), StakingError> {
    if pk.len() != UNCOMPRESSED_PK_LEN || pk[0] != 0x04 {
        return Err(StakingError::InvalidPublicKeyLength(pk.len()));
    }
    secp256k1::PublicKey::from_slice(pk)?;
    Ok(())
}

/// Owned copy of a vote key.
pub fn copy_vote_pk(pk: &[u8]) -> Vec<u8> {
    pk.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chainspec::relayer_system_address;
    use secp256k1::{PublicKey, Secp256k1, SecretKey};

    fn uncompressed_key() -> [u8; 65] {
        let secp = Secp256k1::new();
        let sk = SecretKey::from_slice(&[0x42; 32]).unwrap();
        PublicKey::from_secret_key(&secp, &sk).serialize_uncompressed()
    }

    #[test]
    fn test_forbid_address() {
        let reserved = relayer_system_address();
        assert_eq!(forbid_address(reserved, reserved), Err(StakingError::ForbiddenAddress(reserved)));
        assert!(forbid_address(Address::repeat_byte(1), reserved).is_ok());
    }

    #[test]
    fn test_valid_pk() {
        let pk = uncompressed_key();
        assert!(valid_pk(&pk).is_ok());

        let secp = Secp256k1::new();
        let sk = SecretKey::from_slice(&[0x42; 32]).unwrap();
        let compressed = PublicKey::from_secret_key(&secp, &sk).serialize();
        assert_eq!(valid_pk(&compressed), Err(StakingError::InvalidPublicKeyLength(33)));

        let mut off_curve = pk;
        off_curve[64] ^= 0x01;
        assert!(matches!(valid_pk(&off_curve), Err(StakingError::InvalidPublicKey(_))));
        assert!(valid_pk(&[]).is_err());
    }

    #[test]
    fn test_copy_vote_pk_is_detached() {
        let pk = uncompressed_key();
        let mut copy = copy_vote_pk(&pk);
        copy[1] ^= 0xff;
        assert_ne!(copy[1], pk[1]);
        assert_eq!(copy.len(), pk.len());
    }

    #[test]
    fn test_rlp_hash_matches_manual_encoding() {
        let value = 1234u64;
        let mut out = Vec::new();
        value.encode(&mut out);
        assert_eq!(rlp_hash(&value), keccak256(&out));
    }
}
