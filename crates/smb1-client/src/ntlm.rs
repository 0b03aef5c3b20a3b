//! Default [`NtlmCore`] implementation: LM/NT hashes and the classic
//! DES-based 24-byte challenge response. NTLMv1 only, no NTLMv2.

use cipher::generic_array::GenericArray;
use cipher::{BlockEncrypt, KeyInit};
use des::Des;
use md4::{Digest, Md4};

use crate::traits::NtlmCore;

/// The fixed magic string DES-encrypted with each half of the LM hash key.
const LM_MAGIC: &[u8; 8] = b"KGS!@#$%";

/// Straightforward, unconfigurable NTLMv1 core built on `md4`/`des`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNtlm;

impl NtlmCore for DefaultNtlm {
    fn lm_hash(&self, password: &str) -> [u8; 16] {
        let mut padded = [0u8; 14];
        let upper = password.to_uppercase();
        let bytes = upper.as_bytes();
        let n = bytes.len().min(14);
        padded[..n].copy_from_slice(&bytes[..n]);

        let mut hash = [0u8; 16];
        hash[..8].copy_from_slice(&des_encrypt(&str_to_key(&padded[..7]), LM_MAGIC));
        hash[8..].copy_from_slice(&des_encrypt(&str_to_key(&padded[7..]), LM_MAGIC));
        hash
    }

    fn nt_hash(&self, password: &str) -> [u8; 16] {
        let utf16: Vec<u8> = password.encode_utf16().flat_map(u16::to_le_bytes).collect();
        let mut hasher = Md4::new();
        hasher.update(&utf16);
        let digest = hasher.finalize();
        let mut out = [0u8; 16];
        out.copy_from_slice(&digest);
        out
    }

    fn lm_response(&self, hash: &[u8; 16], challenge: &[u8; 8]) -> [u8; 24] {
        let mut keys = [0u8; 21];
        keys[..16].copy_from_slice(hash);

        let mut response = [0u8; 24];
        for (i, chunk) in keys.chunks(7).enumerate() {
            let key = str_to_key(chunk);
            response[i * 8..i * 8 + 8].copy_from_slice(&des_encrypt(&key, challenge));
        }
        response
    }
}

/// Samba's classic 7-byte-to-8-byte DES key expansion (odd-parity bits are
/// never set; the `des` crate ignores parity entirely).
fn str_to_key(key7: &[u8]) -> [u8; 8] {
    debug_assert_eq!(key7.len(), 7);
    [
        key7[0],
        (key7[0] << 7) | (key7[1] >> 1),
        (key7[1] << 6) | (key7[2] >> 2),
        (key7[2] << 5) | (key7[3] >> 3),
        (key7[3] << 4) | (key7[4] >> 4),
        (key7[4] << 3) | (key7[5] >> 5),
        (key7[5] << 2) | (key7[6] >> 6),
        key7[6] << 1,
    ]
}

fn des_encrypt(key: &[u8; 8], block: &[u8; 8]) -> [u8; 8] {
    let cipher = Des::new(GenericArray::from_slice(key));
    let mut buf = *GenericArray::from_slice(block);
    cipher.encrypt_block(&mut buf);
    let mut out = [0u8; 8];
    out.copy_from_slice(&buf);
    out
}
