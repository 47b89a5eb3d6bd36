//! Hash helpers – abstracción para permitir cambiar de algoritmo sin tocar resto del core.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::constants::DIGEST_LEN;

/// BLAKE3 en modo XOF truncado a `DIGEST_LEN` bytes.
pub fn hash_bytes(input: &[u8]) -> [u8; DIGEST_LEN] {
    let mut h = blake3::Hasher::new();
    h.update(input);
    let mut out = [0u8; DIGEST_LEN];
    h.finalize_xof().fill(&mut out);
    out
}

/// Hashea un string y devuelve el digest en base64.
pub fn hash_str(input: &str) -> String {
    STANDARD.encode(hash_bytes(input.as_bytes()))
}
