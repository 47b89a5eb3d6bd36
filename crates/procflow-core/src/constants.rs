//! Constantes del core.
//!
//! `CANONICAL_FORMAT` forma parte del input del digest: cambiarla invalida
//! todos los digests persistidos, por lo que sólo debe tocarse ante un cambio
//! incompatible de las proyecciones canónicas.

/// Versión lógica de la proyección canónica usada por `DigestVisitor`.
pub const CANONICAL_FORMAT: &str = "PD1";

/// Tamaño en bytes del digest de contenido (clase 128 bits).
pub const DIGEST_LEN: usize = 16;
