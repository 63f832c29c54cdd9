//! Deterministic statement fingerprinting over rendered text.

use crate::template::DialectId;
use sha2::{Digest, Sha256};
use std::fmt::{self, Write as _};

///
/// Fingerprint
///
/// Stable identity of a rendered statement over its dialect, text and
/// placeholder count. Bound values are not hashed.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub(crate) fn compute(dialect: DialectId, text: &str, slots: usize) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"stmtfp:v1");
        write_str(&mut hasher, &dialect.to_string());
        write_str(&mut hasher, text);
        write_u32(&mut hasher, u32::try_from(slots).unwrap_or(u32::MAX));

        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);

        Self(out)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn as_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            let _ = write!(out, "{byte:02x}");
        }
        out
    }

    /// First eight hex digits, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        let mut hex = self.as_hex();
        hex.truncate(8);
        hex
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

fn write_u32(hasher: &mut Sha256, value: u32) {
    hasher.update(value.to_be_bytes());
}

fn write_str(hasher: &mut Sha256, value: &str) {
    write_u32(hasher, u32::try_from(value.len()).unwrap_or(u32::MAX));
    hasher.update(value.as_bytes());
}
