// Copyright (c) 2025-2026 The Trezoreum Developers

//! BIP-32 derivation paths in their textual `m/44'/60'/0'/0/2` form

use std::fmt;
use std::str::FromStr;

/// Offset marking a hardened path component
pub const HARDENED: u32 = 0x8000_0000;

/// Derivation path parse error
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path contained no components
    #[error("empty derivation path")]
    Empty,

    /// Component was not an unsigned integer with optional `'` suffix
    #[error("invalid path component `{0}`")]
    Component(String),

    /// Component index does not fit below the hardened offset
    #[error("path component {0} out of range")]
    Range(u32),
}

/// Ordered sequence of BIP-32 child indices, immutable once parsed.
///
/// Hardened components carry the [HARDENED] offset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// Build a path from raw child indices
    pub fn new(components: impl Into<Vec<u32>>) -> Self {
        Self(components.into())
    }

    /// Child indices in derivation order
    pub fn components(&self) -> &[u32] {
        &self.0
    }
}

impl FromStr for DerivationPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        let mut parts = s.split('/').peekable();

        // Optional master node prefix
        if let Some(&"m") | Some(&"M") = parts.peek() {
            parts.next();
        }

        let mut components = Vec::new();
        for part in parts {
            let (digits, hardened) = match part.strip_suffix('\'') {
                Some(digits) => (digits, true),
                None => (part, false),
            };

            let index: u32 = digits
                .parse()
                .map_err(|_| PathError::Component(part.to_string()))?;
            if index >= HARDENED {
                return Err(PathError::Range(index));
            }

            components.push(if hardened { index | HARDENED } else { index });
        }

        if components.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self(components))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for component in &self.0 {
            if component & HARDENED != 0 {
                write!(f, "/{}'", component & !HARDENED)?;
            } else {
                write!(f, "/{component}")?;
            }
        }
        Ok(())
    }
}

impl From<DerivationPath> for Vec<u32> {
    fn from(path: DerivationPath) -> Self {
        path.0
    }
}
