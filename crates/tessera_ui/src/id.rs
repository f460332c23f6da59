//! Widget identity.
//!
//! An [`Id`] is a 32-bit FNV-1a hash of a key, seeded with the id on top of
//! the current window's id stack. Identical call sequences therefore produce
//! identical ids every frame, which is the only thing that lets hover,
//! active and focus state survive across frames.
//!
//! String keys follow the label convention:
//! - `"Save##toolbar"`: the whole string is hashed, only `"Save"` is shown.
//! - `"Frame 12###fps"`: only `"###fps"` is hashed, so the visible text can
//!   change without changing identity.

use std::fmt;

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Stable widget identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id(pub u32);

impl Id {
    /// "No identity". Such items are laid out and clipped but never
    /// hovered, active or focused.
    pub const NONE: Self = Self(0);

    /// Hashes `bytes` with `seed`.
    #[must_use]
    pub fn hash_bytes(seed: Self, bytes: &[u8]) -> Self {
        let mut h = FNV_OFFSET_BASIS ^ seed.0;
        for &b in bytes {
            h ^= u32::from(b);
            h = h.wrapping_mul(FNV_PRIME);
        }
        // 0 is reserved.
        Self(if h == 0 { 1 } else { h })
    }

    /// Hashes a label with `seed`, honoring the `###` convention.
    #[must_use]
    pub fn hash_str(seed: Self, label: &str) -> Self {
        let hashed = match label.find("###") {
            Some(pos) => &label[pos..],
            None => label,
        };
        Self::hash_bytes(seed, hashed.as_bytes())
    }

    /// Hashes an integer key with `seed`.
    #[must_use]
    pub fn hash_int(seed: Self, key: i64) -> Self {
        Self::hash_bytes(seed, &key.to_le_bytes())
    }

    /// Root id of a window name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::hash_str(Self::NONE, name)
    }

    /// Returns true for [`Id::NONE`].
    #[inline]
    #[must_use]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns true for anything but [`Id::NONE`].
    #[inline]
    #[must_use]
    pub fn is_some(self) -> bool {
        self.0 != 0
    }

    /// Id offset by `n`, for families of synthetic ids (column borders).
    #[must_use]
    pub fn offset(self, n: u32) -> Self {
        Self(self.0.wrapping_add(n))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

/// A key accepted by `push_id` / `get_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKey<'a> {
    /// Label or string id.
    Str(&'a str),
    /// Loop index or other integer.
    Int(i64),
}

impl IdKey<'_> {
    /// Hashes the key with `seed`.
    #[must_use]
    pub fn hash(self, seed: Id) -> Id {
        match self {
            IdKey::Str(s) => Id::hash_str(seed, s),
            IdKey::Int(i) => Id::hash_int(seed, i),
        }
    }
}

impl<'a> From<&'a str> for IdKey<'a> {
    fn from(s: &'a str) -> Self {
        IdKey::Str(s)
    }
}

impl<'a> From<&'a String> for IdKey<'a> {
    fn from(s: &'a String) -> Self {
        IdKey::Str(s.as_str())
    }
}

impl From<i32> for IdKey<'_> {
    fn from(i: i32) -> Self {
        IdKey::Int(i64::from(i))
    }
}

impl From<i64> for IdKey<'_> {
    fn from(i: i64) -> Self {
        IdKey::Int(i)
    }
}

impl From<u32> for IdKey<'_> {
    fn from(i: u32) -> Self {
        IdKey::Int(i64::from(i))
    }
}

impl From<usize> for IdKey<'_> {
    fn from(i: usize) -> Self {
        IdKey::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

/// Visible part of a label: everything before the first `"##"`.
#[must_use]
pub fn label_display(label: &str) -> &str {
    match label.find("##") {
        Some(pos) => &label[..pos],
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_same_seed_is_stable() {
        let seed = Id::from_name("Window");
        assert_eq!(Id::hash_str(seed, "OK"), Id::hash_str(seed, "OK"));
        assert_eq!(Id::hash_int(seed, 7), Id::hash_int(seed, 7));
    }

    #[test]
    fn test_seed_and_key_both_matter() {
        let a = Id::from_name("A");
        let b = Id::from_name("B");
        assert_ne!(Id::hash_str(a, "OK"), Id::hash_str(b, "OK"));
        assert_ne!(Id::hash_str(a, "OK"), Id::hash_str(a, "Cancel"));
        assert_ne!(Id::hash_int(a, 1), Id::hash_int(a, 2));
    }

    #[test]
    fn test_double_hash_suffix_changes_id_but_not_label() {
        let seed = Id::from_name("W");
        assert_ne!(Id::hash_str(seed, "Go##1"), Id::hash_str(seed, "Go##2"));
        assert_eq!(label_display("Go##1"), "Go");
    }

    #[test]
    fn test_triple_hash_ignores_visible_prefix() {
        let seed = Id::from_name("W");
        assert_eq!(Id::hash_str(seed, "12 fps###perf"), Id::hash_str(seed, "60 fps###perf"));
        assert_eq!(label_display("12 fps###perf"), "12 fps");
    }

    #[test]
    fn test_never_none() {
        for i in 0..10_000 {
            assert!(Id::hash_int(Id::NONE, i).is_some());
        }
    }

    #[test]
    fn test_keys_convert() {
        let seed = Id::from_name("W");
        assert_eq!(IdKey::from(3usize).hash(seed), Id::hash_int(seed, 3));
        assert_eq!(IdKey::from("x").hash(seed), Id::hash_str(seed, "x"));
    }
}
