use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const GROUP_DELIMITER: char = ':';
pub const GROUP_PREFIX: &str = "group:";

/// Family name of a document identity: everything before the first delimiter.
pub fn base_name(id: &str) -> &str {
    id.split_once(GROUP_DELIMITER)
        .map(|(base, _)| base)
        .unwrap_or(id)
        .trim()
}

pub fn group_identity(base: &str) -> String {
    format!("{GROUP_PREFIX}{base}")
}

pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }
    let mut out = label.chars().take(max_chars.saturating_sub(1)).collect::<String>();
    out.push('…');
    out
}

/// Deterministic point in [-1, 1]^3 derived from an identity.
pub fn stable_triple(id: &str) -> (f64, f64, f64) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = (hash & 0x1f_ffff) as f64 / 0x1f_ffff as f64;
    let y = ((hash >> 21) & 0x1f_ffff) as f64 / 0x1f_ffff as f64;
    let z = ((hash >> 42) & 0x1f_ffff) as f64 / 0x1f_ffff as f64;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0, (z * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_keeps_prefix() {
        assert_eq!(base_name("ASVS:V1.2.3"), "ASVS");
        assert_eq!(base_name("NIST 800-53:AC-2:1"), "NIST 800-53");
        assert_eq!(base_name("plain"), "plain");
        assert_eq!(group_identity("ASVS"), "group:ASVS");
    }

    #[test]
    fn stable_triple_is_deterministic_and_bounded() {
        let a = stable_triple("CRE:123");
        assert_eq!(a, stable_triple("CRE:123"));
        for value in [a.0, a.1, a.2] {
            assert!((-1.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn truncate_label_marks_cut() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("abcdefgh", 4), "abc…");
    }
}
