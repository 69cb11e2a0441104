use crate::core::error::{TagwatchError, TagwatchResult};
use std::cmp::Ordering;
use std::fmt;

/// Sortable form of a version-like tag name.
///
/// Accepts an optional `v`/`r` prefix, any number of dotted numeric
/// segments, an optional `-prerelease` suffix and optional `+build`
/// metadata: `v1.2`, `r10`, `2.10.0-rc.1`, `1.0.0+build.5`.
#[derive(Debug, Clone)]
pub struct VersionKey {
    /// Numeric release segments, e.g. `[2, 10, 0]`
    pub release: Vec<u64>,
    /// Pre-release identifiers (e.g., "alpha.1", "rc.2")
    pub prerelease: Option<String>,
}

impl VersionKey {
    /// Parse a tag name into a version key
    pub fn parse(s: &str) -> TagwatchResult<Self> {
        let trimmed = s.trim();
        let unprefixed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('r'))
            .unwrap_or(trimmed);

        // Build metadata never affects precedence
        let without_build = unprefixed
            .split_once('+')
            .map(|(version, _)| version)
            .unwrap_or(unprefixed);

        let (core, mut prerelease) = match without_build.split_once('-') {
            Some((core, pre)) => (core, Some(pre.to_string())),
            None => (without_build, None),
        };

        let mut release = Vec::new();
        for segment in core.split('.') {
            let digits_end = segment
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(segment.len());
            let (digits, tail) = segment.split_at(digits_end);

            if digits.is_empty() {
                if release.is_empty() {
                    return Err(TagwatchError::Version(format!(
                        "Not a version-like tag: {}",
                        s
                    )));
                }
                // "1.2.beta" -> release 1.2, prerelease "beta"
                prerelease.get_or_insert_with(|| segment.to_string());
                break;
            }

            // All-digit runs only fail to parse on overflow; clamp so every
            // version-like name still gets a key
            release.push(digits.parse().unwrap_or(u64::MAX));

            if !tail.is_empty() {
                // "1.0.0rc1" -> release 1.0.0, prerelease "rc1"
                prerelease.get_or_insert_with(|| tail.to_string());
                break;
            }
        }

        Ok(Self {
            release,
            prerelease,
        })
    }

    fn segment(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }
}

impl PartialEq for VersionKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionKey {}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Missing trailing segments count as zero: 1.2 == 1.2.0
        let width = self.release.len().max(other.release.len());
        for i in 0..width {
            match self.segment(i).cmp(&other.segment(i)) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }

        match (&self.prerelease, &other.prerelease) {
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less, // Pre-release < release
            (None, Some(_)) => Ordering::Greater, // Release > pre-release
            (Some(a), Some(b)) => compare_prerelease_identifiers(a, b),
        }
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let release: Vec<String> = self.release.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", release.join("."))?;
        if let Some(ref pre) = self.prerelease {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// Compare pre-release identifiers according to SemVer spec
fn compare_prerelease_identifiers(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<&str> = a.split('.').collect();
    let b_parts: Vec<&str> = b.split('.').collect();

    for (a_part, b_part) in a_parts.iter().zip(b_parts.iter()) {
        let ordering = match (a_part.parse::<u64>(), b_part.parse::<u64>()) {
            (Ok(a_num), Ok(b_num)) => a_num.cmp(&b_num),
            (Ok(_), Err(_)) => Ordering::Less, // Numeric < alphanumeric
            (Err(_), Ok(_)) => Ordering::Greater, // Alphanumeric > numeric
            (Err(_), Err(_)) => a_part.cmp(b_part),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    // If all parts are equal, longer pre-release is greater
    a_parts.len().cmp(&b_parts.len())
}

/// Whether a tag name looks like a version: optional `v`/`r` prefix
/// followed by a digit.
pub fn is_version_like(name: &str) -> bool {
    let rest = name
        .strip_prefix('v')
        .or_else(|| name.strip_prefix('r'))
        .unwrap_or(name);
    rest.starts_with(|c: char| c.is_ascii_digit())
}

/// Order two version-like tag names numerically, segment by segment.
///
/// Names that do not parse fall back to plain string ordering so the
/// result is still a total order; callers filter with [`is_version_like`]
/// first.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (VersionKey::parse(a), VersionKey::parse(b)) {
        (Ok(a_key), Ok(b_key)) => a_key.cmp(&b_key),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = VersionKey::parse("1.2.3").unwrap();
        assert_eq!(v.release, vec![1, 2, 3]);
        assert_eq!(v.prerelease, None);
    }

    #[test]
    fn test_version_parse_prefixes() {
        assert_eq!(VersionKey::parse("v1.2.3").unwrap().release, vec![1, 2, 3]);
        assert_eq!(VersionKey::parse("r42").unwrap().release, vec![42]);
    }

    #[test]
    fn test_version_parse_rejects_names() {
        assert!(VersionKey::parse("hotfix-A").is_err());
        assert!(VersionKey::parse("latest").is_err());
    }

    #[test]
    fn test_version_parse_prerelease_and_build() {
        let v = VersionKey::parse("1.0.0-rc.1+build.456").unwrap();
        assert_eq!(v.release, vec![1, 0, 0]);
        assert_eq!(v.prerelease, Some("rc.1".to_string()));
        assert_eq!(v.to_string(), "1.0.0-rc.1");
    }

    #[test]
    fn test_version_parse_glued_prerelease() {
        let v = VersionKey::parse("2.0.0beta2").unwrap();
        assert_eq!(v.release, vec![2, 0, 0]);
        assert_eq!(v.prerelease, Some("beta2".to_string()));
    }

    #[test]
    fn test_prefix_does_not_affect_ordering() {
        assert_eq!(compare_versions("v1.2.0", "1.2.0"), Ordering::Equal);
        assert_eq!(compare_versions("r3", "v3"), Ordering::Equal);
    }

    #[test]
    fn test_numeric_not_lexical() {
        assert_eq!(compare_versions("2.9.0", "2.10.0"), Ordering::Less);
        assert_eq!(compare_versions("2.9", "2.10"), Ordering::Less);
        assert_eq!(compare_versions("v10.0.0", "v9.9.9"), Ordering::Greater);
    }

    #[test]
    fn test_missing_segments_are_zero() {
        assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
        assert_eq!(compare_versions("1", "1.0.1"), Ordering::Less);
    }

    #[test]
    fn test_prerelease_sorts_below_release() {
        assert_eq!(compare_versions("1.0.0-alpha", "1.0.0"), Ordering::Less);
        assert_eq!(compare_versions("1.0.0-beta.2", "1.0.0-beta.11"), Ordering::Less);
        assert_eq!(compare_versions("1.0.0-1", "1.0.0-alpha"), Ordering::Less);
        assert_eq!(compare_versions("1.0.0-rc.1", "0.9.0"), Ordering::Greater);
    }

    #[test]
    fn test_build_metadata_ignored() {
        assert_eq!(compare_versions("1.0.0+build.1", "1.0.0+build.2"), Ordering::Equal);
    }

    #[test]
    fn test_unparseable_falls_back_to_lexical() {
        assert_eq!(compare_versions("abc", "abd"), Ordering::Less);
    }

    #[test]
    fn test_oversized_segment_is_clamped() {
        let key = VersionKey::parse("v99999999999999999999").unwrap();
        assert_eq!(key.release, vec![u64::MAX]);

        // Ordering stays numeric in both directions, so the result of a
        // max-scan does not depend on input order
        assert_eq!(compare_versions("v100000000000000000000", "v2.0.0"), Ordering::Greater);
        assert_eq!(compare_versions("v2.0.0", "v100000000000000000000"), Ordering::Less);
        assert_eq!(compare_versions("v10.0.0", "v99999999999999999999"), Ordering::Less);
        assert_eq!(
            compare_versions("1.99999999999999999999", "1.2"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_is_version_like() {
        assert!(is_version_like("v1.0.0"));
        assert!(is_version_like("r12"));
        assert!(is_version_like("2024.01.01"));
        assert!(!is_version_like("hotfix-A"));
        assert!(!is_version_like("release-1.0"));
        assert!(!is_version_like("v"));
        assert!(!is_version_like("V1.0.0"));
        assert!(!is_version_like(""));
    }
}
