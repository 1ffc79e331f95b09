//! Version input parsing, validation, and the `gt21` template flag
//!
//! Users type either a concrete version (`2.1.0`) or an npm-style range
//! (`^2.1.0`, `>=1.0.0 <2.0.0`, `1.x || 2.x`). Ranges are lowered onto
//! `semver::VersionReq`, one requirement per `||` alternative.

use crate::error::{Result, ScaffoldError};
use semver::{BuildMetadata, Comparator, Op, Version, VersionReq};
use std::fmt;

/// Oldest framework release the generated code supports
pub const MIN_SUPPORTED: Version = Version::new(1, 0, 0);

/// Release the `gt21` flag is compared against
pub const GT21_THRESHOLD: Version = Version::new(2, 1, 0);

/// A validated version or range as entered by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    Concrete(Version),
    Range(VersionRange),
}

/// An npm-style range: any alternative matching means the range matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    pub fn parse(input: &str) -> Option<Self> {
        let raw = input.trim();
        let alternatives = raw
            .split("||")
            .map(parse_alternative)
            .collect::<Option<Vec<_>>>()?;
        let raw = if raw.is_empty() { "*" } else { raw };
        Some(Self {
            raw: raw.to_string(),
            alternatives,
        })
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }

    /// True when every version in every alternative sorts below `threshold`
    pub fn is_below(&self, threshold: &Version) -> bool {
        self.alternatives
            .iter()
            .all(|req| req.comparators.iter().any(|c| upper_bound(c).is_below(threshold)))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl VersionSpec {
    /// Parse a concrete version first, then fall back to a range
    pub fn parse(input: &str) -> Result<Self> {
        if let Some(version) = parse_version(input) {
            return Ok(Self::Concrete(version));
        }
        VersionRange::parse(input)
            .map(Self::Range)
            .ok_or_else(|| ScaffoldError::InvalidFormat {
                input: input.to_string(),
            })
    }

    /// True when nothing this spec accepts reaches `threshold`
    pub fn is_below(&self, threshold: &Version) -> bool {
        match self {
            Self::Concrete(version) => version < threshold,
            Self::Range(range) => range.is_below(threshold),
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(version) => write!(f, "{}", version),
            Self::Range(range) => f.write_str(range.as_str()),
        }
    }
}

/// Validate user input, rejecting anything that cannot reach 1.0.0
pub fn validate(input: &str) -> Result<VersionSpec> {
    let spec = VersionSpec::parse(input)?;
    if spec.is_below(&MIN_SUPPORTED) {
        return Err(ScaffoldError::UnsupportedLegacyVersion {
            input: input.to_string(),
        });
    }
    Ok(spec)
}

/// Template flag selecting the 2.1-era code paths.
///
/// Concrete versions compare as `2.1.0 >= version`, ranges as "2.1.0
/// satisfies the range". The concrete direction is kept literally.
pub fn compute_feature_flag(spec: &VersionSpec) -> bool {
    match spec {
        VersionSpec::Concrete(version) => GT21_THRESHOLD >= *version,
        VersionSpec::Range(range) => range.matches(&GT21_THRESHOLD),
    }
}

/// Turn a published version into a patch wildcard: `2.3.7` -> `2.3.x`
pub fn truncate_to_minor(latest: &str) -> Option<String> {
    let version = parse_version(latest)?;
    Some(format!("{}.{}.x", version.major, version.minor))
}

/// Parse a concrete version, tolerating one leading `v`.
///
/// `=2.0.0` is not a concrete version; it goes through the range path.
pub fn parse_version(input: &str) -> Option<Version> {
    let trimmed = input.trim();
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(cleaned).ok()
}

fn parse_alternative(text: &str) -> Option<VersionReq> {
    let comparators = lower_comparators(text)?;
    if comparators.is_empty() {
        return Some(VersionReq::STAR);
    }
    VersionReq::parse(&comparators.join(", ")).ok()
}

/// Rewrite one whitespace-separated comparator set into semver crate syntax
fn lower_comparators(text: &str) -> Option<Vec<String>> {
    let mut tokens: Vec<String> = Vec::new();
    let mut pending_op: Option<&str> = None;
    for token in text.split_whitespace() {
        // npm ranges have no comma separator
        if token.contains(',') {
            return None;
        }
        if split_op(token).1.is_empty() && token != "-" {
            // Operator separated from its version: ">= 1.0.0"
            pending_op = Some(token);
            continue;
        }
        match pending_op.take() {
            Some(op) => tokens.push(format!("{}{}", op, token)),
            None => tokens.push(token.to_string()),
        }
    }
    if pending_op.is_some() {
        return None;
    }

    let mut lowered = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if tokens.get(i + 1).map(String::as_str) == Some("-") {
            let upper = tokens.get(i + 2)?;
            lowered.extend(lower_token(&format!(">={}", tokens[i]))?);
            lowered.extend(lower_token(&format!("<={}", upper))?);
            i += 3;
            continue;
        }
        lowered.extend(lower_token(&tokens[i])?);
        i += 1;
    }
    Some(lowered)
}

/// Lower a single comparator; `Some(None)` means "any version"
fn lower_token(token: &str) -> Option<Option<String>> {
    let (op, version) = split_op(token);
    let version = version.strip_prefix('v').unwrap_or(version);
    if version.is_empty() {
        return None;
    }

    let mut parts = Vec::new();
    for part in version.split('.') {
        if matches!(part, "x" | "X" | "*") {
            break;
        }
        parts.push(part);
    }
    if parts.is_empty() {
        return Some(None);
    }

    let op = match op {
        "" => "=",
        "~>" => "~",
        other => other,
    };
    Some(Some(format!("{}{}", op, parts.join("."))))
}

fn split_op(token: &str) -> (&str, &str) {
    for op in ["<=", ">=", "~>", "<", ">", "=", "~", "^"] {
        if let Some(rest) = token.strip_prefix(op) {
            return (op, rest);
        }
    }
    ("", token)
}

/// Highest version a single comparator admits
enum UpperBound {
    Unbounded,
    Exclusive(Version),
    Inclusive(Version),
}

impl UpperBound {
    fn is_below(&self, threshold: &Version) -> bool {
        match self {
            UpperBound::Unbounded => false,
            UpperBound::Exclusive(bound) => bound <= threshold,
            UpperBound::Inclusive(bound) => bound < threshold,
        }
    }
}

fn upper_bound(c: &Comparator) -> UpperBound {
    let major = c.major;
    match c.op {
        Op::Exact | Op::Wildcard | Op::LessEq => match (c.minor, c.patch) {
            (Some(minor), Some(patch)) => UpperBound::Inclusive(Version {
                major,
                minor,
                patch,
                pre: c.pre.clone(),
                build: BuildMetadata::EMPTY,
            }),
            (Some(minor), None) => next_minor(major, minor),
            (None, _) => next_major(major),
        },
        Op::Less => UpperBound::Exclusive(Version {
            major,
            minor: c.minor.unwrap_or(0),
            patch: c.patch.unwrap_or(0),
            pre: c.pre.clone(),
            build: BuildMetadata::EMPTY,
        }),
        Op::Tilde => match c.minor {
            Some(minor) => next_minor(major, minor),
            None => next_major(major),
        },
        Op::Caret => match (c.minor, c.patch) {
            _ if major > 0 => next_major(major),
            (Some(minor), _) if minor > 0 => next_minor(0, minor),
            (Some(_), Some(patch)) => next_patch(0, 0, patch),
            (Some(_), None) => UpperBound::Exclusive(Version::new(0, 1, 0)),
            (None, _) => UpperBound::Exclusive(Version::new(1, 0, 0)),
        },
        _ => UpperBound::Unbounded,
    }
}

// Bumps carry into the next component on overflow; past u64::MAX nothing is above.
fn next_major(major: u64) -> UpperBound {
    match major.checked_add(1) {
        Some(major) => UpperBound::Exclusive(Version::new(major, 0, 0)),
        None => UpperBound::Unbounded,
    }
}

fn next_minor(major: u64, minor: u64) -> UpperBound {
    match minor.checked_add(1) {
        Some(minor) => UpperBound::Exclusive(Version::new(major, minor, 0)),
        None => next_major(major),
    }
}

fn next_patch(major: u64, minor: u64, patch: u64) -> UpperBound {
    match patch.checked_add(1) {
        Some(patch) => UpperBound::Exclusive(Version::new(major, minor, patch)),
        None => next_minor(major, minor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(input: &str) -> bool {
        compute_feature_flag(&VersionSpec::parse(input).unwrap())
    }

    #[test]
    fn test_concrete_versions() {
        assert!(matches!(validate("1.0.0"), Ok(VersionSpec::Concrete(_))));
        assert!(matches!(validate("2.5.0-beta.1"), Ok(VersionSpec::Concrete(_))));
        assert_eq!(validate("v2.1.0").unwrap().to_string(), "2.1.0");
    }

    #[test]
    fn test_ranges_accepted() {
        for input in [
            "^1.2.0",
            "~2.1",
            "2.3.x",
            ">=1.0.0 <2.0.0",
            ">= 1.0.0",
            "1.2.3 - 2.3.4",
            "1.x || 2.x",
            "*",
        ] {
            let spec = validate(input).unwrap_or_else(|e| panic!("{}: {}", input, e));
            assert!(matches!(spec, VersionSpec::Range(_)), "{}", input);
        }
    }

    #[test]
    fn test_invalid_format() {
        for input in [
            "abc",
            "1.2.3.4",
            "latest",
            ">=",
            "1.0.0 -",
            "vv2.0.0",
            "= v 2.0.0",
            "1.0.0, 2.0.0",
            ">=1.0.0,<2.0.0",
        ] {
            assert!(
                matches!(validate(input), Err(ScaffoldError::InvalidFormat { .. })),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_legacy_versions_rejected() {
        for input in ["0.9.0", ">=0.5.0 <1.0.0", "~0.4.2", "^0.9.0", "<=0.9", "1.0.0-rc.1"] {
            assert!(
                matches!(
                    validate(input),
                    Err(ScaffoldError::UnsupportedLegacyVersion { .. })
                ),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_ranges_reaching_one_accepted() {
        for input in ["1.0.0", "^1.2.0", ">=0.5.0", "<=1.0.0", "0.x || 1.x", "<2.0.0"] {
            assert!(validate(input).is_ok(), "{}", input);
        }
    }

    #[test]
    fn test_feature_flag_concrete() {
        assert!(flag("2.0.0"));
        assert!(flag("2.1.0"));
        assert!(!flag("3.0.0"));
    }

    #[test]
    fn test_equals_prefix_is_exact_range() {
        let spec = validate("=2.0.0").unwrap();
        assert!(matches!(spec, VersionSpec::Range(_)));
        assert_eq!(spec.to_string(), "=2.0.0");
        // 2.1.0 does not satisfy =2.0.0, unlike the concrete 2.0.0
        assert!(!compute_feature_flag(&spec));
        assert!(flag("=2.1.0"));
    }

    #[test]
    fn test_huge_components_do_not_overflow() {
        let max = u64::MAX;
        assert!(validate(&format!("1.{}", max)).is_ok());
        assert!(validate(&format!("~1.{}", max)).is_ok());
        assert!(validate(&format!("{}.x", max)).is_ok());
        assert!(validate(&format!("^0.0.{}", max)).is_err());
        assert!(matches!(
            validate(&format!("0.{}", max)),
            Err(ScaffoldError::UnsupportedLegacyVersion { .. })
        ));
    }

    #[test]
    fn test_feature_flag_range() {
        assert!(flag("^2.1.0"));
        assert!(!flag("^3.0.0"));
        assert!(!flag("2.3.x"));
        assert!(flag("2.x"));
    }

    #[test]
    fn test_bare_partial_is_x_range_not_caret() {
        let spec = VersionSpec::parse("2.1").unwrap();
        let VersionSpec::Range(range) = spec else {
            panic!("expected a range");
        };
        assert!(range.matches(&Version::new(2, 1, 9)));
        assert!(!range.matches(&Version::new(2, 2, 0)));
    }

    #[test]
    fn test_truncate_to_minor() {
        assert_eq!(truncate_to_minor("2.3.7").as_deref(), Some("2.3.x"));
        assert_eq!(truncate_to_minor("3.0.0-beta.2").as_deref(), Some("3.0.x"));
        assert_eq!(truncate_to_minor("not-a-version"), None);
    }

    #[test]
    fn test_range_display_keeps_user_text() {
        assert_eq!(validate(" ^2.1.0 ").unwrap().to_string(), "^2.1.0");
        assert_eq!(validate("").unwrap().to_string(), "*");
    }
}
