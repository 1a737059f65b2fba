use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::{Prerelease, Version as SemVersion};
use serde::{Deserialize, Serialize};

/// A concrete, totally ordered artifact revision of a [`crate::Version`].
///
/// Accepts one to three numeric release components, optionally followed by an
/// `a`, `b` or `rc` pre-release tag: `3.11`, `3.11.2`, `3.12.0rc1`,
/// `3.13.0-b2`. Missing components are zero, so `3.11` and `3.11.0` compare
/// equal. The original spelling is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Build {
    raw: String,
    semver: SemVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a valid build number: {reason}")]
pub struct BuildParseError {
    pub input: String,
    pub reason: &'static str,
}

impl Build {
    pub fn parse(input: &str) -> Result<Self, BuildParseError> {
        let raw = input.trim();
        let fail = |reason| BuildParseError {
            input: input.to_string(),
            reason,
        };
        if raw.is_empty() {
            return Err(fail("empty"));
        }

        let release_end = raw
            .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
            .unwrap_or(raw.len());
        let (release, tag) = raw.split_at(release_end);
        // `3.12.0.rc1` separates the tag with a dot; a bare trailing dot is malformed
        let release = match release.strip_suffix('.') {
            Some(trimmed) if !tag.is_empty() => trimmed,
            _ => release,
        };

        let mut components = [0_u64; 3];
        let mut count = 0;
        for part in release.split('.') {
            if part.is_empty() {
                return Err(fail("empty release component"));
            }
            if count == components.len() {
                return Err(fail("more than three release components"));
            }
            components[count] = part
                .parse()
                .map_err(|_| fail("release component out of range"))?;
            count += 1;
        }

        let mut semver = SemVersion::new(components[0], components[1], components[2]);
        if !tag.is_empty() {
            semver.pre = parse_prerelease_tag(tag).ok_or_else(|| fail("unsupported suffix"))?;
        }

        Ok(Self {
            raw: raw.to_string(),
            semver,
        })
    }

    pub fn semver(&self) -> &SemVersion {
        &self.semver
    }

    pub fn is_prerelease(&self) -> bool {
        !self.semver.pre.is_empty()
    }
}

fn parse_prerelease_tag(tag: &str) -> Option<Prerelease> {
    let tag = tag.strip_prefix(&['-', '.'][..]).unwrap_or(tag);
    let (label, number) = ["rc", "a", "b"]
        .into_iter()
        .find_map(|label| tag.strip_prefix(label).map(|rest| (label, rest)))?;
    let number = number.strip_prefix('.').unwrap_or(number);
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u64 = number.parse().ok()?;
    Prerelease::new(&format!("{label}.{number}")).ok()
}

impl PartialEq for Build {
    fn eq(&self, other: &Self) -> bool {
        self.semver == other.semver
    }
}

impl Eq for Build {}

impl PartialOrd for Build {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Build {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semver.cmp(&other.semver)
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Build {
    type Err = BuildParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Build {
    type Error = BuildParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Build> for String {
    fn from(value: Build) -> Self {
        value.raw
    }
}
