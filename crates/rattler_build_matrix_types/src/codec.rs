//! Compressed version tokens used inside build identifiers (`np18py27_0`).

use crate::version::{MalformedVersion, MalformedVersionKind, VersionExt, parse_version};

/// How a version is turned into an identifier token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPolicy {
    /// Concatenate the leading numbers of the first `segments` segments and
    /// truncate the result to `width` characters (`2.7.2` -> `27`).
    Numeric { segments: usize, width: usize },
    /// Use the version string unchanged (`5.22.0` -> `5.22.0`).
    Verbatim,
}

/// Encode a version string into an identifier token according to `policy`.
pub fn encode(version: &str, policy: TokenPolicy) -> Result<String, MalformedVersion> {
    match policy {
        TokenPolicy::Verbatim => Ok(version.to_string()),
        TokenPolicy::Numeric { segments, width } => {
            let numbers = parse_version(version)?.numeric_prefix();
            if numbers.is_empty() {
                return Err(MalformedVersion::new(
                    version,
                    MalformedVersionKind::NoNumericSegment,
                ));
            }
            let mut token: String = numbers
                .iter()
                .take(segments)
                .map(|n| n.to_string())
                .collect();
            token.truncate(width);
            Ok(token)
        }
    }
}
