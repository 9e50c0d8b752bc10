//! `did:dnssec` identifiers and domain name validation.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::error::{DomainError, DomainResult};

pub const SCHEME: &str = "did";
pub const METHOD: &str = "dnssec";
/// Label under which the root record of a document is published.
pub const ROOT_LABEL: &str = "_did";

const MAX_NAME_LEN: usize = 253;

fn label_regex() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| {
        Regex::new(r"^[a-z0-9_](?:[a-z0-9_-]{0,61}[a-z0-9_])?$").expect("valid label pattern")
    })
}

/// Validates a domain name and returns its ASCII form, dot-terminated.
///
/// Accepts internationalized names (converted with IDNA) and an optional
/// trailing dot.
pub fn normalize_fqdn(name: &str) -> DomainResult<String> {
    let invalid = |reason: &str| DomainError::InvalidDomainName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() {
        return Err(invalid("empty name"));
    }
    let ascii = idna::domain_to_ascii(trimmed).map_err(|_| invalid("IDNA conversion failed"))?;
    if ascii.len() > MAX_NAME_LEN {
        return Err(invalid("name longer than 253 bytes"));
    }
    if let Some(label) = ascii.split('.').find(|l| !label_regex().is_match(l)) {
        return Err(invalid(&format!("invalid label {label:?}")));
    }
    Ok(format!("{ascii}."))
}

/// A parsed `did:dnssec:<fqdn>` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Did {
    /// Normalized, dot-terminated domain name
    fqdn: String,
}

impl Did {
    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    /// Name of the root record: `_did.<fqdn>`.
    pub fn root_name(&self) -> String {
        format!("{}.{}", ROOT_LABEL, self.fqdn)
    }
}

impl FromStr for Did {
    type Err = DomainError;

    fn from_str(did: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| DomainError::InvalidDid {
            did: did.to_string(),
            reason,
        };

        let parts: Vec<&str> = did.split(':').collect();
        let [scheme, method, fqdn] = parts[..] else {
            return Err(invalid(format!(
                "expected 3 colon separated parts, got {}",
                parts.len()
            )));
        };
        if scheme != SCHEME {
            return Err(invalid(format!(
                "invalid URI scheme; expected = {SCHEME}, actual = {scheme}"
            )));
        }
        if method != METHOD {
            return Err(invalid(format!(
                "invalid DID method; expected = {METHOD}, actual = {method}"
            )));
        }
        let fqdn = normalize_fqdn(fqdn).map_err(|e| invalid(e.to_string()))?;
        Ok(Self { fqdn })
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}:{METHOD}:{}", self.fqdn)
    }
}
