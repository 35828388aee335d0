//! Catalog resolution
//!
//! Maps an install request to a clonable source location. Input that
//! already looks like a source location (URL scheme, scp-like remote, or
//! a filesystem path) is used verbatim; anything else is a short catalog
//! name resolved into the fixed organization namespace. Resolution is
//! purely syntactic: whether the guessed location actually exists is
//! deferred to the clone step, which saves a network round trip when the
//! name is valid and surfaces `SourceUnavailable` when it is not.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Resolution errors
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Input is neither a plausible catalog name nor a source location
    #[error("'{input}' is not a valid package name or source location")]
    InvalidInput { input: String },
}

/// A resolved install source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// Package name, which also names `packages/<name>` and `library/<name>`
    pub name: String,
    /// Location passed to the clone step
    pub url: String,
    /// Whether the location came from the catalog namespace convention
    pub from_catalog: bool,
}

/// scp-like remote, e.g. `git@host:org/repo.git`
fn scp_like() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._-]+@[A-Za-z0-9._-]+:.+").expect("invalid scp-like pattern")
    })
}

/// Whether the input is already a source location rather than a catalog name
fn is_source_location(input: &str) -> bool {
    input.contains("://")
        || scp_like().is_match(input)
        || input.starts_with('.')
        || input.starts_with('~')
        || input.contains('/')
        || input.contains('\\')
}

/// Final path segment of a location, with any `.git` suffix stripped
fn repo_name(location: &str) -> Option<String> {
    let trimmed = location.trim_end_matches('/');
    let after_slash = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    // scp-like remotes without a slash in the path part split on the colon
    let segment = after_slash.rsplit(':').next().unwrap_or(after_slash);
    let name = segment.strip_suffix(".git").unwrap_or(segment);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Whether a short name fits the catalog namespace
fn is_valid_catalog_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Resolve an install request against an organization namespace
pub fn resolve(input: &str, org_url: &str) -> Result<ResolvedSource, ResolveError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ResolveError::InvalidInput {
            input: input.to_string(),
        });
    }

    if is_source_location(input) {
        let name = repo_name(input).ok_or_else(|| ResolveError::InvalidInput {
            input: input.to_string(),
        })?;
        tracing::debug!(input, name, "using source location verbatim");
        return Ok(ResolvedSource {
            name,
            url: input.to_string(),
            from_catalog: false,
        });
    }

    if !is_valid_catalog_name(input) {
        return Err(ResolveError::InvalidInput {
            input: input.to_string(),
        });
    }

    let url = format!("{}/{}.git", org_url.trim_end_matches('/'), input);
    tracing::debug!(name = input, url, "resolved catalog name");
    Ok(ResolvedSource {
        name: input.to_string(),
        url,
        from_catalog: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_catalog_name_resolves_into_org() {
        let source = resolve("libcore", "https://github.com/emberkit-dev").unwrap();
        assert_eq!(source.name, "libcore");
        assert_eq!(source.url, "https://github.com/emberkit-dev/libcore.git");
        assert!(source.from_catalog);
    }

    #[test]
    fn test_url_is_used_verbatim() {
        let url = "https://example.com/somewhere/libfoo.git";
        let source = resolve(url, "https://github.com/emberkit-dev").unwrap();
        assert_eq!(source.url, url);
        assert_eq!(source.name, "libfoo");
        assert!(!source.from_catalog);
    }

    #[test]
    fn test_url_without_git_suffix() {
        let source = resolve("https://example.com/libbar", "ignored://org").unwrap();
        assert_eq!(source.name, "libbar");
    }

    #[test]
    fn test_scp_like_remote_is_a_source_location() {
        let source = resolve("git@example.com:org/librepo.git", "ignored://org").unwrap();
        assert_eq!(source.name, "librepo");
        assert_eq!(source.url, "git@example.com:org/librepo.git");
        assert!(!source.from_catalog);
    }

    #[test]
    fn test_local_path_is_a_source_location() {
        let source = resolve("/srv/mirrors/libbaz", "ignored://org").unwrap();
        assert_eq!(source.name, "libbaz");
        assert!(!source.from_catalog);

        let relative = resolve("./fixtures/libqux.git", "ignored://org").unwrap();
        assert_eq!(relative.name, "libqux");
    }

    #[test]
    fn test_trailing_slash_is_tolerated() {
        let source = resolve("https://example.com/libfoo/", "ignored://org").unwrap();
        assert_eq!(source.name, "libfoo");
    }

    #[test]
    fn test_org_url_trailing_slash_is_normalized() {
        let source = resolve("libcore", "https://github.com/emberkit-dev/").unwrap();
        assert_eq!(source.url, "https://github.com/emberkit-dev/libcore.git");
    }

    #[test]
    fn test_invalid_input_rejected() {
        assert!(resolve("", "https://x/y").is_err());
        assert!(resolve("   ", "https://x/y").is_err());
        assert!(resolve("name with spaces", "https://x/y").is_err());
    }

    fn catalog_name_strategy() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[A-Za-z0-9][A-Za-z0-9._-]{0,30}").expect("valid regex")
    }

    proptest! {
        /// Catalog names always resolve inside the org namespace and keep
        /// their name intact.
        #[test]
        fn prop_catalog_names_stay_in_namespace(name in catalog_name_strategy()) {
            let source = resolve(&name, "https://github.com/emberkit-dev").unwrap();
            prop_assert!(source.from_catalog);
            prop_assert_eq!(&source.name, &name);
            prop_assert_eq!(
                source.url,
                format!("https://github.com/emberkit-dev/{name}.git")
            );
        }

        /// Anything carrying a scheme bypasses the catalog and survives
        /// verbatim, and its name round-trips through the org convention.
        #[test]
        fn prop_urls_bypass_catalog(name in catalog_name_strategy()) {
            let url = format!("https://example.com/mirror/{name}.git");
            let source = resolve(&url, "https://github.com/other-org").unwrap();
            prop_assert!(!source.from_catalog);
            prop_assert_eq!(source.url, url);
            prop_assert_eq!(source.name, name);
        }
    }
}
