//! Organization and platform URLs

/// Organization namespace that catalog names resolve into
pub const ORG_URL: &str = "https://github.com/emberkit-dev";

/// Source of the shared platform checkout
pub const PLATFORM_REPO: &str = "https://github.com/emberkit-dev/platform.git";

/// GitHub API base URL (catalog listing)
pub const GITHUB_API: &str = "https://api.github.com";

/// Organization account name of an organization URL (its last path segment)
#[must_use]
pub fn org_name(org_url: &str) -> &str {
    let trimmed = org_url.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
