//! Slug and public URL derivation for committee records.
//!
//! The stored slug doubles as a lookup key in some deployments, so it must be
//! a pure function of the committee name: no counters, no collision suffixes,
//! no dependence on what already exists in the store.

/// Default namespace token prefixed to stored slugs.
pub const DEFAULT_SLUG_PREFIX: &str = "senate-";

/// Default public committee page base; the un-prefixed slug is appended.
pub const DEFAULT_URL_BASE: &str = "https://www.nysenate.gov/committees/";

/// Normalise a committee name into a URL-safe slug.
///
/// Input: "Health & Human Services"
/// Output: "health-human-services"
///
/// # Algorithm
///
/// 1. Lower-case the name
/// 2. Drop every character that is not `a-z`, `0-9`, whitespace, or `-`
/// 3. Collapse whitespace runs to a single `-`
/// 4. Collapse `-` runs to a single `-`
/// 5. Strip leading and trailing `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
        // Anything else is removed without acting as a separator.
    }

    slug
}

/// Slug and URL for one committee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitteeSlug {
    /// Prefixed slug stored on the record.
    pub slug: String,
    /// Public page URL built from the un-prefixed slug.
    pub url: String,
}

/// Fixed parts of the slug and URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTemplate {
    pub slug_prefix: String,
    pub url_base: String,
}

impl Default for FieldTemplate {
    fn default() -> Self {
        Self {
            slug_prefix: DEFAULT_SLUG_PREFIX.to_string(),
            url_base: DEFAULT_URL_BASE.to_string(),
        }
    }
}

impl FieldTemplate {
    pub fn build_fields(&self, committee_name: &str) -> CommitteeSlug {
        let bare = slugify(committee_name);
        CommitteeSlug {
            slug: format!("{}{}", self.slug_prefix, bare),
            url: format!("{}{}", self.url_base, bare),
        }
    }
}
