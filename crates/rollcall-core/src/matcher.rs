//! Resolution of free-text roster names to destination person records.
//!
//! Roster names arrive in loose formats ("Sen. Michelle Hinchey",
//! "J. Sanders") while destination records carry a single display name.
//! Matching is tiered and the first tier that produces a candidate wins:
//!
//! 1. Exact, case-insensitive equality with the display name
//! 2. The last name token appears anywhere in the display name
//! 3. The first token and the remaining tokens both appear in the display name
//!
//! Only candidates tagged with the Senate chamber are ever considered. Within
//! a tier, ties go to the first candidate in snapshot order.

use tracing::trace;

use crate::committee::DestinationPerson;

/// Title prefixes stripped before matching, longest first.
const TITLES: &[&str] = &["senator", "sen.", "sen"];

/// Which matching tier resolved a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    LastName,
    FirstLast,
}

/// A resolved roster name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonMatch<'a> {
    pub person: &'a DestinationPerson,
    pub tier: MatchTier,
}

/// Matches roster names against people in one chamber.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    senate_tag: String,
}

impl NameMatcher {
    pub fn new(senate_tag: impl Into<String>) -> Self {
        Self {
            senate_tag: senate_tag.into(),
        }
    }

    pub fn senate_tag(&self) -> &str {
        &self.senate_tag
    }

    /// Resolve `raw_name` to a destination person id, or `None`.
    pub fn match_id<'a>(
        &self,
        raw_name: &str,
        candidates: &'a [DestinationPerson],
    ) -> Option<&'a str> {
        self.find(raw_name, candidates).map(|m| m.person.id.as_str())
    }

    /// Resolve `raw_name` and report which tier produced the match.
    ///
    /// A name that is blank after normalisation matches nobody, rather than
    /// letting its empty last-name token match the first senator.
    pub fn find<'a>(
        &self,
        raw_name: &str,
        candidates: &'a [DestinationPerson],
    ) -> Option<PersonMatch<'a>> {
        let clean = normalize_name(raw_name);
        if clean.is_empty() {
            return None;
        }

        let senators: Vec<(&'a DestinationPerson, String)> = candidates
            .iter()
            .filter(|p| p.chamber_tag == self.senate_tag)
            .map(|p| (p, p.display_name.to_lowercase()))
            .collect();
        if senators.is_empty() {
            return None;
        }

        let clean_lower = clean.to_lowercase();
        let tokens: Vec<&str> = clean_lower.split_whitespace().collect();

        let found = tier(&senators, MatchTier::Exact, |name| name == clean_lower)
            .or_else(|| {
                let last = *tokens.last()?;
                tier(&senators, MatchTier::LastName, |name| name.contains(last))
            })
            // Subsumed by the last-name tier: a name containing the joined
            // remainder also contains its final token.
            .or_else(|| {
                let (first, rest) = tokens.split_first()?;
                if rest.is_empty() {
                    return None;
                }
                let last = rest.join(" ");
                tier(&senators, MatchTier::FirstLast, |name| {
                    name.contains(first) && name.contains(&last)
                })
            });

        if let Some(m) = &found {
            trace!(name = clean, id = %m.person.id, tier = ?m.tier, "matched roster name");
        }
        found
    }
}

fn tier<'a>(
    senators: &[(&'a DestinationPerson, String)],
    tier: MatchTier,
    pred: impl Fn(&str) -> bool,
) -> Option<PersonMatch<'a>> {
    senators
        .iter()
        .find(|(_, name)| pred(name))
        .map(|(person, _)| PersonMatch {
            person: *person,
            tier,
        })
}

/// Strip a leading `Senator` / `Sen.` / `Sen` title and surrounding whitespace.
///
/// The title only counts when followed by whitespace, so "Senft" is untouched.
pub fn normalize_name(raw: &str) -> &str {
    let trimmed = raw.trim();
    for title in TITLES {
        let Some(head) = trimmed.get(..title.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(title) {
            continue;
        }
        let rest = &trimmed[title.len()..];
        if rest.starts_with(char::is_whitespace) {
            return rest.trim();
        }
    }
    trimmed
}
