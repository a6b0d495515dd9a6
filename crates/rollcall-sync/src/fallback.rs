//! Built-in roster used when the roster API is unavailable.

use rollcall_core::{PersonRef, SourceCommittee};

const FALLBACK: &[(&str, &str, &[&str])] = &[
    (
        "Agriculture",
        "Michelle Hinchey",
        &[
            "Michelle Hinchey",
            "Patrick Gallivan",
            "Daniel Stec",
            "Robert Ortt",
            "Jacob Ashby",
        ],
    ),
    (
        "Health",
        "Gustavo Rivera",
        &[
            "Gustavo Rivera",
            "Rachel May",
            "Samra Brouk",
            "Zellnor Myrie",
            "Monica Martinez",
            "Roxanne Persaud",
        ],
    ),
    (
        "Finance",
        "Liz Krueger",
        &[
            "Liz Krueger",
            "James Sanders",
            "Leroy Comrie",
            "Michelle Hinchey",
            "Jeremy Cooney",
            "Toby Stavisky",
            "Jessica Ramos",
        ],
    ),
];

pub fn committees() -> Vec<SourceCommittee> {
    FALLBACK
        .iter()
        .map(|(name, chair, members)| SourceCommittee {
            name: (*name).to_string(),
            chair: Some(PersonRef::new(*chair)),
            members: members.iter().map(|m| PersonRef::new(*m)).collect(),
        })
        .collect()
}
