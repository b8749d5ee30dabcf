//! Tests for the canonical vocabulary and borough normalization.

use std::str::FromStr;

use proptest::prelude::*;
use urbanflux_core::errors::{ModelError, StorageError, UrbanfluxErrorCode};
use urbanflux_core::model::{Borough, BoroughPolicy, Certainty, EventType, Nature, Source};

const CANONICAL: [&str; 5] = ["Manhattan", "Bronx", "Brooklyn", "Queens", "Staten Island"];

#[test]
fn wire_names_parse_back() {
    for t in EventType::ALL {
        assert_eq!(EventType::from_str(t.as_str()), Ok(t));
        assert_eq!(serde_json::to_value(t).unwrap(), t.as_str());
    }
    for s in Source::ALL {
        assert_eq!(Source::from_str(s.as_str()), Ok(s));
    }
    for n in Nature::ALL {
        assert_eq!(Nature::from_str(n.as_str()), Ok(n));
    }
    assert!(matches!(
        EventType::from_str("rezoning_rumor"),
        Err(ModelError::UnknownVariant { kind: "event type", .. })
    ));
}

#[test]
fn certainty_presentation() {
    assert_eq!(Certainty::Discussion.opacity(), 0.4);
    assert_eq!(Certainty::Probable.opacity(), 0.7);
    assert_eq!(Certainty::Certain.opacity(), 1.0);
    assert!(Certainty::Discussion.shows_dashed_border());
    assert!(!Certainty::Probable.shows_dashed_border());
    assert!(!Certainty::Certain.shows_dashed_border());
    assert!(Certainty::Discussion < Certainty::Probable);
    assert!(Certainty::Probable < Certainty::Certain);
}

#[test]
fn borough_policies_diverge_only_on_unknown_tokens() {
    assert_eq!(BoroughPolicy::Drop.normalize(Some("3")).as_deref(), Some("Brooklyn"));
    assert_eq!(
        BoroughPolicy::PassThrough.normalize(Some("bk")).as_deref(),
        Some("Brooklyn")
    );
    assert_eq!(BoroughPolicy::Drop.normalize(Some("Citywide")), None);
    assert_eq!(
        BoroughPolicy::PassThrough.normalize(Some("Citywide")).as_deref(),
        Some("Citywide")
    );
    assert_eq!(BoroughPolicy::PassThrough.normalize(Some("   ")), None);
    assert_eq!(BoroughPolicy::PassThrough.normalize(None), None);
}

#[test]
fn storage_busy_maps_to_db_busy_code() {
    let busy = StorageError::sqlite("database is locked");
    assert_eq!(busy.error_code(), "DB_BUSY");
    assert_eq!(StorageError::sqlite("no such table").error_code(), "STORAGE_ERROR");
    assert!(busy.coded_string().starts_with("[DB_BUSY]"));
}

fn recognized_token() -> impl Strategy<Value = String> {
    let forms: Vec<String> = Borough::ALL
        .iter()
        .flat_map(|b| {
            [
                b.code().to_string(),
                b.abbreviation().to_string(),
                b.abbreviation().to_ascii_lowercase(),
                b.name().to_string(),
                b.name().to_ascii_uppercase(),
                b.name().to_ascii_lowercase(),
            ]
        })
        .collect();
    prop::sample::select(forms)
}

proptest! {
    #[test]
    fn recognized_tokens_always_become_canonical_names(
        token in recognized_token(),
        pad_left in " {0,2}",
        pad_right in " {0,2}",
    ) {
        let raw = format!("{pad_left}{token}{pad_right}");
        for policy in [BoroughPolicy::Drop, BoroughPolicy::PassThrough] {
            let out = policy.normalize(Some(&raw));
            prop_assert!(out.as_deref().map_or(false, |b| CANONICAL.contains(&b)));
        }
    }

    #[test]
    fn unknown_tokens_follow_policy(token in "[A-Za-z]{3,10}") {
        prop_assume!(Borough::parse(&token).is_none());
        prop_assert_eq!(BoroughPolicy::Drop.normalize(Some(&token)), None);
        prop_assert_eq!(
            BoroughPolicy::PassThrough.normalize(Some(&token)),
            Some(token.clone())
        );
    }
}
