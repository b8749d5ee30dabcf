//! Normalization guarantees across adapters: the two end-to-end record
//! scenarios, borough policies, priority classification, idempotence.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::json;
use urbanflux_core::model::{Borough, EventType, Source};
use urbanflux_sources::{adapter_for, NormalizeContext, RawRecord};

fn ctx() -> NormalizeContext {
    NormalizeContext::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
}

#[test]
fn permit_new_building_in_brooklyn() {
    let record = RawRecord::from_value(json!({
        "job__": "321000123",
        "job_type": "NB",
        "filing_date": "2024-01-15T00:00:00.000",
        "borough": "3"
    }));
    let event = adapter_for(Source::PermitFilings)
        .normalize(&record, &ctx())
        .unwrap();
    assert_eq!(event.event_type.as_str(), "new_building");
    assert_eq!(event.borough.as_deref(), Some("Brooklyn"));
}

#[test]
fn zoning_filed_carries_no_coordinates() {
    let record = RawRecord::from_value(json!({
        "project_id": "2024K0001",
        "ulurp_non": "ULURP",
        "public_status": "Filed",
        "app_filed_date": "2024-02-01"
    }));
    let event = adapter_for(Source::ZoningApplications)
        .normalize(&record, &ctx())
        .unwrap();
    assert_eq!(event.event_type.as_str(), "ulurp_filed");
    assert_eq!(event.latitude, None);
    assert_eq!(event.longitude, None);
}

#[test]
fn final_statement_beats_draft_statement() {
    let record = RawRecord::from_value(json!({
        "ceqr_number": "24DCP001K",
        "deis_date": "2023-06-01",
        "feis_date": "2024-01-05"
    }));
    let event = adapter_for(Source::EnvironmentalReview)
        .normalize(&record, &ctx())
        .unwrap();
    assert_eq!(event.event_type, EventType::FeisSubmitted);
}

#[test]
fn ingestion_time_fallback_is_bounded_by_the_call() {
    let record = RawRecord::from_value(json!({"job__": "1", "job_type": "A1"}));
    let before = Utc::now();
    let event = adapter_for(Source::PermitFilings)
        .normalize(&record, &NormalizeContext::now())
        .unwrap();
    let after = Utc::now();
    assert!(before <= event.event_date && event.event_date <= after);
}

/// Which record field each adapter reads its borough from, and a record that
/// otherwise normalizes.
fn record_with_borough(source: Source, token: &str) -> RawRecord {
    let value = match source {
        Source::ZoningApplications => json!({
            "project_id": "P1", "ulurp_non": "ULURP", "public_status": "Filed", "borough": token
        }),
        Source::EnvironmentalReview => json!({
            "ceqr_number": "C1", "eas_date": "2024-01-01", "borough": token
        }),
        Source::PermitFilings => json!({"job__": "J1", "borough": token}),
        Source::Violations => json!({
            "isn_dob_bis_viol": "V1", "issue_date": "20240101", "boro": token
        }),
        Source::Complaints => json!({
            "complaint_number": "K1", "date_entered": "2024-01-01", "community_board": token
        }),
        Source::CertificatesOfOccupancy => json!({
            "job_number": "J1", "c_of_o_issuance_date": "2024-01-01", "borough": token
        }),
        Source::Parcels => json!({"bbl": "1000010001", "borough": token}),
        Source::Boundaries => json!({"nta2020": "MN0101", "boroname": token}),
    };
    RawRecord::from_value(value)
}

fn canonical_tokens() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u8..=5).prop_map(|d| d.to_string()),
        prop::sample::select(vec!["MN", "BX", "BK", "QN", "SI", "mn", "bk"])
            .prop_map(str::to_string),
        prop::sample::select(vec![
            "Manhattan",
            "BRONX",
            "brooklyn",
            "Queens",
            "Staten Island",
            "STATEN ISLAND"
        ])
        .prop_map(str::to_string),
    ]
}

proptest! {
    #[test]
    fn recognized_boroughs_are_canonical_everywhere(token in canonical_tokens()) {
        let names: Vec<_> = Borough::ALL.iter().map(|b| b.name()).collect();
        for source in Source::ALL {
            // Complaints read the borough from a community board's first digit.
            if source == Source::Complaints && !token.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            let event = adapter_for(source)
                .normalize(&record_with_borough(source, &token), &ctx())
                .unwrap();
            let borough = event.borough.unwrap();
            prop_assert!(names.contains(&borough.as_str()), "{source}: {borough}");
        }
    }

    #[test]
    fn unknown_boroughs_follow_the_source_policy(token in "[A-Za-z]{3,9}") {
        prop_assume!(Borough::parse(&token).is_none());
        for source in Source::ALL {
            if source == Source::Complaints {
                continue;
            }
            let event = adapter_for(source)
                .normalize(&record_with_borough(source, &token), &ctx())
                .unwrap();
            if source == Source::ZoningApplications {
                prop_assert_eq!(event.borough.as_deref(), Some(token.as_str()));
            } else {
                prop_assert_eq!(event.borough, None);
            }
        }
    }

    #[test]
    fn normalization_is_idempotent(
        job in "[0-9]{9}",
        job_type in prop::sample::select(vec!["NB", "A1", "A2", "DM", "XX", ""]),
        date in prop::option::of("20[0-2][0-9]-0[1-9]-1[0-9]"),
        lat in prop::option::of("-?[0-9]{1,2}\\.[0-9]{1,6}|NaN|abc"),
    ) {
        let mut value = json!({"job__": job, "job_type": job_type, "borough": "1"});
        if let Some(date) = date {
            value["filing_date"] = json!(date);
        }
        if let Some(lat) = lat {
            value["gis_latitude"] = json!(lat);
            value["gis_longitude"] = json!("-73.95");
        }
        let record = RawRecord::from_value(value);
        let adapter = adapter_for(Source::PermitFilings);
        let first = adapter.normalize(&record, &ctx());
        let second = adapter.normalize(&record, &ctx());
        prop_assert_eq!(first, second);
    }
}
