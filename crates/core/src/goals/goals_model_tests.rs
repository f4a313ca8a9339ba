//! Tests for goal domain models and the persisted record shape.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use serde_json::json;

use crate::goals::{Goal, GoalMetadata, NewGoalDraft, Protocol};

fn draft() -> NewGoalDraft {
    NewGoalDraft {
        name: "Vacation Fund".to_string(),
        target_amount: dec!(150),
        initial_deposit: dec!(50),
        duration_days: 30,
        protocol: Protocol::Aave,
    }
}

// ==================== Persisted record format ====================

#[test]
fn test_metadata_serializes_to_persisted_shape() {
    let meta = GoalMetadata {
        name: "Bike Vault".to_string(),
        target_amount: dec!(150.5),
        duration_days: 30,
        protocol: Protocol::Symbiotic,
        created_at: 1_700_000_000_000,
    };

    let value = serde_json::to_value(&meta).unwrap();
    assert_eq!(
        value,
        json!({
            "name": "Bike Vault",
            "targetAmount": 150.5,
            "duration": 30,
            "protocol": "symbiotic",
            "createdAt": 1_700_000_000_000_i64,
        })
    );
}

#[test]
fn test_metadata_round_trips_through_json() {
    let meta = GoalMetadata {
        name: "Emergency Fund".to_string(),
        target_amount: dec!(10000),
        duration_days: 180,
        protocol: Protocol::Aave,
        created_at: 1_700_000_000_000,
    };

    let json = serde_json::to_string(&meta).unwrap();
    let parsed: GoalMetadata = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, meta);
}

#[test]
fn test_protocol_serialization() {
    assert_eq!(serde_json::to_string(&Protocol::Aave).unwrap(), "\"aave\"");
    assert_eq!(
        serde_json::to_string(&Protocol::Symbiotic).unwrap(),
        "\"symbiotic\""
    );
    assert_eq!(
        serde_json::from_str::<Protocol>("\"aave\"").unwrap(),
        Protocol::Aave
    );
}

// ==================== Draft validation ====================

#[test]
fn test_draft_validates() {
    assert!(draft().validate().is_ok());
}

#[test]
fn test_draft_rejects_blank_name() {
    let mut d = draft();
    d.name = "   ".to_string();
    assert!(d.validate().is_err());
}

#[test]
fn test_draft_rejects_nonpositive_amounts() {
    let mut d = draft();
    d.target_amount = dec!(0);
    assert!(d.validate().is_err());

    let mut d = draft();
    d.initial_deposit = dec!(-5);
    assert!(d.validate().is_err());
}

#[test]
fn test_draft_rejects_zero_duration() {
    let mut d = draft();
    d.duration_days = 0;
    assert!(d.validate().is_err());
}

#[test]
fn test_draft_into_metadata_stamps_creation_instant() {
    let meta = draft().into_metadata(1_700_000_000_000);
    assert_eq!(meta.created_at, 1_700_000_000_000);
    assert_eq!(meta.duration_days, 30);
    assert_eq!(meta.name, "Vacation Fund");
}

// ==================== Metadata extension ====================

#[test]
fn test_metadata_extended_adds_days() {
    let meta = draft().into_metadata(1_700_000_000_000);
    let extended = meta.extended(15);
    assert_eq!(extended.duration_days, 45);
    assert_eq!(extended.created_at, meta.created_at);
    assert_eq!(extended.name, meta.name);
}

// ==================== Goal helpers ====================

fn goal(current: rust_decimal::Decimal, target: rust_decimal::Decimal) -> Goal {
    let created = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    Goal {
        id: "0x3333333333333333333333333333333333333333".to_string(),
        name: "Test".to_string(),
        target_amount: target,
        current_amount: current,
        target_date: created + Duration::days(30),
        created_date: created,
        is_active: true,
        protocol: Protocol::Aave,
    }
}

#[test]
fn test_progress_percent_caps_at_hundred() {
    assert_eq!(goal(dec!(75), dec!(150)).progress_percent(), dec!(50));
    assert_eq!(goal(dec!(300), dec!(150)).progress_percent(), dec!(100));
}

#[test]
fn test_days_remaining_rounds_up_and_floors_at_zero() {
    let g = goal(dec!(10), dec!(100));
    let half_day_before = g.target_date - Duration::hours(12);
    assert_eq!(g.days_remaining(half_day_before), 1);

    let ten_days_before = g.target_date - Duration::days(10);
    assert_eq!(g.days_remaining(ten_days_before), 10);

    let after = g.target_date + Duration::days(2);
    assert_eq!(g.days_remaining(after), 0);
}

#[test]
fn test_is_due() {
    let g = goal(dec!(10), dec!(100));
    assert!(!g.is_due(g.target_date - Duration::seconds(1)));
    assert!(g.is_due(g.target_date));
}
