#![allow(clippy::unwrap_used)]

use super::*;
use crate::currency::Currency;
use rust_decimal_macros::dec;

fn key(s: &str) -> MonthKey {
    s.parse().unwrap()
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_open_on_disk_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.db");
    {
        let db = Database::open(&path).unwrap();
        db.get_or_create_month(key("2025-03")).unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert!(db.has_month(key("2025-03")).unwrap());
}

#[test]
fn test_schema_version_recorded() {
    let db = Database::open_in_memory().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

// ── Raw key-value ─────────────────────────────────────────────

#[test]
fn test_raw_set_get_overwrite_remove() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.get_raw("k").unwrap(), None);
    db.set_raw("k", "1").unwrap();
    db.set_raw("k", "2").unwrap();
    assert_eq!(db.get_raw("k").unwrap().as_deref(), Some("2"));
    db.remove_raw("k").unwrap();
    assert_eq!(db.get_raw("k").unwrap(), None);
}

// ── Months ────────────────────────────────────────────────────

#[test]
fn test_get_month_missing() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_month(key("2025-03")).unwrap().is_none());
    assert!(db.all_months().unwrap().is_empty());
}

#[test]
fn test_get_or_create_persists_default() {
    let db = Database::open_in_memory().unwrap();
    let created = db.get_or_create_month(key("2025-03")).unwrap();
    assert_eq!(created.cards.len(), 5);
    assert!(created.last_modified.is_some());

    let stored = db.get_month(key("2025-03")).unwrap().unwrap();
    assert_eq!(stored, created);
}

#[test]
fn test_get_or_create_returns_existing() {
    let db = Database::open_in_memory().unwrap();
    let mut record = db.get_or_create_month(key("2025-03")).unwrap();
    record.cards[0].items.clear();
    db.put_month(key("2025-03"), &mut record).unwrap();

    let again = db.get_or_create_month(key("2025-03")).unwrap();
    assert!(again.cards[0].items.is_empty());
}

#[test]
fn test_put_month_stamps_last_modified() {
    let db = Database::open_in_memory().unwrap();
    let mut record = MonthRecord::default_for(key("2025-03"));
    assert!(record.last_modified.is_none());
    db.put_month(key("2025-03"), &mut record).unwrap();
    let stamp = record.last_modified.clone().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
}

#[test]
fn test_put_month_keeps_other_months() {
    let db = Database::open_in_memory().unwrap();
    db.get_or_create_month(key("2025-01")).unwrap();
    db.get_or_create_month(key("2025-02")).unwrap();
    let mut march = MonthRecord::default_for(key("2025-03"));
    db.put_month(key("2025-03"), &mut march).unwrap();
    assert_eq!(db.all_months().unwrap().len(), 3);
}

#[test]
fn test_all_months_ordered() {
    let db = Database::open_in_memory().unwrap();
    for k in ["2025-10", "2024-12", "2025-02"] {
        db.get_or_create_month(key(k)).unwrap();
    }
    let keys: Vec<String> = db
        .all_months()
        .unwrap()
        .keys()
        .map(|k| k.to_string())
        .collect();
    assert_eq!(keys, vec!["2024-12", "2025-02", "2025-10"]);
}

#[test]
fn test_amounts_survive_storage() {
    let db = Database::open_in_memory().unwrap();
    let mut record = MonthRecord::default_for(key("2025-03"));
    record.cards[0].items[0].amount = dec!(1234.56);
    db.put_month(key("2025-03"), &mut record).unwrap();
    let stored = db.get_month(key("2025-03")).unwrap().unwrap();
    assert_eq!(stored.cards[0].items[0].amount, dec!(1234.56));
}

// ── Malformed data ────────────────────────────────────────────

#[test]
fn test_malformed_budget_data_reads_empty() {
    let db = Database::open_in_memory().unwrap();
    db.set_raw(BUDGET_DATA_KEY, "{not json").unwrap();
    assert!(db.all_months().unwrap().is_empty());
    assert!(db.get_month(key("2025-03")).unwrap().is_none());
    // A write replaces the unreadable document
    db.get_or_create_month(key("2025-03")).unwrap();
    assert_eq!(db.all_months().unwrap().len(), 1);
}

#[test]
fn test_malformed_month_entry_skipped() {
    let db = Database::open_in_memory().unwrap();
    db.get_or_create_month(key("2025-03")).unwrap();
    let mut raw: serde_json::Value =
        serde_json::from_str(&db.get_raw(BUDGET_DATA_KEY).unwrap().unwrap()).unwrap();
    raw["2025-04"] = serde_json::json!({"cards": "oops"});
    raw["garbage"] = serde_json::json!({});
    db.set_raw(BUDGET_DATA_KEY, &raw.to_string()).unwrap();

    let months = db.all_months().unwrap();
    assert_eq!(months.len(), 1);
    assert!(months.contains_key(&key("2025-03")));
    assert!(db.get_month(key("2025-04")).unwrap().is_none());
}

// ── Copy ──────────────────────────────────────────────────────

#[test]
fn test_copy_month_to() {
    let db = Database::open_in_memory().unwrap();
    let mut jan = db.get_or_create_month(key("2025-01")).unwrap();
    jan.cards[0].items[0].completed = true;
    db.put_month(key("2025-01"), &mut jan).unwrap();

    let copy = db
        .copy_month_to(key("2025-01"), key("2025-02"))
        .unwrap()
        .unwrap();
    assert_eq!(copy.copied_from, Some(key("2025-01")));
    assert!(!copy.cards[0].items[0].completed);
    assert_eq!(db.get_month(key("2025-02")).unwrap().unwrap(), copy);
}

#[test]
fn test_copy_month_to_missing_source() {
    let db = Database::open_in_memory().unwrap();
    let result = db.copy_month_to(key("2025-01"), key("2025-02")).unwrap();
    assert!(result.is_none());
    assert!(!db.has_month(key("2025-02")).unwrap());
}

// ── Config & session ──────────────────────────────────────────

#[test]
fn test_config_defaults_and_save() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.get_config().unwrap(), AppConfig::default());

    let config = AppConfig {
        currency: Currency::Cop,
        theme: Theme::Dark,
    };
    db.save_config(&config).unwrap();
    assert_eq!(db.get_config().unwrap(), config);
}

#[test]
fn test_malformed_config_falls_back() {
    let db = Database::open_in_memory().unwrap();
    db.set_raw(CONFIG_KEY, r#"{"currency":"XXX"}"#).unwrap();
    assert_eq!(db.get_config().unwrap(), AppConfig::default());
}

#[test]
fn test_partial_config_fills_defaults() {
    let db = Database::open_in_memory().unwrap();
    db.set_raw(CONFIG_KEY, r#"{"theme":"dark"}"#).unwrap();
    let config = db.get_config().unwrap();
    assert_eq!(config.currency, Currency::Eur);
    assert_eq!(config.theme, Theme::Dark);
}

#[test]
fn test_session_save_and_clear() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_session().unwrap().is_none());
    db.save_session(&Session::new("a@b.c".into())).unwrap();
    assert_eq!(db.get_session().unwrap().unwrap().email, "a@b.c");
    db.clear_session().unwrap();
    assert!(db.get_session().unwrap().is_none());
}

#[test]
fn test_reset_all() {
    let db = Database::open_in_memory().unwrap();
    db.get_or_create_month(key("2025-03")).unwrap();
    db.save_config(&AppConfig {
        currency: Currency::Usd,
        theme: Theme::Dark,
    })
    .unwrap();
    db.save_session(&Session::new("a@b.c".into())).unwrap();

    db.reset_all().unwrap();
    assert!(db.all_months().unwrap().is_empty());
    assert_eq!(db.get_config().unwrap(), AppConfig::default());
    assert!(db.get_session().unwrap().is_none());
}
