#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn fmt(currency: Currency, val: rust_decimal::Decimal) -> String {
    CurrencyFormatter::new(currency).format(val)
}

// ── Currency ──────────────────────────────────────────────────

#[test]
fn test_parse_codes() {
    assert_eq!(Currency::parse("usd"), Some(Currency::Usd));
    assert_eq!(Currency::parse(" EUR "), Some(Currency::Eur));
    assert_eq!(Currency::parse("PEN"), Some(Currency::Pen));
    assert_eq!(Currency::parse("GBP"), None);
    assert_eq!(Currency::parse(""), None);
}

#[test]
fn test_all_codes_roundtrip() {
    assert_eq!(Currency::all().len(), 7);
    for c in Currency::all() {
        assert_eq!(Currency::parse(c.code()), Some(*c));
    }
}

#[test]
fn test_default_is_euro() {
    assert_eq!(Currency::default(), Currency::Eur);
    assert_eq!(CurrencyFormatter::default().current(), Currency::Eur);
}

#[test]
fn test_serde_uses_code() {
    assert_eq!(serde_json::to_string(&Currency::Clp).unwrap(), "\"CLP\"");
    let c: Currency = serde_json::from_str("\"MXN\"").unwrap();
    assert_eq!(c, Currency::Mxn);
}

// ── format ────────────────────────────────────────────────────

#[test]
fn test_format_usd() {
    assert_eq!(fmt(Currency::Usd, dec!(1234.56)), "$1,234.56");
    assert_eq!(fmt(Currency::Usd, dec!(0)), "$0.00");
    assert_eq!(fmt(Currency::Usd, dec!(1234567.8)), "$1,234,567.80");
}

#[test]
fn test_format_euro_separators() {
    assert_eq!(fmt(Currency::Eur, dec!(1234.5)), "€1.234,50");
    assert_eq!(fmt(Currency::Eur, dec!(999)), "€999,00");
}

#[test]
fn test_format_latin_american_locales() {
    assert_eq!(fmt(Currency::Cop, dec!(2500000)), "$2.500.000,00");
    assert_eq!(fmt(Currency::Mxn, dec!(2500.75)), "$2,500.75");
    assert_eq!(fmt(Currency::Pen, dec!(10)), "S/10.00");
}

#[test]
fn test_format_negative_sign_before_symbol() {
    assert_eq!(fmt(Currency::Eur, dec!(-5)), "-€5,00");
    assert_eq!(fmt(Currency::Usd, dec!(-1000)), "-$1,000.00");
}

#[test]
fn test_format_rounds_to_cents() {
    assert_eq!(fmt(Currency::Usd, dec!(1.005)), "$1.00");
    assert_eq!(fmt(Currency::Usd, dec!(1.239)), "$1.24");
    // Tiny negatives round to zero without a sign
    assert_eq!(fmt(Currency::Usd, dec!(-0.001)), "$0.00");
}

// ── set_currency ──────────────────────────────────────────────

#[test]
fn test_set_currency_known_code() {
    let mut f = CurrencyFormatter::default();
    assert!(f.set_currency("usd"));
    assert_eq!(f.current(), Currency::Usd);
    assert_eq!(f.symbol(), "$");
}

#[test]
fn test_set_currency_unknown_code_ignored() {
    let mut f = CurrencyFormatter::new(Currency::Ars);
    assert!(!f.set_currency("XYZ"));
    assert_eq!(f.current(), Currency::Ars);
}
