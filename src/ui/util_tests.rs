#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── parse_item_input ──────────────────────────────────────────

#[test]
fn test_parse_item_name_and_amount() {
    let draft = parse_item_input("Comida 200").unwrap();
    assert_eq!(draft.name, "Comida");
    assert_eq!(draft.amount, dec!(200));
    assert_eq!(draft.date, None);
}

#[test]
fn test_parse_item_multi_word_name_with_date() {
    let draft = parse_item_input("Cuota gimnasio 35,50 2025-03-10").unwrap();
    assert_eq!(draft.name, "Cuota gimnasio");
    assert_eq!(draft.amount, dec!(35.50));
    assert_eq!(draft.date.as_deref(), Some("2025-03-10"));
}

#[test]
fn test_parse_item_currency_symbol() {
    assert_eq!(parse_item_input("Cine €12.5").unwrap().amount, dec!(12.5));
    assert_eq!(parse_item_input("Taxi $8").unwrap().amount, dec!(8));
}

#[test]
fn test_parse_item_bad_amount() {
    let err = parse_item_input("Cine doce").unwrap_err();
    assert!(err.starts_with("Invalid amount: doce"));
}

#[test]
fn test_parse_item_empty() {
    assert!(parse_item_input("").is_err());
    assert!(parse_item_input("   ").is_err());
}

#[test]
fn test_parse_item_amount_only_leaves_empty_name() {
    // Name validation happens in the ledger
    let draft = parse_item_input("50").unwrap();
    assert_eq!(draft.name, "");
}

#[test]
fn test_parse_item_invalid_date_is_not_a_date() {
    // 2025-02-30 is not a date, so it is read as the amount and fails
    assert!(parse_item_input("Renta 900 2025-02-30").is_err());
}

// ── display_date ──────────────────────────────────────────────

#[test]
fn test_display_date() {
    assert_eq!(display_date("2025-03-07"), "07/03");
    assert_eq!(display_date(""), "");
    assert_eq!(display_date("mañana"), "mañana");
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_and_exact() {
    assert_eq!(truncate("hola", 10), "hola");
    assert_eq!(truncate("hola", 4), "hola");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("Alquiler / Hipoteca", 8), "Alquile…");
}

#[test]
fn test_truncate_zero_and_one() {
    assert_eq!(truncate("hola", 0), "");
    assert_eq!(truncate("hola", 1), "…");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("Préstamo coche", 6), "Prést…");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (9, 7);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!(index, 9);
}

#[test]
fn test_scroll_up_pulls_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
    let (mut index, mut scroll) = (0, 0);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_top_and_bottom() {
    let (mut index, mut scroll) = (4, 2);
    scroll_to_bottom(&mut index, &mut scroll, 20, 5);
    assert_eq!((index, scroll), (19, 15));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
    // Empty list leaves the cursor alone
    scroll_to_bottom(&mut index, &mut scroll, 0, 5);
    assert_eq!((index, scroll), (0, 0));
}
