use rust_decimal::Decimal;
use std::str::FromStr;

use crate::ledger::ItemDraft;

/// Parse `name amount [YYYY-MM-DD]`. The name may contain spaces; the amount
/// accepts either `.` or `,` as decimal separator.
/// e.g. `"Cuota gimnasio 35,50 2025-03-10"`
pub(crate) fn parse_item_input(input: &str) -> Result<ItemDraft, String> {
    const USAGE: &str = "Use: <name> <amount> [YYYY-MM-DD]";
    let mut tokens: Vec<&str> = input.split_whitespace().collect();

    let date = match tokens.last() {
        Some(last) if chrono::NaiveDate::parse_from_str(last, "%Y-%m-%d").is_ok() => {
            let d = last.to_string();
            tokens.pop();
            Some(d)
        }
        _ => None,
    };

    let Some(amount_str) = tokens.pop() else {
        return Err(USAGE.to_string());
    };
    let amount = parse_amount(amount_str).ok_or_else(|| format!("Invalid amount: {amount_str}. {USAGE}"))?;

    Ok(ItemDraft {
        name: tokens.join(" "),
        amount,
        date,
    })
}

/// Parse a user-entered amount, tolerating a currency symbol and a comma
/// decimal separator.
pub(crate) fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .trim_start_matches(['$', '€'])
        .replace(',', ".");
    Decimal::from_str(&cleaned).ok()
}

/// `"2025-03-07"` → `"07/03"`. Anything else is shown as-is.
pub(crate) fn display_date(date: &str) -> String {
    match chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%d/%m").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page.saturating_sub(1));
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}
