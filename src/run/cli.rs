use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::currency::{Currency, CurrencyFormatter};
use crate::db::Database;
use crate::ledger;
use crate::models::{MonthKey, Theme, LOAN_CARD_ID};

pub(crate) fn as_cli(args: &[String], db: &Database) -> Result<()> {
    let rest = &args[2..];
    match args[1].as_str() {
        "login" => cli_login(rest, db),
        "logout" => {
            crate::auth::logout(db)?;
            println!("Logged out");
            Ok(())
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budgetcards {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        cmd @ ("show" | "summary" | "s" | "history" | "next" | "carry" | "export"
        | "currency" | "theme" | "reset") => {
            require_login(db)?;
            match cmd {
                "show" => cli_show(rest, db),
                "summary" | "s" => cli_summary(rest, db),
                "history" => cli_history(rest, db),
                "next" => cli_next(rest, db),
                "carry" => cli_carry(rest, db),
                "export" => cli_export(rest, db),
                "currency" => cli_currency(rest, db),
                "theme" => cli_theme(rest, db),
                _ => cli_reset(rest, db),
            }
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("BudgetCards — monthly budget cards with carry-over");
    println!();
    println!("Usage: budgetcards [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  login <email> <password>      Start a session");
    println!("  logout                        End the session");
    println!("  show [YYYY-MM]                Print a month's cards and items");
    println!("  summary [YYYY-MM]             Print monthly totals and distribution");
    println!("  history [N]                   Income/expenses for the last N months (default 6)");
    println!("  next <YYYY-MM> [--copy]       Open a month, copying the current one if absent");
    println!("  carry [YYYY-MM]               Copy a month over the following one");
    println!("  export [path]                 Export a month's items to CSV");
    println!("    --month <YYYY-MM>           Month to export (default: current)");
    println!("  currency [CODE]               Show or set the display currency");
    println!("  theme [light|dark]            Show or set the TUI theme");
    println!("  reset --yes                   Delete all stored data");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn require_login(db: &Database) -> Result<()> {
    if !crate::auth::is_authenticated(db)? {
        anyhow::bail!("Not logged in. Run: budgetcards login <email> <password>");
    }
    Ok(())
}

/// Optional month argument, defaulting to the current month.
fn month_arg(args: &[String]) -> Result<MonthKey> {
    match args.first().filter(|a| !a.starts_with('-')) {
        Some(a) => Ok(a.parse::<MonthKey>()?),
        None => Ok(MonthKey::current()),
    }
}

fn formatter(db: &Database) -> Result<CurrencyFormatter> {
    Ok(CurrencyFormatter::new(db.get_config()?.currency))
}

fn cli_login(args: &[String], db: &Database) -> Result<()> {
    let [email, password] = args else {
        anyhow::bail!("Usage: budgetcards login <email> <password>");
    };
    if crate::auth::login(db, email, password)? {
        println!("Logged in as {email}");
        Ok(())
    } else {
        anyhow::bail!("Invalid email or password")
    }
}

fn cli_show(args: &[String], db: &Database) -> Result<()> {
    let month = month_arg(args)?;
    let record = db.get_or_create_month(month)?;
    let fmt = formatter(db)?;

    println!("BudgetCards — {month}");
    if let Some(source) = record.copied_from {
        println!("(copied from {source})");
    }
    for card in &record.cards {
        println!();
        println!(
            "{} [{}]  {}",
            card.title,
            card.card_type,
            fmt.format(ledger::card_total(card))
        );
        println!("{}", "─".repeat(48));
        if card.items.is_empty() {
            println!("  (no items)");
        }
        for item in &card.items {
            let check = if item.completed { "x" } else { " " };
            println!(
                "  [{check}] {:<24} {:>14}  {}",
                item.name,
                fmt.format(item.amount),
                item.date
            );
        }
    }
    Ok(())
}

fn cli_summary(args: &[String], db: &Database) -> Result<()> {
    let month = month_arg(args)?;
    let record = db.get_or_create_month(month)?;
    let months = db.all_months()?;
    let fmt = formatter(db)?;

    let totals = ledger::month_totals(&record);
    let saved = ledger::cumulative_savings(&months, month);

    println!("BudgetCards — {month}");
    println!("{}", "─".repeat(40));
    println!("  Income:        {}", fmt.format(totals.income));
    println!("  Expenses:      {}", fmt.format(totals.expenses));
    println!("  Balance:       {}", fmt.format(totals.balance));
    println!("  Saved to date: {}", fmt.format(saved));
    if months.range(..=month).any(|(_, r)| r.find_card(LOAN_CARD_ID).is_some()) {
        let loan = ledger::remaining_loan(&months, month, LOAN_CARD_ID);
        println!("  Loan left:     {}", fmt.format(loan));
    }
    println!(
        "  Done:          {}/{}",
        record.completed_count(),
        record.item_count()
    );

    let distribution = ledger::expense_distribution(&record);
    if !distribution.is_empty() {
        println!();
        println!("Expenses by card:");
        for (title, amount) in &distribution {
            println!("  {title:<24} {}", fmt.format(*amount));
        }
    }
    Ok(())
}

fn cli_history(args: &[String], db: &Database) -> Result<()> {
    let n = match args.first() {
        Some(a) => a
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("Invalid month count: {a}"))?,
        None => ledger::HISTORY_MONTHS,
    };
    let months = db.all_months()?;
    let fmt = formatter(db)?;

    let history = ledger::historical_summaries(&months, n);
    if history.is_empty() {
        println!("No months stored");
        return Ok(());
    }
    println!("{:<9} {:>16} {:>16} {:>16}", "Month", "Income", "Expenses", "Balance");
    println!("{}", "─".repeat(60));
    for s in &history {
        println!(
            "{:<9} {:>16} {:>16} {:>16}",
            s.month.to_string(),
            fmt.format(s.income),
            fmt.format(s.expenses),
            fmt.format(s.balance)
        );
    }
    Ok(())
}

fn cli_next(args: &[String], db: &Database) -> Result<()> {
    let current = MonthKey::current();
    let target = match args.first().filter(|a| !a.starts_with('-')) {
        Some(a) => a.parse::<MonthKey>()?,
        None => current.next(),
    };
    let copy = args.iter().any(|a| a == "--copy");

    let plan = ledger::plan_navigation(db, current, target)?;
    if plan.needs_copy_prompt && !copy {
        println!("{target} has not been started yet. Pass --copy to start it from {current}");
        println!("Starting it from the default cards");
    }
    let record = ledger::navigate(db, current, target, copy)?;
    if plan.needs_copy_prompt && copy {
        println!("Copied {current} into {target}");
    } else {
        println!("Opened {target} ({} cards)", record.cards.len());
    }
    Ok(())
}

fn cli_carry(args: &[String], db: &Database) -> Result<()> {
    let month = month_arg(args)?;
    match ledger::carry_forward(db, month)? {
        Some(_) => println!("Copied {month} into {}", month.next()),
        None => println!("Nothing to copy from {month}"),
    }
    Ok(())
}

fn cli_export(args: &[String], db: &Database) -> Result<()> {
    let month = match args.windows(2).find(|w| w[0] == "--month") {
        Some(w) => w[1].parse::<MonthKey>()?,
        None => MonthKey::current(),
    };

    // Output path is the first non-flag argument
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| crate::export::default_export_path(month));

    let Some(record) = db.get_month(month)? else {
        println!("No data for {month}");
        return Ok(());
    };
    let count = crate::export::export_month_csv(&record, Path::new(&output_path))?;
    if count == 0 {
        println!("No items for {month}");
    } else {
        println!("Exported {count} items to {output_path}");
    }
    Ok(())
}

fn cli_currency(args: &[String], db: &Database) -> Result<()> {
    let mut config = db.get_config()?;
    let Some(code) = args.first() else {
        println!("{} ({})", config.currency.code(), config.currency.name());
        return Ok(());
    };
    let mut fmt = CurrencyFormatter::new(config.currency);
    if !fmt.set_currency(code) {
        let codes: Vec<&str> = Currency::all().iter().map(|c| c.code()).collect();
        anyhow::bail!("Unknown currency: {code}. Available: {}", codes.join(", "));
    }
    config.currency = fmt.current();
    db.save_config(&config)?;
    println!("Currency set to {} ({})", config.currency.code(), config.currency.name());
    Ok(())
}

fn cli_theme(args: &[String], db: &Database) -> Result<()> {
    let mut config = db.get_config()?;
    let Some(arg) = args.first() else {
        println!("{}", config.theme);
        return Ok(());
    };
    let theme = Theme::parse(arg)
        .ok_or_else(|| anyhow::anyhow!("Unknown theme: {arg}. Use light or dark"))?;
    config.theme = theme;
    db.save_config(&config)?;
    println!("Theme set to {theme}");
    Ok(())
}

fn cli_reset(args: &[String], db: &Database) -> Result<()> {
    if !args.iter().any(|a| a == "--yes") {
        anyhow::bail!("This deletes every month, the settings and the session. Re-run with --yes");
    }
    db.reset_all()?;
    info!("All data reset from CLI");
    println!("All data deleted");
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
