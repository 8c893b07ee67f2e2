use anyhow::Result;
use tracing::{info, warn};

use crate::db::Database;
use crate::models::Session;

pub(crate) const DEMO_EMAIL: &str = "prueba@prueba.com";
pub(crate) const DEMO_PASSWORD: &str = "prueba";

/// Check the fixed demo credentials and store a session on success.
pub(crate) fn login(db: &Database, email: &str, password: &str) -> Result<bool> {
    if email.trim() != DEMO_EMAIL || password != DEMO_PASSWORD {
        warn!(email = email.trim(), "Rejected login");
        return Ok(false);
    }
    db.save_session(&Session::new(DEMO_EMAIL.to_string()))?;
    info!(email = DEMO_EMAIL, "Logged in");
    Ok(true)
}

pub(crate) fn logout(db: &Database) -> Result<()> {
    db.clear_session()?;
    info!("Logged out");
    Ok(())
}

pub(crate) fn is_authenticated(db: &Database) -> Result<bool> {
    Ok(db.get_session()?.is_some_and(|s| s.is_authenticated))
}

pub(crate) fn current_user(db: &Database) -> Result<Option<String>> {
    Ok(db
        .get_session()?
        .filter(|s| s.is_authenticated)
        .map(|s| s.email))
}
