//! Stand-in login. Credentials are never checked; any non-empty input
//! produces a user record. There are no security properties here.

use crate::errors::TrackerError;
use crate::models::{User, time_based_id};
use chrono::NaiveDateTime;
use tracing::info;

fn require(value: &str, err: TrackerError) -> Result<&str, TrackerError> {
    let value = value.trim();
    if value.is_empty() { Err(err) } else { Ok(value) }
}

pub fn login(email: &str, password: &str) -> Result<User, TrackerError> {
    let email = require(email, TrackerError::MissingCredentials)?;
    require(password, TrackerError::MissingCredentials)?;
    info!(email, "mock login");
    Ok(User {
        id: "1".into(),
        name: "Demo User".into(),
        email: email.to_string(),
    })
}

pub fn signup(
    name: &str,
    email: &str,
    password: &str,
    now: NaiveDateTime,
) -> Result<User, TrackerError> {
    let name = require(name, TrackerError::MissingName)?;
    let email = require(email, TrackerError::MissingCredentials)?;
    require(password, TrackerError::MissingCredentials)?;
    info!(email, "mock signup");
    Ok(User {
        id: time_based_id(now, |_| false),
        name: name.to_string(),
        email: email.to_string(),
    })
}
