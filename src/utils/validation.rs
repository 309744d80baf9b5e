use crate::utils::error::{RosterError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub const ALLOWED_EMAIL_DOMAINS: [&str; 3] = ["yandex.ru", "gmail.com", "icloud.com"];
pub const MIN_COURSE: i32 = 1;
pub const MAX_COURSE: i32 = 6;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 最早允許的出生日期 (1992-01-01)
pub fn earliest_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1992, 1, 1).unwrap_or_default()
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]{3,}@(yandex\.ru|gmail\.com|icloud\.com)$")
            .expect("email pattern is a valid regex")
    })
}

pub fn validate_email(field_name: &str, email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(RosterError::validation(field_name, "email cannot be empty"));
    }

    if !email_regex().is_match(email) {
        return Err(RosterError::validation(
            field_name,
            format!(
                "invalid email format or domain '{}'. Allowed domains: {}",
                email,
                ALLOWED_EMAIL_DOMAINS.join(", ")
            ),
        ));
    }

    Ok(())
}

pub fn validate_birth_date(field_name: &str, date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date < earliest_birth_date() {
        return Err(RosterError::validation(
            field_name,
            "birth date cannot be earlier than 01.01.1992",
        ));
    }
    if date > today {
        return Err(RosterError::validation(
            field_name,
            "birth date cannot be later than the current date",
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RosterError::validation(
            field_name,
            "value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(RosterError::validation(
            field_name,
            format!("value {} must be between {} and {}", value, min, max),
        ));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(RosterError::Config {
            message: format!("{}: path cannot be empty", field_name),
        });
    }

    if path.contains('\0') {
        return Err(RosterError::Config {
            message: format!("{}: path contains null bytes", field_name),
        });
    }

    Ok(())
}
