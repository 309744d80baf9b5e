use crate::utils::error::Result;
use crate::utils::validation::{self, Validate, MAX_COURSE, MIN_COURSE};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// 學生記錄
///
/// Name, course and group fields are plain data and may be assigned in any
/// order, so a record can sit in an incomplete state while it is being filled
/// in. `birth_date` and `email` only change through their checked setters.
/// Records deserialized from JSON skip those checks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StudentRecord {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub course: i32,
    pub group: String,
    #[serde(with = "birth_date_format")]
    birth_date: NaiveDate,
    email: String,
}

impl StudentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record through the checked setters and requires `is_valid()`.
    pub fn try_new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        middle_name: impl Into<String>,
        course: i32,
        group: impl Into<String>,
        birth_date: NaiveDate,
        email: &str,
    ) -> Result<Self> {
        let mut record = Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            middle_name: middle_name.into(),
            course,
            group: group.into(),
            ..Self::default()
        };
        record.set_birth_date(birth_date)?;
        record.set_email(email)?;
        record.validate()?;
        Ok(record)
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_birth_date(&mut self, date: NaiveDate) -> Result<()> {
        self.set_birth_date_as_of(date, Local::now().date_naive())
    }

    /// Same as `set_birth_date`, with an explicit notion of "today".
    pub fn set_birth_date_as_of(&mut self, date: NaiveDate, today: NaiveDate) -> Result<()> {
        validation::validate_birth_date("birth_date", date, today)?;
        self.birth_date = date;
        Ok(())
    }

    pub fn set_email(&mut self, email: &str) -> Result<()> {
        validation::validate_email("email", email)?;
        self.email = email.to_string();
        Ok(())
    }

    /// Bulk validity check: text fields non-blank and course in 1..=6.
    /// Email pattern and birth-date window are not re-checked here.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl Validate for StudentRecord {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("last_name", &self.last_name)?;
        validation::validate_non_empty_string("first_name", &self.first_name)?;
        validation::validate_non_empty_string("middle_name", &self.middle_name)?;
        validation::validate_range("course", self.course, MIN_COURSE, MAX_COURSE)?;
        validation::validate_non_empty_string("group", &self.group)?;
        validation::validate_non_empty_string("email", &self.email)?;
        Ok(())
    }
}

/// `BirthDate` 的 JSON 格式：寫出 `YYYY-MM-DD`，讀取時也接受 ISO 日期時間
mod birth_date_format {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid BirthDate '{}'", raw))
        })
    }

    fn parse(raw: &str) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(raw, FORMAT) {
            return Some(date);
        }
        if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
            return Some(date_time.date_naive());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|dt| dt.date())
    }
}
