use anyhow::anyhow;
use chrono::NaiveDate;
use regex::Regex;

use super::escape_markup;

/// Exercise description as accepted for storage: trimmed, non-empty,
/// markup escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl TryFrom<&str> for Description {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            anyhow::bail!("Description cannot be empty");
        }
        Ok(Self(escape_markup(trimmed)))
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Description {
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Exercise duration in whole minutes, strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(i32);

impl TryFrom<&str> for Duration {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            anyhow::bail!("Duration cannot be empty");
        }
        let duration_re = Regex::new(r"^[1-9]\d*$").unwrap();
        if !duration_re.is_match(trimmed) {
            anyhow::bail!("Invalid duration");
        }
        let minutes = trimmed.parse::<i32>().map_err(|_| anyhow!("Invalid duration"))?;
        Ok(Self(minutes))
    }
}

impl Duration {
    pub fn minutes(self) -> i32 {
        self.0
    }
}

/// Calendar date of an exercise, parsed from `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseDate(NaiveDate);

impl TryFrom<&str> for ExerciseDate {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let parsed = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|_| anyhow!("Invalid date"))?;
        Ok(Self(parsed))
    }
}

impl ExerciseDate {
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }
}
