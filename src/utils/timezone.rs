use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::error::AppError;

/// Zone used to render unix timestamps. Defaults to UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Timezone {
    Local,
    Named(Tz),
}

impl Default for Timezone {
    fn default() -> Self {
        Timezone::Named(chrono_tz::UTC)
    }
}

impl Timezone {
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = value else {
            return Ok(Timezone::default());
        };
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("utc")
            || trimmed.eq_ignore_ascii_case("z")
        {
            return Ok(Timezone::default());
        }
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Timezone::Local);
        }
        Tz::from_str(trimmed)
            .map(Timezone::Named)
            .map_err(|_| AppError::InvalidTimezone {
                input: trimmed.to_string(),
            })
    }

    /// Format a unix timestamp (seconds). Out-of-range values yield `None`.
    pub(crate) fn format_unix(self, secs: i64, fmt: &str) -> Option<String> {
        let utc = DateTime::<Utc>::from_timestamp(secs, 0)?;
        let text = match self {
            Timezone::Local => utc.with_timezone(&Local).format(fmt).to_string(),
            Timezone::Named(tz) => utc.with_timezone(&tz).format(fmt).to_string(),
        };
        Some(text)
    }
}
