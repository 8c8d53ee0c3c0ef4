use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// FHIR date, dateTime and instant share one lexical space: a year with
// optional month, day, and time-with-zone suffixes.
static DATE_TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4})(-(0[1-9]|1[0-2])(-(0[1-9]|[12]\d|3[01])(T([01]\d|2[0-3]):[0-5]\d(:([0-5]\d|60)(\.\d+)?)?(Z|[+-]((0\d|1[0-3]):[0-5]\d|14:00))?)?)?)?$",
    )
    .expect("date-time pattern is valid")
});

/// A FHIR date, dateTime or instant kept in its original lexical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FhirDateTime(String);

impl FhirDateTime {
    pub fn parse(text: &str) -> Result<Self, String> {
        Self::try_from(text.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar date, with missing month or day taken as the first.
    pub fn date(&self) -> Option<NaiveDate> {
        let captures = DATE_TIME_PATTERN.captures(&self.0)?;
        let year = captures.get(1)?.as_str().parse().ok()?;
        let month = captures
            .get(3)
            .map_or(Some(1), |m| m.as_str().parse().ok())?;
        let day = captures
            .get(5)
            .map_or(Some(1), |d| d.as_str().parse().ok())?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Full timestamp; `None` for partial dates and zoneless times.
    pub fn datetime(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.0).ok()
    }
}

impl TryFrom<String> for FhirDateTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if DATE_TIME_PATTERN.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(format!("'{value}' is not a valid FHIR date/dateTime"))
        }
    }
}

impl From<FhirDateTime> for String {
    fn from(value: FhirDateTime) -> Self {
        value.0
    }
}

impl fmt::Display for FhirDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
