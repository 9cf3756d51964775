//! String format recognizers (`email`, `date-time`, `ip`).
use std::collections::BTreeSet;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ConfigError;
use crate::render::SpecVersion;

/// A recognizer the user can switch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatInferrer {
    Email,
    DateTime,
    Ip,
}

/// A `format` keyword value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Format {
    Email,
    DateTime,
    Date,
    Time,
    Ipv4,
    Ipv6,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Email => "email",
            Format::DateTime => "date-time",
            Format::Date => "date",
            Format::Time => "time",
            Format::Ipv4 => "ipv4",
            Format::Ipv6 => "ipv6",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Pragmatic address shape: local part, one `@`, dotted domain with a 2+ char TLD.
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    )
    .expect("email regex")
});

// RFC 3339 full-time; the clock itself is validated by chrono.
static FULL_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:[Zz]|[+-]\d{2}:\d{2})$").expect("time regex")
});

impl FormatInferrer {
    pub const VALUES: &'static [&'static str] = &["email", "date-time", "ip"];

    pub fn infer(self, s: &str, version: SpecVersion) -> Option<Format> {
        match self {
            FormatInferrer::Email => EMAIL.is_match(s).then_some(Format::Email),
            FormatInferrer::DateTime => {
                if DateTime::parse_from_rfc3339(s).is_ok() {
                    return Some(Format::DateTime);
                }
                if !version.has_date_and_time_formats() {
                    return None;
                }
                if is_full_date(s) {
                    Some(Format::Date)
                } else if is_full_time(s) {
                    Some(Format::Time)
                } else {
                    None
                }
            }
            FormatInferrer::Ip => {
                if s.parse::<Ipv4Addr>().is_ok() {
                    Some(Format::Ipv4)
                } else if s.parse::<Ipv6Addr>().is_ok() {
                    Some(Format::Ipv6)
                } else {
                    None
                }
            }
        }
    }
}

impl FromStr for FormatInferrer {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(FormatInferrer::Email),
            "date-time" => Ok(FormatInferrer::DateTime),
            "ip" => Ok(FormatInferrer::Ip),
            other => Err(ConfigError::unknown("format inferrer", other, Self::VALUES)),
        }
    }
}

fn is_full_date(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn is_full_time(s: &str) -> bool {
    FULL_TIME.is_match(s) && DateTime::parse_from_rfc3339(&format!("1970-01-01T{s}")).is_ok()
}

/// Every format the enabled inferrers recognize in `s`.
pub fn formats_of(s: &str, inferrers: &[FormatInferrer], version: SpecVersion) -> BTreeSet<Format> {
    inferrers.iter().filter_map(|i| i.infer(s, version)).collect()
}
