//! Value types that convert to and from their text form.
//!
//! Each type serializes as a single string so it can travel through
//! url-encoded forms and JSON alike.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Pattern used to render and parse [`FormattedDateTime`].
pub const DATE_TIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Conversion failures between text and typed values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("expected 'ip:port', got '{0}'")]
    IpPort(String),

    #[error("expected a grouped number like '10,000', got '{0}'")]
    Number(String),

    #[error("expected 'yyyy-MM-dd HH:mm:ss', got '{0}'")]
    DateTime(String),
}

/// Host and port pair written as `ip:port`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpPort {
    pub ip: String,
    pub port: u16,
}

impl IpPort {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        IpPort {
            ip: ip.into(),
            port,
        }
    }
}

impl FromStr for IpPort {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ip, port) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| ConversionError::IpPort(s.to_string()))?;
        if ip.is_empty() {
            return Err(ConversionError::IpPort(s.to_string()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| ConversionError::IpPort(s.to_string()))?;
        Ok(IpPort::new(ip, port))
    }
}

impl fmt::Display for IpPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

impl TryFrom<String> for IpPort {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IpPort> for String {
    fn from(value: IpPort) -> Self {
        value.to_string()
    }
}

/// Integer rendered with comma thousands separators (`10,000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupedNumber(pub i64);

impl FromStr for GroupedNumber {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (sign, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, trimmed),
        };

        // Groups after the first must be exactly three digits
        let mut groups = digits.split(',');
        let first = groups.next().unwrap_or_default();
        let valid_first = (!first.is_empty() && first.len() <= 3) || !digits.contains(',');
        let valid_rest = groups.all(|g| g.len() == 3);
        if !valid_first || !valid_rest {
            return Err(ConversionError::Number(s.to_string()));
        }

        let plain: String = digits.chars().filter(|c| *c != ',').collect();
        if plain.is_empty() || !plain.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConversionError::Number(s.to_string()));
        }
        plain
            .parse::<i64>()
            .map(|n| GroupedNumber(sign * n))
            .map_err(|_| ConversionError::Number(s.to_string()))
    }
}

impl fmt::Display for GroupedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        if self.0 < 0 {
            write!(f, "-{}", grouped)
        } else {
            f.write_str(&grouped)
        }
    }
}

impl TryFrom<String> for GroupedNumber {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GroupedNumber> for String {
    fn from(value: GroupedNumber) -> Self {
        value.to_string()
    }
}

/// Local timestamp rendered as `yyyy-MM-dd HH:mm:ss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormattedDateTime(pub NaiveDateTime);

impl FromStr for FormattedDateTime {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s.trim(), DATE_TIME_PATTERN)
            .map(FormattedDateTime)
            .map_err(|_| ConversionError::DateTime(s.to_string()))
    }
}

impl fmt::Display for FormattedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_TIME_PATTERN))
    }
}

impl TryFrom<String> for FormattedDateTime {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FormattedDateTime> for String {
    fn from(value: FormattedDateTime) -> Self {
        value.to_string()
    }
}

/// Form carrying a single [`IpPort`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IpPortForm {
    #[schema(value_type = String, example = "127.0.0.1:8080")]
    pub ip_port: IpPort,
}

/// Form carrying a grouped number and a formatted timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormatterForm {
    #[schema(value_type = String, example = "10,000")]
    pub number: GroupedNumber,
    #[schema(value_type = String, example = "2024-01-31 13:45:00")]
    pub local_date_time: FormattedDateTime,
}

/// Plain values rendered through their converters.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConverterView {
    /// Integer converted to text without grouping
    pub number: String,
    #[schema(value_type = String, example = "127.0.0.1:8080")]
    pub ip_port: IpPort,
}
