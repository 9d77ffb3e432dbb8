//! Data models for the clinic server

pub mod employee;
pub mod feedback;
pub mod hospital;
pub mod ip_admission;
pub mod isolation;
pub mod patient;
pub mod profession;
pub mod report;
pub mod user;
pub mod visit;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

// Re-export commonly used types
pub use employee::EmployeeRecord;
pub use feedback::MemberFeedback;
pub use hospital::Hospital;
pub use ip_admission::IpAdmission;
pub use isolation::Isolation;
pub use patient::Patient;
pub use user::{LocationScope, Role, User, UserClaims};
pub use visit::ClinicVisit;

/// Pagination metadata returned with list responses
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Resolve raw page/limit query values (both clamped to at least 1)
pub fn page_params(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).max(1);
    (page, limit)
}

/// Parse a calendar date given as `YYYY-MM-DD`, an RFC 3339 timestamp,
/// or `DD/MM/YYYY`
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Some(prefix) = s.get(..10) {
        if let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(d);
        }
    }
    NaiveDate::parse_from_str(s, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d-%m-%Y"))
        .ok()
}

/// Lenient deserializers for client payloads
pub mod de {
    use chrono::NaiveDate;
    use serde::{de::IgnoredAny, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolLike {
        Bool(bool),
        Text(String),
        Other(IgnoredAny),
    }

    impl BoolLike {
        fn is_true(&self) -> bool {
            match self {
                BoolLike::Bool(b) => *b,
                BoolLike::Text(s) => s.trim().eq_ignore_ascii_case("true"),
                BoolLike::Other(_) => false,
            }
        }
    }

    /// Only `true` and `"true"` (any case) are true; numbers, objects and
    /// any other string are false
    pub fn optional_bool_like<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<BoolLike>::deserialize(deserializer)?;
        Ok(raw.map(|b| b.is_true()))
    }

    /// Date as `YYYY-MM-DD` or a full timestamp; blank strings become `None`
    pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_date(s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct FlagAndDay {
        #[serde(default, deserialize_with = "de::optional_bool_like")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "de::optional_date")]
        day: Option<NaiveDate>,
    }

    #[test]
    fn test_bool_like() {
        let p: FlagAndDay = serde_json::from_str(r#"{"flag": "TRUE"}"#).unwrap();
        assert_eq!(p.flag, Some(true));
        let p: FlagAndDay = serde_json::from_str(r#"{"flag": true}"#).unwrap();
        assert_eq!(p.flag, Some(true));
        let p: FlagAndDay = serde_json::from_str(r#"{"flag": "yes"}"#).unwrap();
        assert_eq!(p.flag, Some(false));
        let p: FlagAndDay = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.flag, None);
        let p: FlagAndDay = serde_json::from_str(r#"{"flag": null}"#).unwrap();
        assert_eq!(p.flag, None);
    }

    #[test]
    fn test_bool_like_numbers_are_false() {
        let p: FlagAndDay = serde_json::from_str(r#"{"flag": 1}"#).unwrap();
        assert_eq!(p.flag, Some(false));
        let p: FlagAndDay = serde_json::from_str(r#"{"flag": 1.0}"#).unwrap();
        assert_eq!(p.flag, Some(false));
        let p: FlagAndDay = serde_json::from_str(r#"{"flag": {"value": true}}"#).unwrap();
        assert_eq!(p.flag, Some(false));
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 5);
        assert_eq!(parse_date("2025-12-05"), expected);
        assert_eq!(parse_date("2025-12-05T00:00:00.000Z"), expected);
        assert_eq!(parse_date("05/12/2025"), expected);
        assert_eq!(parse_date("not a date"), None);

        let p: FlagAndDay = serde_json::from_str(r#"{"day": ""}"#).unwrap();
        assert_eq!(p.day, None);
        assert!(serde_json::from_str::<FlagAndDay>(r#"{"day": "32/13/2025"}"#).is_err());
    }

    #[test]
    fn test_page_params() {
        assert_eq!(page_params(None, None, 20), (1, 20));
        assert_eq!(page_params(Some(0), Some(-5), 20), (1, 1));
        assert_eq!(page_params(Some(3), Some(50), 20), (3, 50));
    }
}
