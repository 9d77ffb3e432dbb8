//! Employee master directory (patients)

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Six upper-case letters or digits
pub static EMP_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{6}$").expect("valid empId pattern"));

/// 10 to 15 digits, no separators
pub static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,15}$").expect("valid mobile pattern"));

/// Directory entry for an employee who may visit the clinic
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i32,
    pub emp_id: String,
    pub patient_name: String,
    pub emirates_id: Option<String>,
    pub insurance_id: Option<String>,
    pub tr_location: Option<String>,
    pub mobile_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create or update patient request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    #[validate(regex(path = *EMP_ID_RE, message = "empId must be 6 letters or digits"))]
    pub emp_id: Option<String>,
    #[serde(alias = "PatientName")]
    #[validate(length(min = 1, max = 255))]
    pub patient_name: Option<String>,
    pub emirates_id: Option<String>,
    pub insurance_id: Option<String>,
    pub tr_location: Option<String>,
    #[validate(regex(path = *MOBILE_RE, message = "not a valid mobile number"))]
    pub mobile_number: Option<String>,
}

impl PatientPayload {
    /// Upper-case the empId and trim the name
    pub fn normalize(&mut self) {
        if let Some(emp) = self.emp_id.as_mut() {
            *emp = emp.trim().to_uppercase();
        }
        if let Some(name) = self.patient_name.as_mut() {
            *name = name.trim().to_string();
        }
        if let Some(mobile) = self.mobile_number.as_mut() {
            *mobile = mobile.trim().to_string();
        }
    }

    /// Names of fields a new entry cannot do without
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map(str::trim).map_or(true, str::is_empty);
        let mut missing = Vec::new();
        if blank(&self.emp_id) {
            missing.push("empId");
        }
        if blank(&self.patient_name) {
            missing.push("patientName");
        }
        missing
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PatientQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Free text matched against name, empId and Emirates ID
    pub q: Option<String>,
    pub tr_location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(emp_id: &str, mobile: Option<&str>) -> PatientPayload {
        let mut p = PatientPayload {
            emp_id: Some(emp_id.to_string()),
            patient_name: Some(" Rahul Nair ".to_string()),
            mobile_number: mobile.map(String::from),
            ..Default::default()
        };
        p.normalize();
        p
    }

    #[test]
    fn test_emp_id_is_uppercased_then_checked() {
        let p = payload(" ab12cd ", None);
        assert_eq!(p.emp_id.as_deref(), Some("AB12CD"));
        assert_eq!(p.patient_name.as_deref(), Some("Rahul Nair"));
        assert!(p.validate().is_ok());

        for bad in ["AB12C", "AB12CDE", "AB-12C", ""] {
            assert!(payload(bad, None).validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_mobile_number_digits() {
        assert!(payload("EMP001", Some("0501234567")).validate().is_ok());
        assert!(payload("EMP001", Some("971501234567890")).validate().is_ok());
        for bad in ["050123456", "9715012345678901", "+971501234567", "050 123 4567"] {
            assert!(payload("EMP001", Some(bad)).validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_missing_fields() {
        let p: PatientPayload = serde_json::from_str(r#"{"PatientName": "  "}"#).unwrap();
        assert_eq!(p.missing_fields(), vec!["empId", "patientName"]);
        let p: PatientPayload =
            serde_json::from_str(r#"{"empId": "emp001", "patientName": "Asha"}"#).unwrap();
        assert!(p.missing_fields().is_empty());
    }
}
