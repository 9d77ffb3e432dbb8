//! Clinic visit model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};

use super::de;

/// Medicine dispensed during a visit
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub name: Option<String>,
    pub course: Option<String>,
    #[serde(default, deserialize_with = "de::optional_date")]
    pub expiry_date: Option<NaiveDate>,
}

/// Follow-up visit after a referral
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpVisit {
    #[serde(default, deserialize_with = "de::optional_date")]
    pub visit_date: Option<NaiveDate>,
    pub visit_remarks: Option<String>,
}

/// Clinic visit record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClinicVisit {
    pub id: i32,
    pub location_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub emp_no: Option<String>,
    pub employee_name: Option<String>,
    pub date_of_joining: Option<String>,
    pub eligibility_for_sick_leave: Option<bool>,
    pub emirates_id: Option<String>,
    pub insurance_id: Option<String>,
    pub tr_location: Option<String>,
    pub mobile_number: Option<String>,
    pub nature_of_case: Option<String>,
    pub case_category: Option<String>,
    pub nurse_assessment: Vec<String>,
    pub symptom_duration: Option<String>,
    pub temperature: Option<String>,
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<String>,
    pub others: Option<String>,
    /// Visit token, `[EL-]<LOC>[XT]-<DDMM>-<SEQ4>`
    pub token_no: Option<String>,
    pub sent_to: Option<String>,
    pub provider_name: Option<String>,
    pub doctor_name: Option<String>,
    pub primary_diagnosis: Option<String>,
    pub secondary_diagnosis: Vec<String>,
    #[schema(value_type = Vec<Medicine>)]
    pub medicines: Json<Vec<Medicine>>,
    pub sick_leave_status: Option<String>,
    pub sick_leave_start_date: Option<NaiveDate>,
    pub sick_leave_end_date: Option<NaiveDate>,
    pub total_sick_leave_days: Option<String>,
    pub remarks: Option<String>,
    pub referral: Option<bool>,
    pub referral_code: Option<String>,
    pub referral_type: Option<String>,
    pub referred_to_hospital: Option<String>,
    pub visit_date_referral: Option<NaiveDate>,
    pub specialist_type: Option<String>,
    pub doctor_name_referral: Option<String>,
    pub investigation_reports: Option<String>,
    pub primary_diagnosis_referral: Option<String>,
    pub secondary_diagnosis_referral: Vec<String>,
    pub nurse_remarks_referral: Option<String>,
    pub insurance_approval_requested: bool,
    pub follow_up_required: bool,
    #[schema(value_type = Vec<FollowUpVisit>)]
    pub follow_up_visits: Json<Vec<FollowUpVisit>>,
    /// OPEN, CLOSED, ...
    pub visit_status: Option<String>,
    pub final_remarks: Option<String>,
    pub ip_admission_required: bool,
    pub created_by: i32,
    /// Name of the creating user
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClinicVisit {
    /// Whoever the visit was handed to: provider, doctor or destination
    pub fn provider(&self) -> Option<String> {
        [&self.provider_name, &self.doctor_name, &self.sent_to]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .cloned()
    }
}

/// Create or update visit request
///
/// Every field is optional on the wire; creation checks the required ones
/// itself so the error can list all missing fields at once.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitPayload {
    /// Ignored when the caller has an assigned location
    pub location_id: Option<String>,
    #[serde(default, deserialize_with = "de::optional_date")]
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub emp_no: Option<String>,
    pub employee_name: Option<String>,
    pub date_of_joining: Option<String>,
    /// Boolean or boolean-like string
    #[serde(default, deserialize_with = "de::optional_bool_like")]
    #[schema(value_type = Option<bool>)]
    pub eligibility_for_sick_leave: Option<bool>,
    pub emirates_id: Option<String>,
    pub insurance_id: Option<String>,
    pub tr_location: Option<String>,
    pub mobile_number: Option<String>,
    pub nature_of_case: Option<String>,
    pub case_category: Option<String>,
    pub nurse_assessment: Option<Vec<String>>,
    pub symptom_duration: Option<String>,
    pub temperature: Option<String>,
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<String>,
    pub others: Option<String>,
    /// Generated when absent
    pub token_no: Option<String>,
    pub sent_to: Option<String>,
    /// Older clients send `sendTo`; it wins over `sentTo` when both are set
    pub send_to: Option<String>,
    pub provider_name: Option<String>,
    pub doctor_name: Option<String>,
    pub primary_diagnosis: Option<String>,
    pub secondary_diagnosis: Option<Vec<String>>,
    pub medicines: Option<Vec<Medicine>>,
    pub sick_leave_status: Option<String>,
    #[serde(default, deserialize_with = "de::optional_date")]
    pub sick_leave_start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::optional_date")]
    pub sick_leave_end_date: Option<NaiveDate>,
    pub total_sick_leave_days: Option<String>,
    pub remarks: Option<String>,
    #[serde(default, deserialize_with = "de::optional_bool_like")]
    #[schema(value_type = Option<bool>)]
    pub referral: Option<bool>,
    pub referral_code: Option<String>,
    pub referral_type: Option<String>,
    pub referred_to_hospital: Option<String>,
    #[serde(default, deserialize_with = "de::optional_date")]
    pub visit_date_referral: Option<NaiveDate>,
    pub specialist_type: Option<String>,
    pub doctor_name_referral: Option<String>,
    pub investigation_reports: Option<String>,
    pub primary_diagnosis_referral: Option<String>,
    pub secondary_diagnosis_referral: Option<Vec<String>>,
    pub nurse_remarks_referral: Option<String>,
    pub insurance_approval_requested: Option<bool>,
    pub follow_up_required: Option<bool>,
    pub follow_up_visits: Option<Vec<FollowUpVisit>>,
    pub visit_status: Option<String>,
    pub final_remarks: Option<String>,
    pub ip_admission_required: Option<bool>,
}

impl VisitPayload {
    /// Names of required intake fields that are absent or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        fn blank(v: &Option<String>) -> bool {
            v.as_deref().map(str::trim).map_or(true, str::is_empty)
        }

        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push("date");
        }
        let text_fields: [(&'static str, &Option<String>); 8] = [
            ("time", &self.time),
            ("empNo", &self.emp_no),
            ("employeeName", &self.employee_name),
            ("emiratesId", &self.emirates_id),
            ("trLocation", &self.tr_location),
            ("mobileNumber", &self.mobile_number),
            ("natureOfCase", &self.nature_of_case),
            ("caseCategory", &self.case_category),
        ];
        for (name, value) in text_fields {
            if blank(value) {
                missing.push(name);
            }
        }
        missing
    }

    /// Whether this payload marks the visit as referred
    pub fn is_referral(&self) -> bool {
        self.referral.unwrap_or(false)
            || self
                .referred_to_hospital
                .as_deref()
                .is_some_and(|h| !h.trim().is_empty())
    }

    pub fn has_referral_code(&self) -> bool {
        self.referral_code
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }

    /// Uppercase the fields stored in upper case
    pub fn normalize(&mut self) {
        if let Some(send_to) = self.send_to.take().filter(|s| !s.trim().is_empty()) {
            self.sent_to = Some(send_to);
        }
        if let Some(emp) = self.emp_no.as_mut() {
            *emp = emp.trim().to_uppercase();
        }
        if let Some(status) = self.visit_status.as_mut() {
            *status = status.trim().to_uppercase();
        }
    }
}

/// Query parameters for visit lists
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VisitQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub emirates_id: Option<String>,
    pub emp_no: Option<String>,
    pub visit_status: Option<String>,
    /// Requested location (subject to role scoping)
    pub location_id: Option<String>,
    /// Filter by visit date from (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Filter by visit date to (YYYY-MM-DD)
    pub end_date: Option<String>,
    pub token_no: Option<String>,
}

/// Query parameters for visit search
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VisitSearchQuery {
    pub emp_no: Option<String>,
    /// Calendar day (YYYY-MM-DD)
    pub date: Option<String>,
}

/// Simple page/limit query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Employee details looked up by visit token
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInfo {
    pub emp: Option<String>,
    pub name: Option<String>,
    pub emirates_id: Option<String>,
    pub insurance_id: Option<String>,
    pub mobile_number: Option<String>,
    pub tr_location: Option<String>,
}

impl From<ClinicVisit> for EmployeeInfo {
    fn from(v: ClinicVisit) -> Self {
        Self {
            emp: v.emp_no,
            name: v.employee_name,
            emirates_id: v.emirates_id,
            insurance_id: v.insurance_id,
            mobile_number: v.mobile_number,
            tr_location: v.tr_location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_lists_every_gap() {
        let payload: VisitPayload = serde_json::from_str(
            r#"{"date": "2025-12-05", "empNo": "e001", "employeeName": "  ", "trLocation": "SAJJA"}"#,
        )
        .unwrap();
        assert_eq!(
            payload.missing_fields(),
            vec![
                "time",
                "employeeName",
                "emiratesId",
                "mobileNumber",
                "natureOfCase",
                "caseCategory"
            ]
        );
    }

    #[test]
    fn test_send_to_alias_and_bool_like() {
        let mut payload: VisitPayload = serde_json::from_str(
            r#"{"sendTo": "External Provider", "eligibilityForSickLeave": "True"}"#,
        )
        .unwrap();
        payload.normalize();
        assert_eq!(payload.sent_to.as_deref(), Some("External Provider"));
        assert_eq!(payload.eligibility_for_sick_leave, Some(true));
    }

    #[test]
    fn test_send_to_and_sent_to_together() {
        let mut payload: VisitPayload = serde_json::from_str(
            r#"{"sendTo": "External Provider", "sentTo": "Clinic Doctor"}"#,
        )
        .unwrap();
        payload.normalize();
        assert_eq!(payload.sent_to.as_deref(), Some("External Provider"));
        assert_eq!(payload.send_to, None);

        let mut payload: VisitPayload =
            serde_json::from_str(r#"{"sendTo": " ", "sentTo": "Clinic Doctor"}"#).unwrap();
        payload.normalize();
        assert_eq!(payload.sent_to.as_deref(), Some("Clinic Doctor"));
    }

    #[test]
    fn test_referral_detection() {
        let mut p = VisitPayload::default();
        assert!(!p.is_referral());
        p.referred_to_hospital = Some("Rashid Hospital".into());
        assert!(p.is_referral());
        p.referred_to_hospital = None;
        p.referral = Some(true);
        assert!(p.is_referral());
    }

    #[test]
    fn test_normalize() {
        let mut p = VisitPayload {
            emp_no: Some(" ab12cd ".into()),
            visit_status: Some("open".into()),
            ..Default::default()
        };
        p.normalize();
        assert_eq!(p.emp_no.as_deref(), Some("AB12CD"));
        assert_eq!(p.visit_status.as_deref(), Some("OPEN"));
    }
}
