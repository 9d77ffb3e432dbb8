//! H&I inpatient admission model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};

use super::de;

/// Visit by a technician to an admitted employee
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianVisit {
    pub technician_feedback: Option<String>,
    pub physician_feedback: Option<String>,
}

/// Inpatient admission follow-up record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IpAdmission {
    pub id: i32,
    pub emp_no: String,
    pub date_of_admission: Option<NaiveDate>,
    pub hospital_name: Option<String>,
    pub tr_location: Option<String>,
    /// Hospital record this case was opened from
    pub hospital_case: Option<i32>,
    pub hi_managers: Option<String>,
    pub admission_mode: Option<String>,
    pub admission_type: Option<String>,
    pub insurance_approval_status: Option<String>,
    pub treatment_undergone: Option<String>,
    pub im_visit_status: Option<String>,
    pub no_of_visits: Option<i32>,
    #[schema(value_type = Vec<TechnicianVisit>)]
    pub technician_visits: Json<Vec<TechnicianVisit>>,
    pub treatment_location: Option<String>,
    pub place_of_location: Option<String>,
    pub post_recovery_location: Option<String>,
    pub fit_to_travel: Option<bool>,
    pub post_rehab_required: Option<bool>,
    pub duration_of_rehab: Option<i32>,
    pub follow_up_required: Option<bool>,
    pub rehab_extension: Option<bool>,
    pub rehab_extension_duration: Option<i32>,
    pub member_resume_to_work: Option<NaiveDate>,
    pub technician_feedback_form: Option<String>,
    #[serde(rename = "dischargedHI")]
    pub discharged_hi: Option<bool>,
    #[serde(rename = "dodHI")]
    pub dod_hi: Option<NaiveDate>,
    pub source: Option<String>,
    pub case_type_change: Option<String>,
    pub discharge_comments: Option<String>,
    pub case_type_change_comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create or update request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IpAdmissionPayload {
    pub emp_no: Option<String>,
    #[serde(default, deserialize_with = "de::optional_date")]
    pub date_of_admission: Option<NaiveDate>,
    pub hospital_name: Option<String>,
    pub tr_location: Option<String>,
    pub hospital_case: Option<i32>,
    pub hi_managers: Option<String>,
    pub admission_mode: Option<String>,
    pub admission_type: Option<String>,
    pub insurance_approval_status: Option<String>,
    pub treatment_undergone: Option<String>,
    pub im_visit_status: Option<String>,
    pub no_of_visits: Option<i32>,
    pub technician_visits: Option<Vec<TechnicianVisit>>,
    pub treatment_location: Option<String>,
    pub place_of_location: Option<String>,
    pub post_recovery_location: Option<String>,
    #[serde(default, deserialize_with = "de::optional_bool_like")]
    #[schema(value_type = Option<bool>)]
    pub fit_to_travel: Option<bool>,
    #[serde(default, deserialize_with = "de::optional_bool_like")]
    #[schema(value_type = Option<bool>)]
    pub post_rehab_required: Option<bool>,
    pub duration_of_rehab: Option<i32>,
    #[serde(default, deserialize_with = "de::optional_bool_like")]
    #[schema(value_type = Option<bool>)]
    pub follow_up_required: Option<bool>,
    #[serde(default, deserialize_with = "de::optional_bool_like")]
    #[schema(value_type = Option<bool>)]
    pub rehab_extension: Option<bool>,
    pub rehab_extension_duration: Option<i32>,
    #[serde(default, deserialize_with = "de::optional_date")]
    pub member_resume_to_work: Option<NaiveDate>,
    pub technician_feedback_form: Option<String>,
    #[serde(rename = "dischargedHI", default, deserialize_with = "de::optional_bool_like")]
    #[schema(value_type = Option<bool>)]
    pub discharged_hi: Option<bool>,
    #[serde(rename = "dodHI", default, deserialize_with = "de::optional_date")]
    pub dod_hi: Option<NaiveDate>,
    pub source: Option<String>,
    pub case_type_change: Option<String>,
    pub discharge_comments: Option<String>,
    pub case_type_change_comments: Option<String>,
}

fn trim_opt(field: &mut Option<String>) {
    if let Some(s) = field.take() {
        let t = s.trim();
        if !t.is_empty() {
            *field = Some(t.to_string());
        }
    }
}

impl IpAdmissionPayload {
    /// Trim free-text fields, drop blanks and uppercase the employee number
    pub fn normalize(&mut self) {
        for field in [
            &mut self.emp_no,
            &mut self.hospital_name,
            &mut self.tr_location,
            &mut self.hi_managers,
            &mut self.admission_mode,
            &mut self.admission_type,
            &mut self.insurance_approval_status,
            &mut self.treatment_undergone,
            &mut self.im_visit_status,
            &mut self.treatment_location,
            &mut self.place_of_location,
            &mut self.post_recovery_location,
            &mut self.technician_feedback_form,
            &mut self.source,
            &mut self.case_type_change,
            &mut self.discharge_comments,
            &mut self.case_type_change_comments,
        ] {
            trim_opt(field);
        }
        if let Some(emp) = self.emp_no.as_mut() {
            *emp = emp.to_uppercase();
        }
    }

    /// First required field of a manual entry that is missing
    pub fn first_missing_manual_field(&self) -> Option<&'static str> {
        let checks: [(&'static str, bool); 7] = [
            ("empNo", self.emp_no.is_some()),
            ("hiManagers", self.hi_managers.is_some()),
            ("caseTypeChange", self.case_type_change.is_some()),
            ("hospitalName", self.hospital_name.is_some()),
            ("dateOfAdmission", self.date_of_admission.is_some()),
            ("treatmentUndergone", self.treatment_undergone.is_some()),
            ("technicianVisits", self.technician_visits.is_some()),
        ];
        checks
            .into_iter()
            .find(|(_, present)| !present)
            .map(|(name, _)| name)
    }
}

/// Query parameters for IP admission lists
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct IpAdmissionQuery {
    pub page: Option<i64>,
    /// Clamped to 1..=100
    pub limit: Option<i64>,
    pub hi_managers: Option<String>,
    pub admission_mode: Option<String>,
    pub admission_type: Option<String>,
    pub insurance_approval_status: Option<String>,
    pub im_visit_status: Option<String>,
    pub source: Option<String>,
    pub case_type_change: Option<String>,
    #[serde(rename = "dischargedHI")]
    pub discharged_hi: Option<bool>,
    pub follow_up_required: Option<bool>,
    pub hospital_case: Option<i32>,
    /// Case-insensitive match over the free-text fields
    pub search: Option<String>,
    /// memberResumeToWork from (YYYY-MM-DD)
    pub member_resume_from: Option<String>,
    /// memberResumeToWork to (YYYY-MM-DD)
    pub member_resume_to: Option<String>,
    /// dodHI from (YYYY-MM-DD)
    pub dod_hi_from: Option<String>,
    /// dodHI to (YYYY-MM-DD)
    pub dod_hi_to: Option<String>,
}

/// IP admission created from a hospital case, with the patient's name
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IpAdmissionWithName {
    #[serde(flatten)]
    pub admission: IpAdmission,
    pub employee_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_drops_blanks() {
        let mut p: IpAdmissionPayload = serde_json::from_str(
            r#"{"empNo": " ab1 ", "hiManagers": "   ", "dischargedHI": "true"}"#,
        )
        .unwrap();
        p.normalize();
        assert_eq!(p.emp_no.as_deref(), Some("AB1"));
        assert_eq!(p.hi_managers, None);
        assert_eq!(p.discharged_hi, Some(true));
    }

    #[test]
    fn test_first_missing_manual_field() {
        let mut p = IpAdmissionPayload {
            emp_no: Some("E1".into()),
            hi_managers: Some("Ops".into()),
            case_type_change: Some("None".into()),
            hospital_name: Some("Rashid".into()),
            ..Default::default()
        };
        assert_eq!(p.first_missing_manual_field(), Some("dateOfAdmission"));
        p.date_of_admission = NaiveDate::from_ymd_opt(2025, 1, 2);
        p.treatment_undergone = Some("Surgery".into());
        assert_eq!(p.first_missing_manual_field(), Some("technicianVisits"));
        p.technician_visits = Some(vec![]);
        assert_eq!(p.first_missing_manual_field(), None);
    }
}
