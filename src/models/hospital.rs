//! Hospital admission model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};

use super::de;

/// Follow-up note on a hospitalised employee
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct HospitalFollowUp {
    #[serde(default, deserialize_with = "de::optional_date")]
    pub date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

/// Hospital admission record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: i32,
    pub location_id: Option<String>,
    pub clinic_visit_token: Option<String>,
    pub emp_no: String,
    pub employee_name: String,
    pub emirates_id: String,
    pub insurance_id: Option<String>,
    pub tr_location: Option<String>,
    pub mobile_number: Option<String>,
    pub hospital_name: Option<String>,
    pub date_of_admission: Option<NaiveDate>,
    pub nature_of_case: Option<String>,
    pub case_category: Option<String>,
    pub primary_diagnosis: Option<String>,
    pub secondary_diagnosis: Vec<String>,
    /// Admitted, Discharge, ...
    pub status: Option<String>,
    pub discharge_summary_received: bool,
    pub date_of_discharge: Option<NaiveDate>,
    pub days_hospitalized: Option<i32>,
    #[schema(value_type = Vec<HospitalFollowUp>)]
    pub follow_up: Json<Vec<HospitalFollowUp>>,
    pub fitness_status: Option<String>,
    pub isolation_required: bool,
    pub final_remarks: Option<String>,
    pub created_by: i32,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create or update hospital request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HospitalPayload {
    pub location_id: Option<String>,
    pub clinic_visit_token: Option<String>,
    pub emp_no: Option<String>,
    pub employee_name: Option<String>,
    pub emirates_id: Option<String>,
    pub insurance_id: Option<String>,
    pub tr_location: Option<String>,
    pub mobile_number: Option<String>,
    pub hospital_name: Option<String>,
    #[serde(default, deserialize_with = "de::optional_date")]
    pub date_of_admission: Option<NaiveDate>,
    pub nature_of_case: Option<String>,
    pub case_category: Option<String>,
    pub primary_diagnosis: Option<String>,
    pub secondary_diagnosis: Option<Vec<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de::optional_bool_like")]
    #[schema(value_type = Option<bool>)]
    pub discharge_summary_received: Option<bool>,
    #[serde(default, deserialize_with = "de::optional_date")]
    pub date_of_discharge: Option<NaiveDate>,
    pub days_hospitalized: Option<i32>,
    pub follow_up: Option<Vec<HospitalFollowUp>>,
    pub fitness_status: Option<String>,
    #[serde(default, deserialize_with = "de::optional_bool_like")]
    #[schema(value_type = Option<bool>)]
    pub isolation_required: Option<bool>,
    pub final_remarks: Option<String>,
}

impl HospitalPayload {
    /// Required fields for a new admission that are absent or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("empNo", &self.emp_no),
            ("employeeName", &self.employee_name),
            ("emiratesId", &self.emirates_id),
        ]
        .into_iter()
        .filter(|(_, v)| v.as_deref().map(str::trim).map_or(true, str::is_empty))
        .map(|(name, _)| name)
        .collect()
    }

    pub fn normalize(&mut self) {
        if let Some(emp) = self.emp_no.as_mut() {
            *emp = emp.trim().to_uppercase();
        }
        if let Some(name) = self.employee_name.as_mut() {
            *name = name.trim().to_string();
        }
    }
}

/// Query parameters for hospital lists
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HospitalQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub location_id: Option<String>,
    pub emp_no: Option<String>,
    pub emirates_id: Option<String>,
    pub status: Option<String>,
    /// Admission date from (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Admission date to (YYYY-MM-DD)
    pub end_date: Option<String>,
}

/// Lookup of an admission by employee and day
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HospitalEmployeeQuery {
    pub emp_no: Option<String>,
    pub date: Option<String>,
}
