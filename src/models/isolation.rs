//! Isolation record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Isolation record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Isolation {
    pub id: i32,
    pub location_id: Option<String>,
    pub clinic_visit_token: Option<String>,
    pub emp_no: String,
    #[serde(rename = "type")]
    pub isolation_type: Option<String>,
    pub employee_name: String,
    pub emirates_id: String,
    pub insurance_id: Option<String>,
    pub mobile_number: Option<String>,
    pub tr_location: Option<String>,
    pub isolated_in: Option<String>,
    pub isolation_reason: Option<String>,
    pub nationality: Option<String>,
    pub sl_upto: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub current_status: Option<String>,
    pub remarks: Option<String>,
    pub created_by: i32,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create or update isolation request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IsolationPayload {
    pub location_id: Option<String>,
    pub clinic_visit_token: Option<String>,
    pub emp_no: Option<String>,
    #[serde(rename = "type")]
    pub isolation_type: Option<String>,
    pub employee_name: Option<String>,
    pub emirates_id: Option<String>,
    pub insurance_id: Option<String>,
    pub mobile_number: Option<String>,
    pub tr_location: Option<String>,
    pub isolated_in: Option<String>,
    pub isolation_reason: Option<String>,
    pub nationality: Option<String>,
    pub sl_upto: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub current_status: Option<String>,
    pub remarks: Option<String>,
}

impl IsolationPayload {
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

/// Query parameters for isolation lists
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct IsolationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub location_id: Option<String>,
    pub emp_no: Option<String>,
    pub current_status: Option<String>,
    pub tr_location: Option<String>,
}
