//! Member feedback call model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::de;

/// Follow-up call made to an employee after a visit
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberFeedback {
    pub id: i32,
    /// Employee number the call was about
    pub employee_id: Option<String>,
    /// Clinic visit the call relates to
    pub clinic_id: Option<i32>,
    pub manager: Option<String>,
    pub date_of_call: Option<NaiveDate>,
    pub was_treatment_effective: Option<bool>,
    pub technician_feedback: Option<String>,
    pub was_treatment_effective_1: Option<bool>,
    pub technician_feedback_1: Option<String>,
    pub ref_req_to_specialist: Option<bool>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Create feedback request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedback {
    pub employee_id: Option<String>,
    pub clinic_id: Option<i32>,
    pub manager: Option<String>,
    #[serde(default, deserialize_with = "de::optional_date")]
    pub date_of_call: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::optional_bool_like")]
    #[schema(value_type = Option<bool>)]
    pub was_treatment_effective: Option<bool>,
    pub technician_feedback: Option<String>,
    #[serde(default, deserialize_with = "de::optional_bool_like")]
    #[schema(value_type = Option<bool>)]
    pub was_treatment_effective_1: Option<bool>,
    pub technician_feedback_1: Option<String>,
    #[serde(default, deserialize_with = "de::optional_bool_like")]
    #[schema(value_type = Option<bool>)]
    pub ref_req_to_specialist: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FeedbackQuery {
    pub employee_id: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
