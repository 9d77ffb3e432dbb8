//! Employee date-of-joining and leave metadata

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::de;

/// Employee record with recent leave balances
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: i32,
    pub emp_no: String,
    pub doj: Option<NaiveDate>,
    /// Sick leave days, last 3 months
    pub sl: Option<f64>,
    /// Annual leave days, last 6 months
    pub al: Option<f64>,
    /// Emergency leave days, last 6 months
    pub el: Option<f64>,
    /// Loss of pay days, last 3 months
    pub lop: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeeRecord {
    /// Eligible only when no leave of any kind was taken in the window
    pub fn is_eligible(&self) -> bool {
        [self.sl, self.al, self.el, self.lop]
            .into_iter()
            .all(|v| v.unwrap_or(0.0) == 0.0)
    }
}

/// Create or update employee record request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    #[validate(length(min = 1, max = 64))]
    pub emp_no: Option<String>,
    #[serde(default, deserialize_with = "de::optional_date")]
    pub doj: Option<NaiveDate>,
    #[validate(range(min = 0.0))]
    pub sl: Option<f64>,
    #[validate(range(min = 0.0))]
    pub al: Option<f64>,
    #[validate(range(min = 0.0))]
    pub el: Option<f64>,
    #[validate(range(min = 0.0))]
    pub lop: Option<f64>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub emp_no: Option<String>,
    /// Date of joining from (YYYY-MM-DD)
    pub doj_from: Option<String>,
    /// Date of joining to (YYYY-MM-DD)
    pub doj_to: Option<String>,
}

/// Leave eligibility answer for an employee
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaveEligibility {
    pub emp_no: String,
    pub doj: Option<NaiveDate>,
    /// `eligible` or `Not eligible`
    pub status: String,
    pub sl: f64,
    pub al: f64,
    pub el: f64,
    pub lop: f64,
}

impl From<EmployeeRecord> for LeaveEligibility {
    fn from(r: EmployeeRecord) -> Self {
        let status = if r.is_eligible() { "eligible" } else { "Not eligible" };
        Self {
            status: status.to_string(),
            sl: r.sl.unwrap_or(0.0),
            al: r.al.unwrap_or(0.0),
            el: r.el.unwrap_or(0.0),
            lop: r.lop.unwrap_or(0.0),
            emp_no: r.emp_no,
            doj: r.doj,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sl: Option<f64>, al: Option<f64>, el: Option<f64>, lop: Option<f64>) -> EmployeeRecord {
        EmployeeRecord {
            id: 1,
            emp_no: "E100".into(),
            doj: NaiveDate::from_ymd_opt(2020, 3, 1),
            sl,
            al,
            el,
            lop,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_all_zero_is_eligible() {
        let e: LeaveEligibility = record(Some(0.0), None, Some(0.0), None).into();
        assert_eq!(e.status, "eligible");
        assert_eq!(e.al, 0.0);
    }

    #[test]
    fn test_any_leave_is_not_eligible() {
        for r in [
            record(Some(1.0), None, None, None),
            record(None, Some(0.5), None, None),
            record(None, None, Some(2.0), None),
            record(None, None, None, Some(3.0)),
        ] {
            let e: LeaveEligibility = r.into();
            assert_eq!(e.status, "Not eligible");
        }
    }

    #[test]
    fn test_payload_validation() {
        let bad = EmployeePayload {
            emp_no: Some(String::new()),
            sl: Some(-1.0),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let ok = EmployeePayload {
            emp_no: Some("E1".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }
}
