//! Employee and manager reporting views over clinic visits

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::visit::ClinicVisit;

/// Visit date and who handled it
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct ProviderVisit {
    pub date: Option<NaiveDate>,
    pub provider: Option<String>,
}

/// Visits in the trailing 90-day window
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecentVisits {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub count: usize,
    pub visits: Vec<ProviderVisit>,
}

/// Per-employee visit summary
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub emp_no: String,
    pub last_90_days: RecentVisits,
    pub all_time_total_visits: i64,
    pub sick_leave_approved_count: i64,
    pub total_referrals: i64,
    pub open_referrals: i64,
}

/// One entry of an employee's recent history
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: Option<NaiveDate>,
    pub provider_name: Option<String>,
    pub primary_diagnosis: Option<String>,
    pub secondary_diagnosis: Vec<String>,
    pub referral: Option<bool>,
    pub referral_type: Option<String>,
    pub visit_date_referral: Option<NaiveDate>,
}

impl From<ClinicVisit> for HistoryEntry {
    fn from(v: ClinicVisit) -> Self {
        Self {
            provider_name: v.provider(),
            date: v.date,
            primary_diagnosis: v.primary_diagnosis,
            secondary_diagnosis: v.secondary_diagnosis,
            referral: v.referral,
            referral_type: v.referral_type,
            visit_date_referral: v.visit_date_referral,
        }
    }
}

/// Most recent visit of an employee with its follow-up priority
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedVisit {
    #[serde(flatten)]
    pub visit: ClinicVisit,
    /// 1 (most urgent) to 4
    pub rank: u8,
    /// Visits by the employee in the window
    pub visit_count: i64,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedMeta {
    pub returned: usize,
    pub total_ranked: usize,
    pub excluded_emp_nos_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrioritizedResponse {
    pub items: Vec<PrioritizedVisit>,
    pub meta: PrioritizedMeta,
}
