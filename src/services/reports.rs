//! Employee summaries and manager follow-up prioritisation

use std::collections::HashMap;

use chrono::{Days, Local, NaiveDate};

use crate::{
    error::{AppError, AppResult},
    models::{
        report::{
            EmployeeSummary, HistoryEntry, PrioritizedMeta, PrioritizedResponse, PrioritizedVisit,
            ProviderVisit, RecentVisits,
        },
        visit::ClinicVisit,
        UserClaims,
    },
    repository::Repository,
};

const HISTORY_WINDOW_DAYS: u64 = 90;
const PRIORITY_WINDOW_DAYS: u64 = 30;
const REFERRAL_STALE_DAYS: u64 = 5;
const PRIORITY_LIMIT: usize = 50;

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

fn normalize_emp_no(raw: &str) -> AppResult<String> {
    let emp_no = raw.trim().to_uppercase();
    if emp_no.is_empty() {
        return Err(AppError::BadRequest("empNo is required".to_string()));
    }
    Ok(emp_no)
}

fn days_before(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

/// Per-employee aggregate over the priority window
struct EmployeeGroup {
    last_visit: ClinicVisit,
    visit_count: i64,
    approved_sick_leave: bool,
    any_referral: bool,
}

impl EmployeeGroup {
    fn rank(&self, stale_before: NaiveDate) -> u8 {
        let stale = self.last_visit.date.is_some_and(|d| d < stale_before);
        if self.visit_count > 1 {
            if self.approved_sick_leave {
                1
            } else {
                2
            }
        } else if self.any_referral && stale {
            3
        } else {
            4
        }
    }
}

/// Rank employees from their visits
///
/// `visits` must be ordered newest first; the first visit seen for an
/// employee is kept as their last visit. Returns the top `limit` entries
/// and the number of employees ranked.
pub fn rank_visits(
    visits: Vec<ClinicVisit>,
    stale_before: NaiveDate,
    limit: usize,
) -> (Vec<PrioritizedVisit>, usize) {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, EmployeeGroup> = HashMap::new();

    for visit in visits {
        let Some(emp_no) = visit.emp_no.clone() else {
            continue;
        };
        let approved = visit.sick_leave_status.as_deref() == Some("Approved");
        let referral = visit.referral.unwrap_or(false);

        match groups.get_mut(&emp_no) {
            Some(group) => {
                group.visit_count += 1;
                group.approved_sick_leave |= approved;
                group.any_referral |= referral;
            }
            None => {
                order.push(emp_no.clone());
                groups.insert(
                    emp_no,
                    EmployeeGroup {
                        last_visit: visit,
                        visit_count: 1,
                        approved_sick_leave: approved,
                        any_referral: referral,
                    },
                );
            }
        }
    }

    let mut ranked: Vec<PrioritizedVisit> = order
        .into_iter()
        .filter_map(|emp_no| groups.remove(&emp_no))
        .map(|group| PrioritizedVisit {
            rank: group.rank(stale_before),
            visit_count: group.visit_count,
            visit: group.last_visit,
        })
        .collect();

    // Stable sort keeps newest-first order among equal keys
    ranked.sort_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then_with(|| b.visit.date.cmp(&a.visit.date))
    });

    let total = ranked.len();
    ranked.truncate(limit);
    (ranked, total)
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Visit counts and the last 90 days for an employee
    pub async fn employee_summary(&self, emp_no: &str) -> AppResult<EmployeeSummary> {
        let emp_no = normalize_emp_no(emp_no)?;
        let today = Local::now().date_naive();
        let from = days_before(today, HISTORY_WINDOW_DAYS);

        let counts = self.repository.visits.employee_counts(&emp_no).await?;
        let recent = self
            .repository
            .visits
            .list_for_employee_since(&emp_no, from)
            .await?;

        let visits: Vec<ProviderVisit> = recent
            .iter()
            .filter(|v| v.date.is_some_and(|d| d <= today))
            .map(|v| ProviderVisit {
                date: v.date,
                provider: v.provider(),
            })
            .collect();

        Ok(EmployeeSummary {
            emp_no,
            last_90_days: RecentVisits {
                from,
                to: today,
                count: visits.len(),
                visits,
            },
            all_time_total_visits: counts.total,
            sick_leave_approved_count: counts.approved_sick_leave,
            total_referrals: counts.referrals,
            open_referrals: counts.open_referrals,
        })
    }

    /// Diagnosis and referral history of the last 90 days
    pub async fn employee_history(&self, emp_no: &str) -> AppResult<Vec<HistoryEntry>> {
        let emp_no = normalize_emp_no(emp_no)?;
        let from = days_before(Local::now().date_naive(), HISTORY_WINDOW_DAYS);
        let visits = self
            .repository
            .visits
            .list_for_employee_since(&emp_no, from)
            .await?;
        Ok(visits.into_iter().map(HistoryEntry::from).collect())
    }

    /// Employees at the manager's locations most in need of a follow-up call
    pub async fn manager_prioritized(&self, claims: &UserClaims) -> AppResult<PrioritizedResponse> {
        let locations = claims.require_manager_locations()?;
        let excluded = self.repository.feedback.distinct_employee_ids().await?;

        let today = Local::now().date_naive();
        let since = days_before(today, PRIORITY_WINDOW_DAYS);
        let stale_before = days_before(today, REFERRAL_STALE_DAYS);

        let visits = self
            .repository
            .visits
            .recent_for_locations(&locations, since, &excluded)
            .await?;

        let (items, total_ranked) = rank_visits(visits, stale_before, PRIORITY_LIMIT);
        tracing::debug!(
            user_id = claims.user_id,
            total_ranked,
            excluded = excluded.len(),
            "Computed prioritized visits"
        );

        Ok(PrioritizedResponse {
            meta: PrioritizedMeta {
                returned: items.len(),
                total_ranked,
                excluded_emp_nos_count: excluded.len(),
            },
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn visit(id: i32, emp_no: &str, date: NaiveDate) -> ClinicVisit {
        ClinicVisit {
            id,
            location_id: Some("SAJJA".into()),
            date: Some(date),
            time: Some("09:00".into()),
            emp_no: Some(emp_no.into()),
            employee_name: Some(format!("Employee {}", emp_no)),
            date_of_joining: None,
            eligibility_for_sick_leave: None,
            emirates_id: Some("784-0000".into()),
            insurance_id: None,
            tr_location: Some("SAJJA".into()),
            mobile_number: Some("050".into()),
            nature_of_case: Some("Illness".into()),
            case_category: Some("General".into()),
            nurse_assessment: vec![],
            symptom_duration: None,
            temperature: None,
            blood_pressure: None,
            heart_rate: None,
            others: None,
            token_no: Some(format!("SAJJ-0106-{:04}", id)),
            sent_to: None,
            provider_name: None,
            doctor_name: None,
            primary_diagnosis: None,
            secondary_diagnosis: vec![],
            medicines: Json(vec![]),
            sick_leave_status: None,
            sick_leave_start_date: None,
            sick_leave_end_date: None,
            total_sick_leave_days: None,
            remarks: None,
            referral: None,
            referral_code: None,
            referral_type: None,
            referred_to_hospital: None,
            visit_date_referral: None,
            specialist_type: None,
            doctor_name_referral: None,
            investigation_reports: None,
            primary_diagnosis_referral: None,
            secondary_diagnosis_referral: vec![],
            nurse_remarks_referral: None,
            insurance_approval_requested: false,
            follow_up_required: false,
            follow_up_visits: Json(vec![]),
            visit_status: None,
            final_remarks: None,
            ip_admission_required: false,
            created_by: 1,
            created_by_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn approved(mut v: ClinicVisit) -> ClinicVisit {
        v.sick_leave_status = Some("Approved".into());
        v
    }

    fn referred(mut v: ClinicVisit) -> ClinicVisit {
        v.referral = Some(true);
        v
    }

    #[test]
    fn test_ranking_rules() {
        let stale_before = day(20);
        // Newest first, as the repository returns them
        let visits = vec![
            visit(10, "D", day(24)),
            visit(9, "B", day(23)),
            visit(8, "A", day(22)),
            referred(visit(7, "C", day(18))),
            approved(visit(6, "A", day(15))),
            visit(5, "B", day(12)),
            referred(visit(4, "E", day(21))),
        ];

        let (ranked, total) = rank_visits(visits, stale_before, 50);
        assert_eq!(total, 5);

        let summary: Vec<(&str, u8, i64)> = ranked
            .iter()
            .map(|p| (p.visit.emp_no.as_deref().unwrap(), p.rank, p.visit_count))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("A", 1, 2),
                ("B", 2, 2),
                ("C", 3, 1),
                // Both rank 4; newer last visit first
                ("D", 4, 1),
                ("E", 4, 1),
            ]
        );

        // The kept visit is the most recent one
        assert_eq!(ranked[0].visit.id, 8);
        assert_eq!(ranked[1].visit.id, 9);
    }

    #[test]
    fn test_recent_referral_is_not_rank_three() {
        let (ranked, _) = rank_visits(vec![referred(visit(1, "X", day(20)))], day(20), 50);
        assert_eq!(ranked[0].rank, 4);
    }

    #[test]
    fn test_limit_applies_after_ranking() {
        let visits: Vec<ClinicVisit> = (1..=60)
            .map(|i| visit(i, &format!("E{}", i), day(1 + (i as u32 % 28))))
            .collect();
        let (ranked, total) = rank_visits(visits, day(1), PRIORITY_LIMIT);
        assert_eq!(total, 60);
        assert_eq!(ranked.len(), PRIORITY_LIMIT);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].visit.date >= w[1].visit.date));
    }

    #[test]
    fn test_emp_no_normalization() {
        assert_eq!(normalize_emp_no(" ab12 ").unwrap(), "AB12");
        assert!(matches!(normalize_emp_no("  "), Err(AppError::BadRequest(_))));
    }
}
