//! Clinic visits repository

use chrono::NaiveDate;
use sqlx::{types::Json, Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        parse_date,
        visit::{ClinicVisit, VisitPayload, VisitQuery},
        LocationScope,
    },
};

use super::{push_location_scope, push_page};

const SELECT_VISITS: &str = "SELECT v.*, u.name AS created_by_name \
     FROM clinic_visits v LEFT JOIN users u ON u.id = v.created_by";

/// Tail of a `WITH v AS (... RETURNING *)` statement
const FROM_WRITTEN: &str =
    " RETURNING *) SELECT v.*, u.name AS created_by_name FROM v LEFT JOIN users u ON u.id = v.created_by";

/// Visit counters for a single employee
#[derive(Debug, Clone, Copy, Default, sqlx::FromRow, PartialEq, Eq)]
pub struct EmployeeVisitCounts {
    pub total: i64,
    pub approved_sick_leave: i64,
    pub referrals: i64,
    pub open_referrals: i64,
}

#[derive(Clone)]
pub struct VisitsRepository {
    pool: Pool<Postgres>,
}

impl VisitsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a visit exactly as prepared by the caller
    pub async fn create(&self, data: &VisitPayload, created_by: i32) -> AppResult<ClinicVisit> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"WITH v AS (INSERT INTO clinic_visits (
                location_id, date, time, emp_no, employee_name, date_of_joining,
                eligibility_for_sick_leave, emirates_id, insurance_id, tr_location,
                mobile_number, nature_of_case, case_category, nurse_assessment,
                symptom_duration, temperature, blood_pressure, heart_rate, others,
                token_no, sent_to, provider_name, doctor_name, primary_diagnosis,
                secondary_diagnosis, medicines, sick_leave_status, sick_leave_start_date,
                sick_leave_end_date, total_sick_leave_days, remarks, referral,
                referral_code, referral_type, referred_to_hospital, visit_date_referral,
                specialist_type, doctor_name_referral, investigation_reports,
                primary_diagnosis_referral, secondary_diagnosis_referral,
                nurse_remarks_referral, insurance_approval_requested, follow_up_required,
                follow_up_visits, visit_status, final_remarks, ip_admission_required,
                created_by
            ) VALUES ("#,
        );

        let mut values = qb.separated(", ");
        values
            .push_bind(&data.location_id)
            .push_bind(data.date)
            .push_bind(&data.time)
            .push_bind(&data.emp_no)
            .push_bind(&data.employee_name)
            .push_bind(&data.date_of_joining)
            .push_bind(data.eligibility_for_sick_leave)
            .push_bind(&data.emirates_id)
            .push_bind(&data.insurance_id)
            .push_bind(&data.tr_location)
            .push_bind(&data.mobile_number)
            .push_bind(&data.nature_of_case)
            .push_bind(&data.case_category)
            .push_bind(data.nurse_assessment.clone().unwrap_or_default())
            .push_bind(&data.symptom_duration)
            .push_bind(&data.temperature)
            .push_bind(&data.blood_pressure)
            .push_bind(&data.heart_rate)
            .push_bind(&data.others)
            .push_bind(&data.token_no)
            .push_bind(&data.sent_to)
            .push_bind(&data.provider_name)
            .push_bind(&data.doctor_name)
            .push_bind(&data.primary_diagnosis)
            .push_bind(data.secondary_diagnosis.clone().unwrap_or_default())
            .push_bind(Json(data.medicines.clone().unwrap_or_default()))
            .push_bind(&data.sick_leave_status)
            .push_bind(data.sick_leave_start_date)
            .push_bind(data.sick_leave_end_date)
            .push_bind(&data.total_sick_leave_days)
            .push_bind(&data.remarks)
            .push_bind(data.referral)
            .push_bind(&data.referral_code)
            .push_bind(&data.referral_type)
            .push_bind(&data.referred_to_hospital)
            .push_bind(data.visit_date_referral)
            .push_bind(&data.specialist_type)
            .push_bind(&data.doctor_name_referral)
            .push_bind(&data.investigation_reports)
            .push_bind(&data.primary_diagnosis_referral)
            .push_bind(data.secondary_diagnosis_referral.clone().unwrap_or_default())
            .push_bind(&data.nurse_remarks_referral)
            .push_bind(data.insurance_approval_requested.unwrap_or(false))
            .push_bind(data.follow_up_required.unwrap_or(false))
            .push_bind(Json(data.follow_up_visits.clone().unwrap_or_default()))
            .push_bind(&data.visit_status)
            .push_bind(&data.final_remarks)
            .push_bind(data.ip_admission_required.unwrap_or(false))
            .push_bind(created_by);
        qb.push(")").push(FROM_WRITTEN);

        let visit = qb
            .build_query_as::<ClinicVisit>()
            .fetch_one(&self.pool)
            .await?;
        Ok(visit)
    }

    /// Get visit by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<ClinicVisit> {
        sqlx::query_as::<_, ClinicVisit>(&format!("{} WHERE v.id = $1", SELECT_VISITS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visit {} not found", id)))
    }

    /// Get the visit carrying a token
    pub async fn get_by_token(&self, token_no: &str) -> AppResult<Option<ClinicVisit>> {
        let visit = sqlx::query_as::<_, ClinicVisit>(&format!(
            "{} WHERE v.token_no = $1 ORDER BY v.id DESC LIMIT 1",
            SELECT_VISITS
        ))
        .bind(token_no)
        .fetch_optional(&self.pool)
        .await?;
        Ok(visit)
    }

    fn push_list_filters(qb: &mut QueryBuilder<'_, Postgres>, scope: &LocationScope, query: &VisitQuery) {
        push_location_scope(qb, "v.location_id", scope);

        if let Some(ref emirates_id) = query.emirates_id {
            qb.push(" AND v.emirates_id = ").push_bind(emirates_id.trim().to_string());
        }
        if let Some(ref emp_no) = query.emp_no {
            qb.push(" AND v.emp_no = ").push_bind(emp_no.trim().to_uppercase());
        }
        if let Some(ref status) = query.visit_status {
            qb.push(" AND v.visit_status = ").push_bind(status.trim().to_uppercase());
        }
        if let Some(ref token_no) = query.token_no {
            qb.push(" AND v.token_no = ").push_bind(token_no.trim().to_string());
        }
        if let Some(start) = query.start_date.as_deref().and_then(parse_date) {
            qb.push(" AND v.date >= ").push_bind(start);
        }
        if let Some(end) = query.end_date.as_deref().and_then(parse_date) {
            qb.push(" AND v.date <= ").push_bind(end);
        }
    }

    /// List visits with filters and pagination
    pub async fn list(
        &self,
        scope: &LocationScope,
        query: &VisitQuery,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<ClinicVisit>, i64)> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM clinic_visits v WHERE TRUE");
        Self::push_list_filters(&mut count_qb, scope, query);
        let total = count_qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_VISITS);
        qb.push(" WHERE TRUE");
        Self::push_list_filters(&mut qb, scope, query);
        qb.push(" ORDER BY v.date DESC NULLS LAST, v.time DESC NULLS LAST, v.id DESC");
        push_page(&mut qb, page, limit);

        let rows = qb.build_query_as::<ClinicVisit>().fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    /// Visits recorded at one location
    pub async fn list_for_location(
        &self,
        location_id: &str,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<ClinicVisit>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM clinic_visits WHERE location_id = $1")
                .bind(location_id)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, ClinicVisit>(&format!(
            "{} WHERE v.location_id = $1 ORDER BY v.date DESC NULLS LAST, v.token_no ASC LIMIT $2 OFFSET $3",
            SELECT_VISITS
        ))
        .bind(location_id)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Visits by employee and/or calendar day
    pub async fn search(
        &self,
        scope: &LocationScope,
        emp_no: Option<&str>,
        date: Option<NaiveDate>,
        max_rows: i64,
    ) -> AppResult<Vec<ClinicVisit>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_VISITS);
        qb.push(" WHERE TRUE");
        push_location_scope(&mut qb, "v.location_id", scope);
        if let Some(emp_no) = emp_no {
            qb.push(" AND v.emp_no = ").push_bind(emp_no.to_string());
        }
        if let Some(date) = date {
            qb.push(" AND v.date = ").push_bind(date);
        }
        qb.push(" ORDER BY v.date DESC NULLS LAST, v.time DESC NULLS LAST, v.id DESC LIMIT ")
            .push_bind(max_rows);

        let rows = qb.build_query_as::<ClinicVisit>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Apply the fields present in `data` to a visit
    pub async fn update(&self, id: i32, data: &VisitPayload) -> AppResult<ClinicVisit> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "WITH v AS (UPDATE clinic_visits SET updated_at = NOW()",
        );

        macro_rules! set_f {
            ($field:expr, $name:literal) => {
                if let Some(ref val) = $field {
                    qb.push(concat!(", ", $name, " = ")).push_bind(val);
                }
            };
        }

        set_f!(data.location_id, "location_id");
        set_f!(data.date, "date");
        set_f!(data.time, "time");
        set_f!(data.emp_no, "emp_no");
        set_f!(data.employee_name, "employee_name");
        set_f!(data.date_of_joining, "date_of_joining");
        set_f!(data.eligibility_for_sick_leave, "eligibility_for_sick_leave");
        set_f!(data.emirates_id, "emirates_id");
        set_f!(data.insurance_id, "insurance_id");
        set_f!(data.tr_location, "tr_location");
        set_f!(data.mobile_number, "mobile_number");
        set_f!(data.nature_of_case, "nature_of_case");
        set_f!(data.case_category, "case_category");
        set_f!(data.nurse_assessment, "nurse_assessment");
        set_f!(data.symptom_duration, "symptom_duration");
        set_f!(data.temperature, "temperature");
        set_f!(data.blood_pressure, "blood_pressure");
        set_f!(data.heart_rate, "heart_rate");
        set_f!(data.others, "others");
        set_f!(data.token_no, "token_no");
        set_f!(data.sent_to, "sent_to");
        set_f!(data.provider_name, "provider_name");
        set_f!(data.doctor_name, "doctor_name");
        set_f!(data.primary_diagnosis, "primary_diagnosis");
        set_f!(data.secondary_diagnosis, "secondary_diagnosis");
        if let Some(ref medicines) = data.medicines {
            qb.push(", medicines = ").push_bind(Json(medicines));
        }
        set_f!(data.sick_leave_status, "sick_leave_status");
        set_f!(data.sick_leave_start_date, "sick_leave_start_date");
        set_f!(data.sick_leave_end_date, "sick_leave_end_date");
        set_f!(data.total_sick_leave_days, "total_sick_leave_days");
        set_f!(data.remarks, "remarks");
        set_f!(data.referral, "referral");
        set_f!(data.referral_code, "referral_code");
        set_f!(data.referral_type, "referral_type");
        set_f!(data.referred_to_hospital, "referred_to_hospital");
        set_f!(data.visit_date_referral, "visit_date_referral");
        set_f!(data.specialist_type, "specialist_type");
        set_f!(data.doctor_name_referral, "doctor_name_referral");
        set_f!(data.investigation_reports, "investigation_reports");
        set_f!(data.primary_diagnosis_referral, "primary_diagnosis_referral");
        set_f!(data.secondary_diagnosis_referral, "secondary_diagnosis_referral");
        set_f!(data.nurse_remarks_referral, "nurse_remarks_referral");
        set_f!(data.insurance_approval_requested, "insurance_approval_requested");
        set_f!(data.follow_up_required, "follow_up_required");
        if let Some(ref follow_ups) = data.follow_up_visits {
            qb.push(", follow_up_visits = ").push_bind(Json(follow_ups));
        }
        set_f!(data.visit_status, "visit_status");
        set_f!(data.final_remarks, "final_remarks");
        set_f!(data.ip_admission_required, "ip_admission_required");

        qb.push(" WHERE id = ").push_bind(id).push(FROM_WRITTEN);

        qb.build_query_as::<ClinicVisit>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visit {} not found", id)))
    }

    /// Delete a visit, returning what was removed
    pub async fn delete(&self, id: i32) -> AppResult<ClinicVisit> {
        sqlx::query_as::<_, ClinicVisit>(&format!(
            "WITH v AS (DELETE FROM clinic_visits WHERE id = $1{}",
            FROM_WRITTEN
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Visit {} not found", id)))
    }

    /// An employee's visits on or after `since`, newest first
    pub async fn list_for_employee_since(
        &self,
        emp_no: &str,
        since: NaiveDate,
    ) -> AppResult<Vec<ClinicVisit>> {
        let rows = sqlx::query_as::<_, ClinicVisit>(&format!(
            "{} WHERE v.emp_no = $1 AND v.date >= $2 \
             ORDER BY v.date DESC, v.time DESC NULLS LAST, v.id DESC",
            SELECT_VISITS
        ))
        .bind(emp_no)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// All-time counters for an employee
    pub async fn employee_counts(&self, emp_no: &str) -> AppResult<EmployeeVisitCounts> {
        let counts = sqlx::query_as::<_, EmployeeVisitCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE sick_leave_status = 'Approved') AS approved_sick_leave,
                COUNT(*) FILTER (WHERE referral IS TRUE) AS referrals,
                COUNT(*) FILTER (WHERE referral IS TRUE AND visit_status = 'OPEN') AS open_referrals
            FROM clinic_visits
            WHERE emp_no = $1
            "#,
        )
        .bind(emp_no)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }

    /// Visits at the given locations since a day, skipping listed employees
    ///
    /// Ordered newest first so the first row per employee is their last visit.
    pub async fn recent_for_locations(
        &self,
        locations: &[String],
        since: NaiveDate,
        excluded_emp_nos: &[String],
    ) -> AppResult<Vec<ClinicVisit>> {
        let rows = sqlx::query_as::<_, ClinicVisit>(&format!(
            "{} WHERE v.location_id = ANY($1) AND v.date >= $2 \
             AND v.emp_no IS NOT NULL AND NOT (v.emp_no = ANY($3)) \
             ORDER BY v.date DESC, v.time DESC NULLS LAST, v.id DESC",
            SELECT_VISITS
        ))
        .bind(locations)
        .bind(since)
        .bind(excluded_emp_nos)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_filters_sql() {
        let query = VisitQuery {
            emp_no: Some(" e12 ".into()),
            start_date: Some("2025-01-01".into()),
            end_date: Some("garbage".into()),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM clinic_visits v WHERE TRUE");
        VisitsRepository::push_list_filters(
            &mut qb,
            &LocationScope::Only(vec!["SAIF".into()]),
            &query,
        );
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM clinic_visits v WHERE TRUE \
             AND v.location_id = ANY($1) AND v.emp_no = $2 AND v.date >= $3"
        );
    }
}
