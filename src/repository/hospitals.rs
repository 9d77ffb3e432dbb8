//! Hospital admissions repository

use chrono::NaiveDate;
use sqlx::{types::Json, Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        hospital::{Hospital, HospitalPayload, HospitalQuery},
        parse_date, LocationScope,
    },
};

use super::{push_location_scope, push_page};

const SELECT_HOSPITALS: &str = "SELECT h.*, u.name AS created_by_name \
     FROM hospitals h LEFT JOIN users u ON u.id = h.created_by";

const FROM_WRITTEN: &str =
    " RETURNING *) SELECT h.*, u.name AS created_by_name FROM h LEFT JOIN users u ON u.id = h.created_by";

#[derive(Clone)]
pub struct HospitalsRepository {
    pool: Pool<Postgres>,
}

impl HospitalsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a hospital record; required fields are checked by the caller
    pub async fn create(&self, data: &HospitalPayload, created_by: i32) -> AppResult<Hospital> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"WITH h AS (INSERT INTO hospitals (
                location_id, clinic_visit_token, emp_no, employee_name, emirates_id,
                insurance_id, tr_location, mobile_number, hospital_name, date_of_admission,
                nature_of_case, case_category, primary_diagnosis, secondary_diagnosis,
                status, discharge_summary_received, date_of_discharge, days_hospitalized,
                follow_up, fitness_status, isolation_required, final_remarks, created_by
            ) VALUES ("#,
        );

        let mut values = qb.separated(", ");
        values
            .push_bind(&data.location_id)
            .push_bind(&data.clinic_visit_token)
            .push_bind(data.emp_no.as_deref().unwrap_or_default())
            .push_bind(data.employee_name.as_deref().unwrap_or_default())
            .push_bind(data.emirates_id.as_deref().unwrap_or_default())
            .push_bind(&data.insurance_id)
            .push_bind(&data.tr_location)
            .push_bind(&data.mobile_number)
            .push_bind(&data.hospital_name)
            .push_bind(data.date_of_admission)
            .push_bind(&data.nature_of_case)
            .push_bind(&data.case_category)
            .push_bind(&data.primary_diagnosis)
            .push_bind(data.secondary_diagnosis.clone().unwrap_or_default())
            .push_bind(&data.status)
            .push_bind(data.discharge_summary_received.unwrap_or(false))
            .push_bind(data.date_of_discharge)
            .push_bind(data.days_hospitalized)
            .push_bind(Json(data.follow_up.clone().unwrap_or_default()))
            .push_bind(&data.fitness_status)
            .push_bind(data.isolation_required.unwrap_or(false))
            .push_bind(&data.final_remarks)
            .push_bind(created_by);
        qb.push(")").push(FROM_WRITTEN);

        let hospital = qb.build_query_as::<Hospital>().fetch_one(&self.pool).await?;
        Ok(hospital)
    }

    /// Get hospital record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Hospital> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Hospital record {} not found", id)))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Hospital>> {
        let hospital =
            sqlx::query_as::<_, Hospital>(&format!("{} WHERE h.id = $1", SELECT_HOSPITALS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(hospital)
    }

    fn push_list_filters(
        qb: &mut QueryBuilder<'_, Postgres>,
        scope: &LocationScope,
        query: &HospitalQuery,
    ) {
        push_location_scope(qb, "h.location_id", scope);

        if let Some(ref emp_no) = query.emp_no {
            qb.push(" AND h.emp_no = ").push_bind(emp_no.trim().to_uppercase());
        }
        if let Some(ref emirates_id) = query.emirates_id {
            qb.push(" AND h.emirates_id = ").push_bind(emirates_id.trim().to_string());
        }
        if let Some(ref status) = query.status {
            qb.push(" AND h.status = ").push_bind(status.trim().to_string());
        }
        if let Some(start) = query.start_date.as_deref().and_then(parse_date) {
            qb.push(" AND h.date_of_admission >= ").push_bind(start);
        }
        if let Some(end) = query.end_date.as_deref().and_then(parse_date) {
            qb.push(" AND h.date_of_admission <= ").push_bind(end);
        }
    }

    /// List hospital records with filters and pagination
    pub async fn list(
        &self,
        scope: &LocationScope,
        query: &HospitalQuery,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<Hospital>, i64)> {
        let mut count_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM hospitals h WHERE TRUE");
        Self::push_list_filters(&mut count_qb, scope, query);
        let total = count_qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_HOSPITALS);
        qb.push(" WHERE TRUE");
        Self::push_list_filters(&mut qb, scope, query);
        qb.push(" ORDER BY h.date_of_admission DESC NULLS LAST, h.id DESC");
        push_page(&mut qb, page, limit);

        let rows = qb.build_query_as::<Hospital>().fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    /// Records at the given locations that are still open for H&I follow-up
    ///
    /// Open means not discharged and not yet referenced by an IP admission.
    pub async fn list_pending_discharge(
        &self,
        locations: &[String],
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<Hospital>, i64)> {
        const PENDING: &str = "h.location_id = ANY($1) \
             AND h.status IS DISTINCT FROM 'Discharge' \
             AND NOT EXISTS (SELECT 1 FROM ip_admissions ip WHERE ip.hospital_case = h.id)";

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM hospitals h WHERE {}",
            PENDING
        ))
        .bind(locations)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, Hospital>(&format!(
            "{} WHERE {} ORDER BY h.date_of_admission DESC NULLS LAST, h.id ASC LIMIT $2 OFFSET $3",
            SELECT_HOSPITALS, PENDING
        ))
        .bind(locations)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Admission of an employee on a calendar day
    pub async fn find_by_employee_and_date(
        &self,
        emp_no: &str,
        date: NaiveDate,
    ) -> AppResult<Option<Hospital>> {
        let row = sqlx::query_as::<_, Hospital>(&format!(
            "{} WHERE h.emp_no = $1 AND h.date_of_admission = $2 ORDER BY h.id DESC LIMIT 1",
            SELECT_HOSPITALS
        ))
        .bind(emp_no)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Hospital records at one location
    pub async fn list_for_location(
        &self,
        location_id: &str,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<Hospital>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hospitals WHERE location_id = $1")
            .bind(location_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, Hospital>(&format!(
            "{} WHERE h.location_id = $1 ORDER BY h.date_of_admission DESC NULLS LAST, h.id DESC LIMIT $2 OFFSET $3",
            SELECT_HOSPITALS
        ))
        .bind(location_id)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Apply the fields present in `data`; `created_by` is never changed
    pub async fn update(&self, id: i32, data: &HospitalPayload) -> AppResult<Hospital> {
        let mut qb =
            QueryBuilder::<Postgres>::new("WITH h AS (UPDATE hospitals SET updated_at = NOW()");

        macro_rules! set_f {
            ($field:expr, $name:literal) => {
                if let Some(ref val) = $field {
                    qb.push(concat!(", ", $name, " = ")).push_bind(val);
                }
            };
        }

        set_f!(data.location_id, "location_id");
        set_f!(data.clinic_visit_token, "clinic_visit_token");
        set_f!(data.emp_no, "emp_no");
        set_f!(data.employee_name, "employee_name");
        set_f!(data.emirates_id, "emirates_id");
        set_f!(data.insurance_id, "insurance_id");
        set_f!(data.tr_location, "tr_location");
        set_f!(data.mobile_number, "mobile_number");
        set_f!(data.hospital_name, "hospital_name");
        set_f!(data.date_of_admission, "date_of_admission");
        set_f!(data.nature_of_case, "nature_of_case");
        set_f!(data.case_category, "case_category");
        set_f!(data.primary_diagnosis, "primary_diagnosis");
        set_f!(data.secondary_diagnosis, "secondary_diagnosis");
        set_f!(data.status, "status");
        set_f!(data.discharge_summary_received, "discharge_summary_received");
        set_f!(data.date_of_discharge, "date_of_discharge");
        set_f!(data.days_hospitalized, "days_hospitalized");
        if let Some(ref follow_up) = data.follow_up {
            qb.push(", follow_up = ").push_bind(Json(follow_up));
        }
        set_f!(data.fitness_status, "fitness_status");
        set_f!(data.isolation_required, "isolation_required");
        set_f!(data.final_remarks, "final_remarks");

        qb.push(" WHERE id = ").push_bind(id).push(FROM_WRITTEN);

        qb.build_query_as::<Hospital>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Hospital record {} not found", id)))
    }

    /// Delete a hospital record, returning what was removed
    pub async fn delete(&self, id: i32) -> AppResult<Hospital> {
        sqlx::query_as::<_, Hospital>(&format!(
            "WITH h AS (DELETE FROM hospitals WHERE id = $1{}",
            FROM_WRITTEN
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Hospital record {} not found", id)))
    }
}
