//! Patient directory repository

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::patient::{Patient, PatientPayload, PatientQuery},
};

use super::push_page;

const SEARCH_COLUMNS: [&str; 3] = ["patient_name", "emp_id", "emirates_id"];

fn map_unique(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::Conflict("Duplicate value for: empId".to_string())
        }
        other => AppError::Database(other),
    }
}

#[derive(Clone)]
pub struct PatientsRepository {
    pool: Pool<Postgres>,
}

impl PatientsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &PatientPayload) -> AppResult<Patient> {
        sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO patients (emp_id, patient_name, emirates_id, insurance_id, tr_location, mobile_number)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.emp_id.as_deref().unwrap_or_default())
        .bind(data.patient_name.as_deref().unwrap_or_default())
        .bind(&data.emirates_id)
        .bind(&data.insurance_id)
        .bind(&data.tr_location)
        .bind(&data.mobile_number)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Patient> {
        sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))
    }

    pub async fn find_by_emp_id(&self, emp_id: &str) -> AppResult<Option<Patient>> {
        let row = sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE emp_id = $1")
            .bind(emp_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &PatientQuery) {
        if let Some(loc) = query.tr_location.as_deref().filter(|s| !s.trim().is_empty()) {
            qb.push(" AND tr_location = ").push_bind(loc.to_string());
        }
        if let Some(q) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", q);
            qb.push(" AND (");
            for (i, column) in SEARCH_COLUMNS.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(format!("{} ILIKE ", column)).push_bind(pattern.clone());
            }
            qb.push(")");
        }
    }

    pub async fn list(
        &self,
        query: &PatientQuery,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<Patient>, i64)> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM patients WHERE TRUE");
        Self::push_filters(&mut count_qb, query);
        let total = count_qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM patients WHERE TRUE");
        Self::push_filters(&mut qb, query);
        qb.push(" ORDER BY created_at DESC, id DESC");
        push_page(&mut qb, page, limit);

        let rows = qb.build_query_as::<Patient>().fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    /// Every matching entry, unpaginated
    pub async fn list_all(&self, query: &PatientQuery) -> AppResult<Vec<Patient>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM patients WHERE TRUE");
        Self::push_filters(&mut qb, query);
        qb.push(" ORDER BY created_at DESC, id DESC");
        let rows = qb.build_query_as::<Patient>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn update(&self, id: i32, data: &PatientPayload) -> AppResult<Patient> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE patients SET updated_at = NOW()");

        macro_rules! set_f {
            ($field:expr, $name:literal) => {
                if let Some(ref val) = $field {
                    qb.push(concat!(", ", $name, " = ")).push_bind(val);
                }
            };
        }

        set_f!(data.emp_id, "emp_id");
        set_f!(data.patient_name, "patient_name");
        set_f!(data.emirates_id, "emirates_id");
        set_f!(data.insurance_id, "insurance_id");
        set_f!(data.tr_location, "tr_location");
        set_f!(data.mobile_number, "mobile_number");

        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        qb.build_query_as::<Patient>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique)?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Patient not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filter_sql() {
        let query = PatientQuery {
            q: Some("nair".into()),
            tr_location: Some("SAJJA".into()),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM patients WHERE TRUE");
        PatientsRepository::push_filters(&mut qb, &query);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM patients WHERE TRUE AND tr_location = $1 AND \
             (patient_name ILIKE $2 OR emp_id ILIKE $3 OR emirates_id ILIKE $4)"
        );
    }
}
