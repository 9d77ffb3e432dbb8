//! Isolation records repository

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        isolation::{Isolation, IsolationPayload, IsolationQuery},
        LocationScope,
    },
};

use super::{push_location_scope, push_page};

const SELECT_ISOLATIONS: &str = "SELECT i.*, u.name AS created_by_name \
     FROM isolations i LEFT JOIN users u ON u.id = i.created_by";

const FROM_WRITTEN: &str =
    " RETURNING *) SELECT i.*, u.name AS created_by_name FROM i LEFT JOIN users u ON u.id = i.created_by";

#[derive(Clone)]
pub struct IsolationsRepository {
    pool: Pool<Postgres>,
}

impl IsolationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &IsolationPayload, created_by: i32) -> AppResult<Isolation> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"WITH i AS (INSERT INTO isolations (
                location_id, clinic_visit_token, emp_no, isolation_type, employee_name,
                emirates_id, insurance_id, mobile_number, tr_location, isolated_in,
                isolation_reason, nationality, sl_upto, date_from, date_to,
                current_status, remarks, created_by
            ) VALUES ("#,
        );

        let mut values = qb.separated(", ");
        values
            .push_bind(&data.location_id)
            .push_bind(&data.clinic_visit_token)
            .push_bind(data.emp_no.as_deref().unwrap_or_default())
            .push_bind(&data.isolation_type)
            .push_bind(data.employee_name.as_deref().unwrap_or_default())
            .push_bind(data.emirates_id.as_deref().unwrap_or_default())
            .push_bind(&data.insurance_id)
            .push_bind(&data.mobile_number)
            .push_bind(&data.tr_location)
            .push_bind(&data.isolated_in)
            .push_bind(&data.isolation_reason)
            .push_bind(&data.nationality)
            .push_bind(&data.sl_upto)
            .push_bind(&data.date_from)
            .push_bind(&data.date_to)
            .push_bind(&data.current_status)
            .push_bind(&data.remarks)
            .push_bind(created_by);
        qb.push(")").push(FROM_WRITTEN);

        let isolation = qb.build_query_as::<Isolation>().fetch_one(&self.pool).await?;
        Ok(isolation)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Isolation> {
        sqlx::query_as::<_, Isolation>(&format!("{} WHERE i.id = $1", SELECT_ISOLATIONS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Isolation record {} not found", id)))
    }

    fn push_list_filters(
        qb: &mut QueryBuilder<'_, Postgres>,
        scope: &LocationScope,
        query: &IsolationQuery,
    ) {
        push_location_scope(qb, "i.location_id", scope);

        if let Some(ref emp_no) = query.emp_no {
            qb.push(" AND i.emp_no = ").push_bind(emp_no.trim().to_uppercase());
        }
        if let Some(ref status) = query.current_status {
            qb.push(" AND i.current_status = ").push_bind(status.trim().to_string());
        }
        if let Some(ref tr_location) = query.tr_location {
            qb.push(" AND i.tr_location = ").push_bind(tr_location.trim().to_string());
        }
    }

    /// List isolation records with filters and pagination
    pub async fn list(
        &self,
        scope: &LocationScope,
        query: &IsolationQuery,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<Isolation>, i64)> {
        let mut count_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM isolations i WHERE TRUE");
        Self::push_list_filters(&mut count_qb, scope, query);
        let total = count_qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_ISOLATIONS);
        qb.push(" WHERE TRUE");
        Self::push_list_filters(&mut qb, scope, query);
        qb.push(" ORDER BY i.created_at DESC, i.id DESC");
        push_page(&mut qb, page, limit);

        let rows = qb.build_query_as::<Isolation>().fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    pub async fn update(&self, id: i32, data: &IsolationPayload) -> AppResult<Isolation> {
        let mut qb =
            QueryBuilder::<Postgres>::new("WITH i AS (UPDATE isolations SET updated_at = NOW()");

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
        set_f!(data.isolation_type, "isolation_type");
        set_f!(data.employee_name, "employee_name");
        set_f!(data.emirates_id, "emirates_id");
        set_f!(data.insurance_id, "insurance_id");
        set_f!(data.mobile_number, "mobile_number");
        set_f!(data.tr_location, "tr_location");
        set_f!(data.isolated_in, "isolated_in");
        set_f!(data.isolation_reason, "isolation_reason");
        set_f!(data.nationality, "nationality");
        set_f!(data.sl_upto, "sl_upto");
        set_f!(data.date_from, "date_from");
        set_f!(data.date_to, "date_to");
        set_f!(data.current_status, "current_status");
        set_f!(data.remarks, "remarks");

        qb.push(" WHERE id = ").push_bind(id).push(FROM_WRITTEN);

        qb.build_query_as::<Isolation>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Isolation record {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<Isolation> {
        sqlx::query_as::<_, Isolation>(&format!(
            "WITH i AS (DELETE FROM isolations WHERE id = $1{}",
            FROM_WRITTEN
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Isolation record {} not found", id)))
    }
}
