//! Employee records repository

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        employee::{EmployeePayload, EmployeeQuery, EmployeeRecord},
        parse_date,
    },
};

use super::push_page;

#[derive(Clone)]
pub struct EmployeesRepository {
    pool: Pool<Postgres>,
}

impl EmployeesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &EmployeePayload) -> AppResult<EmployeeRecord> {
        let row = sqlx::query_as::<_, EmployeeRecord>(
            r#"
            INSERT INTO employee_records (emp_no, doj, sl, al, el, lop)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.emp_no.as_deref().unwrap_or_default())
        .bind(data.doj)
        .bind(data.sl)
        .bind(data.al)
        .bind(data.el)
        .bind(data.lop)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<EmployeeRecord> {
        sqlx::query_as::<_, EmployeeRecord>("SELECT * FROM employee_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Employee record {} not found", id)))
    }

    /// Most recently written record for an employee number
    pub async fn latest_for_emp_no(&self, emp_no: &str) -> AppResult<Option<EmployeeRecord>> {
        let row = sqlx::query_as::<_, EmployeeRecord>(
            "SELECT * FROM employee_records WHERE emp_no = $1 \
             ORDER BY updated_at DESC, id DESC LIMIT 1",
        )
        .bind(emp_no)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    fn push_list_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &EmployeeQuery) {
        if let Some(ref emp_no) = query.emp_no {
            qb.push(" AND emp_no = ").push_bind(emp_no.trim().to_uppercase());
        }
        if let Some(from) = query.doj_from.as_deref().and_then(parse_date) {
            qb.push(" AND doj >= ").push_bind(from);
        }
        if let Some(to) = query.doj_to.as_deref().and_then(parse_date) {
            qb.push(" AND doj <= ").push_bind(to);
        }
    }

    pub async fn list(
        &self,
        query: &EmployeeQuery,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<EmployeeRecord>, i64)> {
        let mut count_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM employee_records WHERE TRUE");
        Self::push_list_filters(&mut count_qb, query);
        let total = count_qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM employee_records WHERE TRUE");
        Self::push_list_filters(&mut qb, query);
        qb.push(" ORDER BY emp_no ASC, id DESC");
        push_page(&mut qb, page, limit);

        let rows = qb.build_query_as::<EmployeeRecord>().fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    pub async fn update(&self, id: i32, data: &EmployeePayload) -> AppResult<EmployeeRecord> {
        let mut qb =
            QueryBuilder::<Postgres>::new("UPDATE employee_records SET updated_at = NOW()");

        macro_rules! set_f {
            ($field:expr, $name:literal) => {
                if let Some(ref val) = $field {
                    qb.push(concat!(", ", $name, " = ")).push_bind(val);
                }
            };
        }

        set_f!(data.emp_no, "emp_no");
        set_f!(data.doj, "doj");
        set_f!(data.sl, "sl");
        set_f!(data.al, "al");
        set_f!(data.el, "el");
        set_f!(data.lop, "lop");

        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        qb.build_query_as::<EmployeeRecord>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Employee record {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM employee_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Employee record {} not found", id)));
        }
        Ok(())
    }
}
