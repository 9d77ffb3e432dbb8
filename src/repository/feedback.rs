//! Member feedback repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::feedback::{CreateFeedback, MemberFeedback},
};

#[derive(Clone)]
pub struct FeedbackRepository {
    pool: Pool<Postgres>,
}

impl FeedbackRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &CreateFeedback, created_by: i32) -> AppResult<MemberFeedback> {
        let row = sqlx::query_as::<_, MemberFeedback>(
            r#"
            INSERT INTO member_feedback (
                employee_id, clinic_id, manager, date_of_call,
                was_treatment_effective, technician_feedback,
                was_treatment_effective_1, technician_feedback_1,
                ref_req_to_specialist, created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&data.employee_id)
        .bind(data.clinic_id)
        .bind(&data.manager)
        .bind(data.date_of_call)
        .bind(data.was_treatment_effective)
        .bind(&data.technician_feedback)
        .bind(data.was_treatment_effective_1)
        .bind(&data.technician_feedback_1)
        .bind(data.ref_req_to_specialist)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// List feedback, optionally for one employee
    pub async fn list(
        &self,
        employee_id: Option<&str>,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<MemberFeedback>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM member_feedback WHERE ($1::text IS NULL OR employee_id = $1)",
        )
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, MemberFeedback>(
            r#"
            SELECT * FROM member_feedback
            WHERE ($1::text IS NULL OR employee_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(employee_id)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Every employee number that has received a feedback call
    pub async fn distinct_employee_ids(&self) -> AppResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT employee_id FROM member_feedback \
             WHERE employee_id IS NOT NULL AND employee_id <> ''",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
