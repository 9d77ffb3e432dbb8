//! IP admissions repository

use sqlx::{types::Json, Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        ip_admission::{IpAdmission, IpAdmissionPayload, IpAdmissionQuery},
        parse_date, LocationScope,
    },
};

use super::{push_location_scope, push_page};

/// Columns matched by the free-text `search` filter
const SEARCH_COLUMNS: &[&str] = &[
    "hi_managers",
    "treatment_undergone",
    "technician_feedback_form",
    "source",
    "case_type_change",
    "discharge_comments",
    "case_type_change_comments",
    "technician_visits::text",
];

#[derive(Clone)]
pub struct IpAdmissionsRepository {
    pool: Pool<Postgres>,
}

impl IpAdmissionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &IpAdmissionPayload) -> AppResult<IpAdmission> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"INSERT INTO ip_admissions (
                emp_no, date_of_admission, hospital_name, tr_location, hospital_case,
                hi_managers, admission_mode, admission_type, insurance_approval_status,
                treatment_undergone, im_visit_status, no_of_visits, technician_visits,
                treatment_location, place_of_location, post_recovery_location,
                fit_to_travel, post_rehab_required, duration_of_rehab, follow_up_required,
                rehab_extension, rehab_extension_duration, member_resume_to_work,
                technician_feedback_form, discharged_hi, dod_hi, source, case_type_change,
                discharge_comments, case_type_change_comments
            ) VALUES ("#,
        );

        let mut values = qb.separated(", ");
        values
            .push_bind(data.emp_no.as_deref().unwrap_or_default())
            .push_bind(data.date_of_admission)
            .push_bind(&data.hospital_name)
            .push_bind(&data.tr_location)
            .push_bind(data.hospital_case)
            .push_bind(&data.hi_managers)
            .push_bind(&data.admission_mode)
            .push_bind(&data.admission_type)
            .push_bind(&data.insurance_approval_status)
            .push_bind(&data.treatment_undergone)
            .push_bind(&data.im_visit_status)
            .push_bind(data.no_of_visits)
            .push_bind(Json(data.technician_visits.clone().unwrap_or_default()))
            .push_bind(&data.treatment_location)
            .push_bind(&data.place_of_location)
            .push_bind(&data.post_recovery_location)
            .push_bind(data.fit_to_travel)
            .push_bind(data.post_rehab_required)
            .push_bind(data.duration_of_rehab)
            .push_bind(data.follow_up_required)
            .push_bind(data.rehab_extension)
            .push_bind(data.rehab_extension_duration)
            .push_bind(data.member_resume_to_work)
            .push_bind(&data.technician_feedback_form)
            .push_bind(data.discharged_hi)
            .push_bind(data.dod_hi)
            .push_bind(&data.source)
            .push_bind(&data.case_type_change)
            .push_bind(&data.discharge_comments)
            .push_bind(&data.case_type_change_comments);
        qb.push(") RETURNING *");

        let admission = qb.build_query_as::<IpAdmission>().fetch_one(&self.pool).await?;
        Ok(admission)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<IpAdmission> {
        sqlx::query_as::<_, IpAdmission>("SELECT * FROM ip_admissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("IP admission {} not found", id)))
    }

    fn push_list_filters(
        qb: &mut QueryBuilder<'_, Postgres>,
        scope: &LocationScope,
        query: &IpAdmissionQuery,
    ) {
        push_location_scope(qb, "tr_location", scope);

        macro_rules! eq_f {
            ($field:expr, $name:literal) => {
                if let Some(ref val) = $field {
                    qb.push(concat!(" AND ", $name, " = ")).push_bind(val.clone());
                }
            };
        }

        eq_f!(query.hi_managers, "hi_managers");
        eq_f!(query.admission_mode, "admission_mode");
        eq_f!(query.admission_type, "admission_type");
        eq_f!(query.insurance_approval_status, "insurance_approval_status");
        eq_f!(query.im_visit_status, "im_visit_status");
        eq_f!(query.source, "source");
        eq_f!(query.case_type_change, "case_type_change");
        eq_f!(query.discharged_hi, "discharged_hi");
        eq_f!(query.follow_up_required, "follow_up_required");
        eq_f!(query.hospital_case, "hospital_case");

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            qb.push(" AND (");
            for (i, column) in SEARCH_COLUMNS.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(format!("{} ILIKE ", column)).push_bind(pattern.clone());
            }
            qb.push(")");
        }
        if let Some(from) = query.member_resume_from.as_deref().and_then(parse_date) {
            qb.push(" AND member_resume_to_work >= ").push_bind(from);
        }
        if let Some(to) = query.member_resume_to.as_deref().and_then(parse_date) {
            qb.push(" AND member_resume_to_work <= ").push_bind(to);
        }
        if let Some(from) = query.dod_hi_from.as_deref().and_then(parse_date) {
            qb.push(" AND dod_hi >= ").push_bind(from);
        }
        if let Some(to) = query.dod_hi_to.as_deref().and_then(parse_date) {
            qb.push(" AND dod_hi <= ").push_bind(to);
        }
    }

    /// List IP admissions, most recently updated first
    pub async fn list(
        &self,
        scope: &LocationScope,
        query: &IpAdmissionQuery,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<IpAdmission>, i64)> {
        let mut count_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ip_admissions WHERE TRUE");
        Self::push_list_filters(&mut count_qb, scope, query);
        let total = count_qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM ip_admissions WHERE TRUE");
        Self::push_list_filters(&mut qb, scope, query);
        qb.push(" ORDER BY updated_at DESC, id DESC");
        push_page(&mut qb, page, limit);

        let rows = qb.build_query_as::<IpAdmission>().fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    pub async fn update(&self, id: i32, data: &IpAdmissionPayload) -> AppResult<IpAdmission> {
        let mut qb =
            QueryBuilder::<Postgres>::new("UPDATE ip_admissions SET updated_at = NOW()");

        macro_rules! set_f {
            ($field:expr, $name:literal) => {
                if let Some(ref val) = $field {
                    qb.push(concat!(", ", $name, " = ")).push_bind(val);
                }
            };
        }

        set_f!(data.emp_no, "emp_no");
        set_f!(data.date_of_admission, "date_of_admission");
        set_f!(data.hospital_name, "hospital_name");
        set_f!(data.tr_location, "tr_location");
        set_f!(data.hospital_case, "hospital_case");
        set_f!(data.hi_managers, "hi_managers");
        set_f!(data.admission_mode, "admission_mode");
        set_f!(data.admission_type, "admission_type");
        set_f!(data.insurance_approval_status, "insurance_approval_status");
        set_f!(data.treatment_undergone, "treatment_undergone");
        set_f!(data.im_visit_status, "im_visit_status");
        set_f!(data.no_of_visits, "no_of_visits");
        if let Some(ref visits) = data.technician_visits {
            qb.push(", technician_visits = ").push_bind(Json(visits));
        }
        set_f!(data.treatment_location, "treatment_location");
        set_f!(data.place_of_location, "place_of_location");
        set_f!(data.post_recovery_location, "post_recovery_location");
        set_f!(data.fit_to_travel, "fit_to_travel");
        set_f!(data.post_rehab_required, "post_rehab_required");
        set_f!(data.duration_of_rehab, "duration_of_rehab");
        set_f!(data.follow_up_required, "follow_up_required");
        set_f!(data.rehab_extension, "rehab_extension");
        set_f!(data.rehab_extension_duration, "rehab_extension_duration");
        set_f!(data.member_resume_to_work, "member_resume_to_work");
        set_f!(data.technician_feedback_form, "technician_feedback_form");
        set_f!(data.discharged_hi, "discharged_hi");
        set_f!(data.dod_hi, "dod_hi");
        set_f!(data.source, "source");
        set_f!(data.case_type_change, "case_type_change");
        set_f!(data.discharge_comments, "discharge_comments");
        set_f!(data.case_type_change_comments, "case_type_change_comments");

        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        qb.build_query_as::<IpAdmission>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("IP admission {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<IpAdmission> {
        sqlx::query_as::<_, IpAdmission>("DELETE FROM ip_admissions WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("IP admission {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_spans_free_text_columns() {
        let query = IpAdmissionQuery {
            search: Some(" rashid ".into()),
            discharged_hi: Some(false),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM ip_admissions WHERE TRUE");
        IpAdmissionsRepository::push_list_filters(&mut qb, &LocationScope::All, &query);
        let sql = qb.sql();
        assert!(sql.contains(" AND discharged_hi = $1"));
        assert!(sql.contains("hi_managers ILIKE $2 OR treatment_undergone ILIKE $3"));
        assert!(sql.contains("technician_visits::text ILIKE"));
        assert_eq!(sql.matches("ILIKE").count(), SEARCH_COLUMNS.len());
    }
}
