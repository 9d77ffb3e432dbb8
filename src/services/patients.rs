//! Patient directory

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        page_params,
        patient::{Patient, PatientPayload, PatientQuery},
        PageMeta,
    },
    repository::Repository,
};

const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Clone)]
pub struct PatientsService {
    repository: Repository,
}

fn prepare(payload: &mut PatientPayload) -> AppResult<()> {
    payload.normalize();
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

impl PatientsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, mut payload: PatientPayload) -> AppResult<Patient> {
        let missing = payload.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        prepare(&mut payload)?;
        let patient = self.repository.patients.create(&payload).await?;
        tracing::info!(patient_id = patient.id, emp_id = %patient.emp_id, "Patient created");
        Ok(patient)
    }

    pub async fn list(&self, query: &PatientQuery) -> AppResult<(Vec<Patient>, PageMeta)> {
        let (page, limit) = page_params(query.page, query.limit, DEFAULT_PAGE_SIZE);
        let (items, total) = self.repository.patients.list(query, page, limit).await?;
        Ok((items, PageMeta { total, page, limit }))
    }

    /// Every matching entry on a single page
    pub async fn list_all(&self, query: &PatientQuery) -> AppResult<(Vec<Patient>, PageMeta)> {
        let items = self.repository.patients.list_all(query).await?;
        let total = items.len() as i64;
        Ok((items, PageMeta { total, page: 1, limit: total.max(1) }))
    }

    /// Paginated entries at one TR location
    pub async fn by_tr_location(
        &self,
        tr_location: &str,
        mut query: PatientQuery,
    ) -> AppResult<(Vec<Patient>, PageMeta)> {
        query.tr_location = Some(tr_location.to_string());
        self.list(&query).await
    }

    pub async fn by_emp_id(&self, emp_id: &str) -> AppResult<Patient> {
        let emp_id = emp_id.trim().to_uppercase();
        self.repository
            .patients
            .find_by_emp_id(&emp_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))
    }

    pub async fn get(&self, id: i32) -> AppResult<Patient> {
        self.repository.patients.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, mut payload: PatientPayload) -> AppResult<Patient> {
        prepare(&mut payload)?;
        self.repository.patients.update(id, &payload).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.patients.delete(id).await?;
        tracing::info!(patient_id = id, "Patient deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_rejects_bad_mobile() {
        let mut payload = PatientPayload {
            emp_id: Some("emp001".into()),
            mobile_number: Some("12345".into()),
            ..Default::default()
        };
        assert!(matches!(prepare(&mut payload), Err(AppError::Validation(_))));
        assert_eq!(payload.emp_id.as_deref(), Some("EMP001"));

        payload.mobile_number = Some(" 0501234567 ".into());
        assert!(prepare(&mut payload).is_ok());
    }
}
