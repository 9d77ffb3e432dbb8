//! Hospital admissions service

use crate::{
    error::{AppError, AppResult},
    models::{
        hospital::{Hospital, HospitalPayload, HospitalQuery},
        page_params, parse_date, PageMeta, UserClaims,
    },
    repository::Repository,
};

const DEFAULT_PAGE_SIZE: i64 = 20;
const LOCATION_PAGE_SIZE: i64 = 50;

#[derive(Clone)]
pub struct HospitalsService {
    repository: Repository,
}

impl HospitalsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record an admission at the caller's location
    pub async fn create(&self, claims: &UserClaims, mut payload: HospitalPayload) -> AppResult<Hospital> {
        let missing = payload.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        payload.normalize();
        if let Some(location) = claims.own_location() {
            payload.location_id = Some(location.to_string());
        }

        let hospital = self.repository.hospitals.create(&payload, claims.user_id).await?;
        tracing::info!(
            hospital_id = hospital.id,
            emp_no = %hospital.emp_no,
            "Hospital record created"
        );
        Ok(hospital)
    }

    pub async fn list(
        &self,
        claims: &UserClaims,
        query: &HospitalQuery,
    ) -> AppResult<(Vec<Hospital>, PageMeta)> {
        let (page, limit) = page_params(query.page, query.limit, DEFAULT_PAGE_SIZE);
        let scope = claims.scope(query.location_id.as_deref());
        let (items, total) = self
            .repository
            .hospitals
            .list(&scope, query, page, limit)
            .await?;
        Ok((items, PageMeta { total, page, limit }))
    }

    pub async fn get(&self, id: i32) -> AppResult<Hospital> {
        self.repository.hospitals.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, mut payload: HospitalPayload) -> AppResult<Hospital> {
        payload.normalize();
        self.repository.hospitals.update(id, &payload).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<Hospital> {
        let hospital = self.repository.hospitals.delete(id).await?;
        tracing::info!(hospital_id = id, "Hospital record deleted");
        Ok(hospital)
    }

    /// Hospital records at the caller's own location
    pub async fn my_location(
        &self,
        claims: &UserClaims,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<(Vec<Hospital>, PageMeta)> {
        let location = claims.require_location()?;
        let (page, limit) = page_params(page, limit, LOCATION_PAGE_SIZE);
        let (items, total) = self
            .repository
            .hospitals
            .list_for_location(location, page, limit)
            .await?;
        Ok((items, PageMeta { total, page, limit }))
    }

    /// Open admissions at the manager's locations without an IP admission yet
    pub async fn discharge_pending(
        &self,
        claims: &UserClaims,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<(Vec<Hospital>, PageMeta)> {
        claims.require_manager()?;
        let locations = claims.manager_locations();
        if locations.is_empty() {
            return Err(AppError::BadRequest(
                "Manager has no assigned locations".to_string(),
            ));
        }

        let (page, limit) = page_params(page, limit, LOCATION_PAGE_SIZE);
        let (items, total) = self
            .repository
            .hospitals
            .list_pending_discharge(&locations, page, limit)
            .await?;
        Ok((items, PageMeta { total, page, limit }))
    }

    /// The admission of an employee on a given day
    pub async fn find_by_employee_and_date(
        &self,
        emp_no: Option<&str>,
        date: Option<&str>,
    ) -> AppResult<Hospital> {
        let emp_no = emp_no
            .map(|e| e.trim().to_uppercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::BadRequest("Employee ID (empNo) is required".to_string()))?;
        let raw = date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| AppError::BadRequest("Date is required".to_string()))?;
        let date = parse_date(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid date: {}", raw)))?;

        self.repository
            .hospitals
            .find_by_employee_and_date(&emp_no, date)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    "No hospital record found for this employee on the specified date".to_string(),
                )
            })
    }
}
