//! H&I inpatient admission follow-up

use crate::{
    error::{AppError, AppResult},
    models::{
        ip_admission::{IpAdmission, IpAdmissionPayload, IpAdmissionQuery, IpAdmissionWithName},
        LocationScope, PageMeta, Role, UserClaims,
    },
    repository::Repository,
};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone)]
pub struct IpAdmissionsService {
    repository: Repository,
}

fn not_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Page and limit for admission lists; limit is clamped to 1..=100
fn list_page(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

/// Managers see the cases whose trLocation is one of theirs
fn admission_scope(claims: &UserClaims) -> LocationScope {
    let locations = claims.manager_locations();
    if claims.role == Role::Manager && !locations.is_empty() {
        LocationScope::Only(locations)
    } else {
        LocationScope::All
    }
}

impl IpAdmissionsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn ensure_hospital_exists(&self, hospital_case: Option<i32>) -> AppResult<()> {
        if let Some(id) = hospital_case {
            if self.repository.hospitals.find_by_id(id).await?.is_none() {
                return Err(AppError::NotFound(
                    "Referenced hospitalCase not found".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub async fn create(&self, claims: &UserClaims, mut payload: IpAdmissionPayload) -> AppResult<IpAdmission> {
        claims.require_manager()?;
        payload.normalize();
        self.ensure_hospital_exists(payload.hospital_case).await?;

        let admission = self.repository.ip_admissions.create(&payload).await?;
        tracing::info!(ip_admission_id = admission.id, "IP admission created");
        Ok(admission)
    }

    /// Open a case from an existing hospital record
    pub async fn create_from_hospital_case(
        &self,
        claims: &UserClaims,
        payload: IpAdmissionPayload,
    ) -> AppResult<IpAdmissionWithName> {
        claims.require_manager()?;

        let hospital_id = payload
            .hospital_case
            .ok_or_else(|| AppError::BadRequest("hospitalCase is required".to_string()))?;
        if !not_blank(&payload.hi_managers) || !not_blank(&payload.case_type_change) {
            return Err(AppError::BusinessRule(
                "hiManagers and caseTypeChange are required".to_string(),
            ));
        }

        let hospital = self
            .repository
            .hospitals
            .find_by_id(hospital_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Referenced hospitalCase not found".to_string()))?;
        if hospital.emp_no.trim().is_empty() {
            return Err(AppError::BusinessRule(
                "Referenced hospitalCase has no empNo".to_string(),
            ));
        }

        let mut data = IpAdmissionPayload {
            hospital_case: Some(hospital.id),
            emp_no: Some(hospital.emp_no.clone()),
            hi_managers: payload.hi_managers,
            case_type_change: payload.case_type_change,
            hospital_name: payload.hospital_name.or(hospital.hospital_name),
            date_of_admission: payload.date_of_admission.or(hospital.date_of_admission),
            ..Default::default()
        };
        data.normalize();

        let admission = self.repository.ip_admissions.create(&data).await?;
        tracing::info!(
            ip_admission_id = admission.id,
            hospital_id,
            "IP admission opened from hospital case"
        );
        Ok(IpAdmissionWithName {
            admission,
            employee_name: hospital.employee_name,
        })
    }

    /// Manual entry for an employee without a hospital record
    pub async fn create_manual(
        &self,
        claims: &UserClaims,
        mut payload: IpAdmissionPayload,
    ) -> AppResult<IpAdmission> {
        claims.require_manager()?;
        payload.normalize();

        match payload.first_missing_manual_field() {
            Some("technicianVisits") => {
                return Err(AppError::BusinessRule(
                    "technicianVisits must be an array".to_string(),
                ));
            }
            Some(field) => {
                return Err(AppError::BusinessRule(format!("{} is required", field)));
            }
            None => {}
        }

        let data = IpAdmissionPayload {
            emp_no: payload.emp_no,
            hi_managers: payload.hi_managers,
            case_type_change: payload.case_type_change,
            hospital_name: payload.hospital_name,
            date_of_admission: payload.date_of_admission,
            treatment_undergone: payload.treatment_undergone,
            technician_visits: payload.technician_visits.map(|visits| {
                visits
                    .into_iter()
                    .map(|mut v| {
                        v.technician_feedback = v
                            .technician_feedback
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty());
                        v.physician_feedback = v
                            .physician_feedback
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty());
                        v
                    })
                    .collect()
            }),
            ..Default::default()
        };

        let admission = self.repository.ip_admissions.create(&data).await?;
        tracing::info!(ip_admission_id = admission.id, "Manual IP admission created");
        Ok(admission)
    }

    pub async fn list(
        &self,
        claims: &UserClaims,
        query: &IpAdmissionQuery,
    ) -> AppResult<(Vec<IpAdmission>, PageMeta)> {
        claims.require_manager()?;
        let (page, limit) = list_page(query.page, query.limit);
        let scope = admission_scope(claims);
        let (items, total) = self
            .repository
            .ip_admissions
            .list(&scope, query, page, limit)
            .await?;
        Ok((items, PageMeta { total, page, limit }))
    }

    pub async fn get(&self, claims: &UserClaims, id: i32) -> AppResult<IpAdmission> {
        claims.require_manager()?;
        self.repository.ip_admissions.get_by_id(id).await
    }

    pub async fn update(
        &self,
        claims: &UserClaims,
        id: i32,
        mut payload: IpAdmissionPayload,
    ) -> AppResult<IpAdmission> {
        claims.require_manager()?;
        payload.normalize();
        self.ensure_hospital_exists(payload.hospital_case).await?;
        self.repository.ip_admissions.update(id, &payload).await
    }

    pub async fn delete(&self, claims: &UserClaims, id: i32) -> AppResult<IpAdmission> {
        claims.require_manager()?;
        let admission = self.repository.ip_admissions.delete(id).await?;
        tracing::info!(ip_admission_id = id, "IP admission deleted");
        Ok(admission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role, locations: &[&str]) -> UserClaims {
        UserClaims {
            sub: "u".into(),
            user_id: 1,
            name: "U".into(),
            role,
            location_id: None,
            manager_locations: locations.iter().map(|s| s.to_string()).collect(),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(list_page(None, None), (1, 20));
        assert_eq!(list_page(Some(0), Some(500)), (1, 100));
        assert_eq!(list_page(Some(3), Some(0)), (3, 1));
    }

    #[test]
    fn test_manager_scope_uses_locations() {
        let scope = admission_scope(&claims(Role::Manager, &["SAJJA", " "]));
        assert_eq!(scope, LocationScope::Only(vec!["SAJJA".to_string()]));
    }

    #[test]
    fn test_superadmin_and_unassigned_manager_see_all() {
        assert_eq!(admission_scope(&claims(Role::Superadmin, &["SAJJA"])), LocationScope::All);
        assert_eq!(admission_scope(&claims(Role::Manager, &[])), LocationScope::All);
    }
}
