//! Clinic visit intake service

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{
        page_params, parse_date,
        visit::{ClinicVisit, EmployeeInfo, VisitPayload, VisitQuery},
        PageMeta, UserClaims,
    },
    repository::Repository,
};

use super::tokens::{TokenRequest, TokenSequencer};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MY_LOCATION_PAGE_SIZE: i64 = 50;
const SEARCH_MAX_ROWS: i64 = 200;

#[derive(Clone)]
pub struct VisitsService {
    repository: Repository,
    sequencer: TokenSequencer,
}

/// Use the token as referral code when a referral has none
fn apply_referral_code(payload: &mut VisitPayload, token_no: Option<&str>) {
    if payload.is_referral() && !payload.has_referral_code() {
        payload.referral_code = token_no.map(String::from);
    }
}

impl VisitsService {
    pub fn new(repository: Repository, sequencer: TokenSequencer) -> Self {
        Self {
            repository,
            sequencer,
        }
    }

    /// Record a new visit, generating its token when none was supplied
    pub async fn create(&self, claims: &UserClaims, mut payload: VisitPayload) -> AppResult<ClinicVisit> {
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

        let has_token = payload
            .token_no
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        if !has_token {
            let location = claims.require_location()?;
            let token = self
                .sequencer
                .generate(&TokenRequest {
                    location_id: location.to_string(),
                    sent_to: payload.sent_to.clone(),
                    eligible_for_sick_leave: payload.eligibility_for_sick_leave.unwrap_or(false),
                })
                .await?;
            payload.token_no = Some(token);
        }

        let token_no = payload.token_no.clone();
        apply_referral_code(&mut payload, token_no.as_deref());

        let visit = self.repository.visits.create(&payload, claims.user_id).await?;
        tracing::info!(
            visit_id = visit.id,
            token_no = visit.token_no.as_deref().unwrap_or_default(),
            location = visit.location_id.as_deref().unwrap_or_default(),
            "Clinic visit created"
        );
        Ok(visit)
    }

    /// List visits visible to the caller
    pub async fn list(
        &self,
        claims: &UserClaims,
        query: &VisitQuery,
    ) -> AppResult<(Vec<ClinicVisit>, PageMeta)> {
        let (page, limit) = page_params(query.page, query.limit, DEFAULT_PAGE_SIZE);
        let scope = claims.scope(query.location_id.as_deref());
        let (items, total) = self.repository.visits.list(&scope, query, page, limit).await?;
        Ok((items, PageMeta { total, page, limit }))
    }

    pub async fn get(&self, id: i32) -> AppResult<ClinicVisit> {
        self.repository.visits.get_by_id(id).await
    }

    /// Partial update; a referral without a code takes the stored token
    pub async fn update(&self, id: i32, mut payload: VisitPayload) -> AppResult<ClinicVisit> {
        let existing = self.repository.visits.get_by_id(id).await?;
        payload.normalize();
        apply_referral_code(&mut payload, existing.token_no.as_deref());
        self.repository.visits.update(id, &payload).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<ClinicVisit> {
        let visit = self.repository.visits.delete(id).await?;
        tracing::info!(visit_id = id, "Clinic visit deleted");
        Ok(visit)
    }

    /// Visits at the caller's own location
    pub async fn my_location(
        &self,
        claims: &UserClaims,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<(Vec<ClinicVisit>, PageMeta)> {
        let location = claims.require_location()?;
        let (page, limit) = page_params(page, limit, MY_LOCATION_PAGE_SIZE);
        let (items, total) = self
            .repository
            .visits
            .list_for_location(location, page, limit)
            .await?;
        Ok((items, PageMeta { total, page, limit }))
    }

    /// Employee details of the visit holding a token
    pub async fn employee_info(&self, token_no: &str) -> AppResult<EmployeeInfo> {
        self.repository
            .visits
            .get_by_token(token_no.trim())
            .await?
            .map(EmployeeInfo::from)
            .ok_or_else(|| AppError::NotFound("Employee not found for this token".to_string()))
    }

    /// Visits by employee number and/or calendar day
    pub async fn search(
        &self,
        claims: &UserClaims,
        emp_no: Option<&str>,
        date: Option<&str>,
    ) -> AppResult<Vec<ClinicVisit>> {
        let emp_no = emp_no
            .map(|e| e.trim().to_uppercase())
            .filter(|e| !e.is_empty());
        let date_raw = date.map(str::trim).filter(|d| !d.is_empty());

        if emp_no.is_none() && date_raw.is_none() {
            return Err(AppError::BadRequest("Provide empNo, date, or both".to_string()));
        }
        let date: Option<NaiveDate> = match date_raw {
            Some(raw) => Some(
                parse_date(raw)
                    .ok_or_else(|| AppError::BadRequest(format!("Invalid date: {}", raw)))?,
            ),
            None => None,
        };

        let scope = claims.scope(None);
        self.repository
            .visits
            .search(&scope, emp_no.as_deref(), date, SEARCH_MAX_ROWS)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referral_code_defaults_to_token() {
        let mut payload = VisitPayload {
            referral: Some(true),
            ..Default::default()
        };
        apply_referral_code(&mut payload, Some("QOZ-0512-0003"));
        assert_eq!(payload.referral_code.as_deref(), Some("QOZ-0512-0003"));
    }

    #[test]
    fn test_existing_referral_code_is_kept() {
        let mut payload = VisitPayload {
            referred_to_hospital: Some("Rashid Hospital".into()),
            referral_code: Some("REF-1".into()),
            ..Default::default()
        };
        apply_referral_code(&mut payload, Some("QOZ-0512-0003"));
        assert_eq!(payload.referral_code.as_deref(), Some("REF-1"));
    }

    #[test]
    fn test_no_referral_no_code() {
        let mut payload = VisitPayload::default();
        apply_referral_code(&mut payload, Some("QOZ-0512-0003"));
        assert_eq!(payload.referral_code, None);
    }
}
