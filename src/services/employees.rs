//! Employee leave metadata

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        employee::{EmployeePayload, EmployeeQuery, EmployeeRecord, LeaveEligibility},
        page_params, PageMeta,
    },
    repository::Repository,
};

const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Clone)]
pub struct EmployeesService {
    repository: Repository,
}

fn prepare(payload: &mut EmployeePayload) -> AppResult<()> {
    if let Some(emp) = payload.emp_no.as_mut() {
        *emp = emp.trim().to_uppercase();
    }
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

impl EmployeesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, mut payload: EmployeePayload) -> AppResult<EmployeeRecord> {
        if payload.emp_no.is_none() {
            return Err(AppError::Validation("Missing required fields: empNo".to_string()));
        }
        prepare(&mut payload)?;
        let record = self.repository.employees.create(&payload).await?;
        tracing::info!(employee_record_id = record.id, emp_no = %record.emp_no, "Employee record created");
        Ok(record)
    }

    pub async fn list(&self, query: &EmployeeQuery) -> AppResult<(Vec<EmployeeRecord>, PageMeta)> {
        let (page, limit) = page_params(query.page, query.limit, DEFAULT_PAGE_SIZE);
        let (items, total) = self.repository.employees.list(query, page, limit).await?;
        Ok((items, PageMeta { total, page, limit }))
    }

    pub async fn get(&self, id: i32) -> AppResult<EmployeeRecord> {
        self.repository.employees.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, mut payload: EmployeePayload) -> AppResult<EmployeeRecord> {
        prepare(&mut payload)?;
        self.repository.employees.update(id, &payload).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.employees.delete(id).await?;
        tracing::info!(employee_record_id = id, "Employee record deleted");
        Ok(())
    }

    /// Eligibility from the most recent record of an employee
    pub async fn leave_eligibility(&self, emp_no: &str) -> AppResult<LeaveEligibility> {
        let emp_no = emp_no.trim().to_uppercase();
        if emp_no.is_empty() {
            return Err(AppError::BadRequest("empNo is required".to_string()));
        }
        self.repository
            .employees
            .latest_for_emp_no(&emp_no)
            .await?
            .map(LeaveEligibility::from)
            .ok_or_else(|| AppError::NotFound(format!("No record found for employee {}", emp_no)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_uppercases_and_validates() {
        let mut payload = EmployeePayload {
            emp_no: Some(" e42 ".into()),
            sl: Some(2.0),
            ..Default::default()
        };
        prepare(&mut payload).unwrap();
        assert_eq!(payload.emp_no.as_deref(), Some("E42"));

        let mut negative = EmployeePayload {
            lop: Some(-0.5),
            ..Default::default()
        };
        assert!(matches!(prepare(&mut negative), Err(AppError::Validation(_))));
    }
}
