//! Business logic services

pub mod auth;
pub mod employees;
pub mod feedback;
pub mod hospitals;
pub mod ip_admissions;
pub mod isolations;
pub mod patients;
pub mod professions;
pub mod redis;
pub mod reports;
pub mod tokens;
pub mod visits;

use std::sync::Arc;

use crate::{
    config::{AuthConfig, TokensConfig},
    repository::Repository,
};

use self::tokens::{CounterStore, LocationCodes, TokenSequencer};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub auth: auth::AuthService,
    pub visits: visits::VisitsService,
    pub reports: reports::ReportsService,
    pub hospitals: hospitals::HospitalsService,
    pub isolations: isolations::IsolationsService,
    pub ip_admissions: ip_admissions::IpAdmissionsService,
    pub feedback: feedback::FeedbackService,
    pub employees: employees::EmployeesService,
    pub patients: patients::PatientsService,
    pub professions: professions::ProfessionsService,
}

impl Services {
    /// Create all services with the given repository and counter store
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        tokens_config: &TokensConfig,
        counter_store: Arc<dyn CounterStore>,
    ) -> Self {
        let sequencer = TokenSequencer::new(
            counter_store,
            LocationCodes::new(&tokens_config.location_codes),
        );

        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            visits: visits::VisitsService::new(repository.clone(), sequencer),
            reports: reports::ReportsService::new(repository.clone()),
            hospitals: hospitals::HospitalsService::new(repository.clone()),
            isolations: isolations::IsolationsService::new(repository.clone()),
            ip_admissions: ip_admissions::IpAdmissionsService::new(repository.clone()),
            feedback: feedback::FeedbackService::new(repository.clone()),
            employees: employees::EmployeesService::new(repository.clone()),
            patients: patients::PatientsService::new(repository.clone()),
            professions: professions::ProfessionsService::new(repository.clone()),
            repository,
        }
    }
}
