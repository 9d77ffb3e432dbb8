//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, employees, feedback, health, hospitals, ip_admissions, isolations, patients, professions,
    visits,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clinic Records API",
        version = "1.0.0",
        description = "Occupational-health clinic records REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Visits
        visits::create_visit,
        visits::list_visits,
        visits::my_location_visits,
        visits::search_visits,
        visits::manager_prioritized,
        visits::employee_info,
        visits::employee_summary,
        visits::employee_history,
        visits::get_visit,
        visits::update_visit,
        visits::delete_visit,
        // Hospitals
        hospitals::create_hospital,
        hospitals::list_hospitals,
        hospitals::my_location_hospitals,
        hospitals::discharge_status,
        hospitals::employee_search,
        hospitals::get_hospital,
        hospitals::update_hospital,
        hospitals::delete_hospital,
        // Isolations
        isolations::create_isolation,
        isolations::list_isolations,
        isolations::my_location_isolations,
        isolations::get_isolation,
        isolations::update_isolation,
        isolations::delete_isolation,
        // IP admissions
        ip_admissions::create_ip_admission,
        ip_admissions::create_from_hospital_case,
        ip_admissions::create_manual,
        ip_admissions::list_ip_admissions,
        ip_admissions::get_ip_admission,
        ip_admissions::update_ip_admission,
        ip_admissions::delete_ip_admission,
        // Member feedback
        feedback::create_feedback,
        feedback::list_feedback,
        // Employees
        employees::create_employee,
        employees::list_employees,
        employees::leave_eligibility,
        employees::get_employee,
        employees::update_employee,
        employees::delete_employee,
        // Patients
        patients::create_patient,
        patients::list_patients,
        patients::all_patients,
        patients::patient_by_emp_id,
        patients::patients_by_tr_location,
        patients::get_patient,
        patients::update_patient,
        patients::delete_patient,
        // Professions
        professions::search_professions,
        professions::create_profession,
        professions::list_categories,
        professions::category_members,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::user::UserInfo,
            crate::models::user::Role,
            // Visits
            crate::models::visit::ClinicVisit,
            crate::models::visit::VisitPayload,
            crate::models::visit::Medicine,
            crate::models::visit::FollowUpVisit,
            crate::models::visit::EmployeeInfo,
            crate::models::report::EmployeeSummary,
            crate::models::report::RecentVisits,
            crate::models::report::ProviderVisit,
            crate::models::report::HistoryEntry,
            crate::models::report::PrioritizedResponse,
            crate::models::report::PrioritizedVisit,
            crate::models::report::PrioritizedMeta,
            // Hospitals
            crate::models::hospital::Hospital,
            crate::models::hospital::HospitalPayload,
            crate::models::hospital::HospitalFollowUp,
            // Isolations
            crate::models::isolation::Isolation,
            crate::models::isolation::IsolationPayload,
            // IP admissions
            crate::models::ip_admission::IpAdmission,
            crate::models::ip_admission::IpAdmissionPayload,
            crate::models::ip_admission::IpAdmissionWithName,
            crate::models::ip_admission::TechnicianVisit,
            // Member feedback
            crate::models::feedback::MemberFeedback,
            crate::models::feedback::CreateFeedback,
            // Employees
            crate::models::employee::EmployeeRecord,
            crate::models::employee::EmployeePayload,
            crate::models::employee::LeaveEligibility,
            // Patients
            crate::models::patient::Patient,
            crate::models::patient::PatientPayload,
            // Professions
            crate::models::profession::Profession,
            crate::models::profession::CreateProfession,
            crate::models::profession::ProfessionMatches,
            crate::models::profession::CategoryMembers,
            // Common
            crate::models::PageMeta,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "visits", description = "Clinic visits and daily tokens"),
        (name = "hospitals", description = "Hospital admissions"),
        (name = "isolations", description = "Isolation tracking"),
        (name = "ip-admissions", description = "H&I inpatient follow-up"),
        (name = "member-feedback", description = "Follow-up calls to employees"),
        (name = "employees", description = "Employee leave metadata"),
        (name = "patients", description = "Employee master directory"),
        (name = "professions", description = "Profession names by category")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_visit_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/visits"));
        assert!(doc.paths.paths.contains_key("/visits/manager/prioritized"));
        assert!(doc.paths.paths.contains_key("/ip-admissions/from-hospital-case"));
        assert!(doc.paths.paths.contains_key("/patients/emp/{emp_id}"));
        assert!(doc.paths.paths.contains_key("/professions/category/{name}"));
    }
}
