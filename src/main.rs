//! Clinic Records Server
//!
//! REST backend for occupational-health clinics.

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_server::{
    api,
    config::{AppConfig, CounterBackend},
    repository::Repository,
    services::{redis::RedisService, tokens::CounterStore, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("clinic_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Clinic Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database migrations completed");

    let repository = Repository::new(pool);

    let counter_store: Arc<dyn CounterStore> = match config.tokens.counter_backend {
        CounterBackend::Redis => {
            let redis = RedisService::new(&config.redis.url).await?;
            tracing::info!("Token counters stored in Redis");
            Arc::new(redis)
        }
        CounterBackend::Postgres => {
            tracing::info!("Token counters stored in Postgres");
            Arc::new(repository.counters.clone())
        }
    };

    let services = Services::new(
        repository,
        config.auth.clone(),
        &config.tokens,
        counter_store,
    );
    services.auth.ensure_bootstrap_user().await?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Clinic visits
        .route(
            "/visits",
            get(api::visits::list_visits).post(api::visits::create_visit),
        )
        .route("/visits/my-location", get(api::visits::my_location_visits))
        .route("/visits/search", get(api::visits::search_visits))
        .route(
            "/visits/manager/prioritized",
            get(api::visits::manager_prioritized),
        )
        .route(
            "/visits/employee-info/:token_no",
            get(api::visits::employee_info),
        )
        .route(
            "/visits/employees/:emp_no/summary",
            get(api::visits::employee_summary),
        )
        .route(
            "/visits/employees/:emp_no/history",
            get(api::visits::employee_history),
        )
        .route(
            "/visits/:id",
            get(api::visits::get_visit)
                .put(api::visits::update_visit)
                .delete(api::visits::delete_visit),
        )
        // Hospital admissions
        .route(
            "/hospitals",
            get(api::hospitals::list_hospitals).post(api::hospitals::create_hospital),
        )
        .route(
            "/hospitals/my-location",
            get(api::hospitals::my_location_hospitals),
        )
        .route(
            "/hospitals/manager/discharge-status",
            get(api::hospitals::discharge_status),
        )
        .route(
            "/hospitals/employee/search",
            get(api::hospitals::employee_search),
        )
        .route(
            "/hospitals/:id",
            get(api::hospitals::get_hospital)
                .put(api::hospitals::update_hospital)
                .delete(api::hospitals::delete_hospital),
        )
        // Isolations
        .route(
            "/isolations",
            get(api::isolations::list_isolations).post(api::isolations::create_isolation),
        )
        .route(
            "/isolations/my-location",
            get(api::isolations::my_location_isolations),
        )
        .route(
            "/isolations/:id",
            get(api::isolations::get_isolation)
                .put(api::isolations::update_isolation)
                .delete(api::isolations::delete_isolation),
        )
        // H&I inpatient admissions
        .route(
            "/ip-admissions",
            get(api::ip_admissions::list_ip_admissions)
                .post(api::ip_admissions::create_ip_admission),
        )
        .route(
            "/ip-admissions/from-hospital-case",
            post(api::ip_admissions::create_from_hospital_case),
        )
        .route(
            "/ip-admissions/employee-not-in-his",
            post(api::ip_admissions::create_manual),
        )
        .route(
            "/ip-admissions/:id",
            get(api::ip_admissions::get_ip_admission)
                .put(api::ip_admissions::update_ip_admission)
                .patch(api::ip_admissions::update_ip_admission)
                .delete(api::ip_admissions::delete_ip_admission),
        )
        // Member feedback
        .route(
            "/member-feedback",
            get(api::feedback::list_feedback).post(api::feedback::create_feedback),
        )
        // Employee records
        .route(
            "/employees",
            get(api::employees::list_employees).post(api::employees::create_employee),
        )
        .route(
            "/employees/:id/leave-eligibility",
            get(api::employees::leave_eligibility),
        )
        .route(
            "/employees/:id",
            get(api::employees::get_employee)
                .put(api::employees::update_employee)
                .delete(api::employees::delete_employee),
        )
        // Patient directory
        .route(
            "/patients",
            get(api::patients::list_patients).post(api::patients::create_patient),
        )
        .route("/patients/all", get(api::patients::all_patients))
        .route(
            "/patients/emp/:emp_id",
            get(api::patients::patient_by_emp_id),
        )
        .route(
            "/patients/tr/:tr_location",
            get(api::patients::patients_by_tr_location),
        )
        .route(
            "/patients/:id",
            get(api::patients::get_patient)
                .put(api::patients::update_patient)
                .delete(api::patients::delete_patient),
        )
        // Professions
        .route(
            "/professions",
            get(api::professions::search_professions).post(api::professions::create_profession),
        )
        .route(
            "/professions/categories",
            get(api::professions::list_categories),
        )
        .route(
            "/professions/category/:name",
            get(api::professions::category_members),
        )
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}
