//! Repository layer for database operations

pub mod counters;
pub mod employees;
pub mod feedback;
pub mod hospitals;
pub mod ip_admissions;
pub mod isolations;
pub mod patients;
pub mod professions;
pub mod users;
pub mod visits;

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::models::LocationScope;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub counters: counters::CountersRepository,
    pub users: users::UsersRepository,
    pub visits: visits::VisitsRepository,
    pub hospitals: hospitals::HospitalsRepository,
    pub isolations: isolations::IsolationsRepository,
    pub ip_admissions: ip_admissions::IpAdmissionsRepository,
    pub feedback: feedback::FeedbackRepository,
    pub employees: employees::EmployeesRepository,
    pub patients: patients::PatientsRepository,
    pub professions: professions::ProfessionsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            counters: counters::CountersRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            visits: visits::VisitsRepository::new(pool.clone()),
            hospitals: hospitals::HospitalsRepository::new(pool.clone()),
            isolations: isolations::IsolationsRepository::new(pool.clone()),
            ip_admissions: ip_admissions::IpAdmissionsRepository::new(pool.clone()),
            feedback: feedback::FeedbackRepository::new(pool.clone()),
            employees: employees::EmployeesRepository::new(pool.clone()),
            patients: patients::PatientsRepository::new(pool.clone()),
            professions: professions::ProfessionsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Append `AND <column> = ANY($n)` unless the scope is unrestricted
pub(crate) fn push_location_scope(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    scope: &LocationScope,
) {
    if let Some(locations) = scope.locations() {
        qb.push(format!(" AND {} = ANY(", column))
            .push_bind(locations.to_vec())
            .push(")");
    }
}

/// Append `LIMIT/OFFSET` for a 1-based page
pub(crate) fn push_page(qb: &mut QueryBuilder<'_, Postgres>, page: i64, limit: i64) {
    qb.push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind((page - 1) * limit);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_sql() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM t WHERE TRUE");
        push_location_scope(&mut qb, "location_id", &LocationScope::All);
        assert_eq!(qb.sql(), "SELECT * FROM t WHERE TRUE");

        push_location_scope(
            &mut qb,
            "location_id",
            &LocationScope::Only(vec!["SAJJA".to_string()]),
        );
        push_page(&mut qb, 3, 20);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM t WHERE TRUE AND location_id = ANY($1) LIMIT $2 OFFSET $3"
        );
    }
}
