//! User model, roles and location scoping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

use crate::error::AppError;

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Clinic nurse bound to a single location
    #[serde(alias = "maleNurse")]
    Nurse,
    /// H&I manager responsible for a set of locations
    Manager,
    Superadmin,
    /// Any other staff account
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Nurse => "nurse",
            Role::Manager => "manager",
            Role::Superadmin => "superadmin",
            Role::Staff => "staff",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nurse" | "malenurse" => Ok(Role::Nurse),
            "manager" => Ok(Role::Manager),
            "superadmin" => Ok(Role::Superadmin),
            "staff" => Ok(Role::Staff),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

// SQLx conversion for Role (stored as VARCHAR)
impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Stored user account
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    /// Clinic location the user works at (nurses)
    pub location_id: Option<String>,
    /// Locations a manager is responsible for
    pub manager_locations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub name: String,
    pub role: Role,
    pub location_id: Option<String>,
    #[serde(default)]
    pub manager_locations: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Caller's own location, trimmed; `None` when unset or blank
    pub fn own_location(&self) -> Option<&str> {
        self.location_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Manager locations with blanks removed
    pub fn manager_locations(&self) -> Vec<String> {
        self.manager_locations
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn is_manager(&self) -> bool {
        matches!(self.role, Role::Manager | Role::Superadmin)
    }

    /// Require manager or superadmin role
    pub fn require_manager(&self) -> Result<(), AppError> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(AppError::Authorization("Forbidden".to_string()))
        }
    }

    /// Manager locations, or 403 when none are assigned
    pub fn require_manager_locations(&self) -> Result<Vec<String>, AppError> {
        let locations = self.manager_locations();
        if locations.is_empty() {
            return Err(AppError::Authorization(
                "Manager has no assigned locations".to_string(),
            ));
        }
        Ok(locations)
    }

    /// Own location, or 400 when the account has none
    pub fn require_location(&self) -> Result<&str, AppError> {
        self.own_location()
            .ok_or_else(|| AppError::BadRequest("User has no locationId".to_string()))
    }

    /// Location filter to apply to list queries for this caller
    pub fn scope(&self, requested: Option<&str>) -> LocationScope {
        let requested = requested.map(str::trim).filter(|s| !s.is_empty());
        match self.role {
            Role::Nurse => LocationScope::Only(
                self.own_location().map(|l| vec![l.to_string()]).unwrap_or_default(),
            ),
            Role::Manager | Role::Superadmin => {
                let allowed = self.manager_locations();
                match requested {
                    Some(loc) if allowed.iter().any(|a| a == loc) => {
                        LocationScope::Only(vec![loc.to_string()])
                    }
                    _ => LocationScope::Only(allowed),
                }
            }
            Role::Staff => match requested {
                Some(loc) => LocationScope::Only(vec![loc.to_string()]),
                None => LocationScope::All,
            },
        }
    }
}

/// Set of locations a query may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationScope {
    All,
    /// Restricted to these locations (empty means nothing is visible)
    Only(Vec<String>),
}

impl LocationScope {
    /// Locations to bind into a `location_id = ANY($n)` condition
    pub fn locations(&self) -> Option<&[String]> {
        match self {
            LocationScope::All => None,
            LocationScope::Only(locs) => Some(locs),
        }
    }
}

/// Public view of the authenticated user
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub location_id: Option<String>,
    pub manager_locations: Vec<String>,
}

impl From<User> for UserInfo {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            username: u.username,
            role: u.role,
            location_id: u.location_id,
            manager_locations: u.manager_locations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role, location: Option<&str>, managed: &[&str]) -> UserClaims {
        UserClaims {
            sub: "tester".into(),
            user_id: 1,
            name: "Tester".into(),
            role,
            location_id: location.map(String::from),
            manager_locations: managed.iter().map(|s| s.to_string()).collect(),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_nurse_scope_ignores_requested_location() {
        let c = claims(Role::Nurse, Some("AL QOUZ"), &[]);
        assert_eq!(
            c.scope(Some("SAJJA")),
            LocationScope::Only(vec!["AL QOUZ".to_string()])
        );
    }

    #[test]
    fn test_nurse_without_location_sees_nothing() {
        let c = claims(Role::Nurse, None, &[]);
        assert_eq!(c.scope(None), LocationScope::Only(vec![]));
    }

    #[test]
    fn test_manager_scope() {
        let c = claims(Role::Manager, None, &["SAJJA", "RAHABA"]);
        assert_eq!(
            c.scope(Some("RAHABA")),
            LocationScope::Only(vec!["RAHABA".to_string()])
        );
        // Outside their locations falls back to all managed locations
        assert_eq!(
            c.scope(Some("AL QOUZ")),
            LocationScope::Only(vec!["SAJJA".to_string(), "RAHABA".to_string()])
        );
        assert_eq!(
            c.scope(None),
            LocationScope::Only(vec!["SAJJA".to_string(), "RAHABA".to_string()])
        );
    }

    #[test]
    fn test_staff_scope() {
        let c = claims(Role::Staff, None, &[]);
        assert_eq!(c.scope(None), LocationScope::All);
        assert_eq!(
            c.scope(Some("SAIF")),
            LocationScope::Only(vec!["SAIF".to_string()])
        );
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("maleNurse".parse::<Role>().unwrap(), Role::Nurse);
        assert_eq!("SuperAdmin".parse::<Role>().unwrap(), Role::Superadmin);
        assert!("doctor".parse::<Role>().is_err());

        let r: Role = serde_json::from_str("\"maleNurse\"").unwrap();
        assert_eq!(r, Role::Nurse);
    }

    #[test]
    fn test_token_roundtrip() {
        let mut c = claims(Role::Manager, None, &["SAJJA"]);
        c.exp = chrono::Utc::now().timestamp() + 3600;
        let token = c.create_token("secret").unwrap();
        let back = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(back.role, Role::Manager);
        assert_eq!(back.manager_locations, vec!["SAJJA".to_string()]);
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_require_manager_locations() {
        assert!(claims(Role::Manager, None, &[" "]).require_manager_locations().is_err());
        assert!(claims(Role::Nurse, Some("SAJJA"), &[]).require_manager().is_err());
    }
}
