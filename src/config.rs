use serde::Deserialize;

const DEFAULT_TTL_MINUTES: i64 = 60 * 24 * 30;
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Parses `JWT_TTL_MINUTES`, falling back to 30 days and capping at one year.
fn ttl_minutes_from(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|m| *m > 0)
        .map(|m| m.min(MAX_TTL_MINUTES))
        .unwrap_or(DEFAULT_TTL_MINUTES)
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    pub secure: bool,
}

/// Credentials for the admin account created at startup, if configured.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub cookie: CookieConfig,
    pub admin_seed: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "profilehub".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "profilehub-users".into()),
            ttl_minutes: ttl_minutes_from(std::env::var("JWT_TTL_MINUTES").ok().as_deref()),
        };

        let development = std::env::var("APP_ENV")
            .map(|v| v == "development")
            .unwrap_or(false);
        let cookie = CookieConfig {
            secure: std::env::var("COOKIE_SECURE")
                .ok()
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(!development),
        };

        let admin_seed = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminSeed {
                    name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".into()),
                    email,
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt,
            cookie,
            admin_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_to_thirty_days() {
        assert_eq!(ttl_minutes_from(None), DEFAULT_TTL_MINUTES);
        assert_eq!(ttl_minutes_from(Some("soon")), DEFAULT_TTL_MINUTES);
        assert_eq!(ttl_minutes_from(Some("0")), DEFAULT_TTL_MINUTES);
        assert_eq!(ttl_minutes_from(Some("-5")), DEFAULT_TTL_MINUTES);
    }

    #[test]
    fn ttl_is_capped_at_one_year() {
        assert_eq!(ttl_minutes_from(Some(" 90 ")), 90);
        assert_eq!(ttl_minutes_from(Some("9223372036854775807")), MAX_TTL_MINUTES);
    }
}
