use std::env;

/// Longest admin session allowed, one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_password: String,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub static_dir: String,
    pub notify_webhook_url: Option<String>,
    pub notify_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "data/bookings.sqlite".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "changeme".to_string()),
            session_ttl_hours: session_ttl_hours(env::var("SESSION_TTL_HOURS").ok().as_deref()),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            notify_timeout_secs: env::var("NOTIFY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(5),
        }
    }
}

/// Parses `SESSION_TTL_HOURS`, defaulting to 12 and clamped to at most a year.
fn session_ttl_hours(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|h| *h > 0)
        .map(|h| h.min(MAX_SESSION_TTL_HOURS))
        .unwrap_or(12)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ttl_bounds() {
        assert_eq!(session_ttl_hours(None), 12);
        assert_eq!(session_ttl_hours(Some("48")), 48);
        assert_eq!(session_ttl_hours(Some("0")), 12);
        assert_eq!(session_ttl_hours(Some("-3")), 12);
        assert_eq!(session_ttl_hours(Some("soon")), 12);
        assert_eq!(session_ttl_hours(Some("10000000000")), MAX_SESSION_TTL_HOURS);
        assert_eq!(session_ttl_hours(Some("99999999999999999999")), 12);
    }
}
