//! Environment-backed configuration, loaded once in `main` and injected
//! through `AppState`.

use anyhow::{anyhow, Result};

use crate::security::jwt::JwtAlgorithm;

#[derive(Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub jwt: JwtSettings,
    pub smtp: SmtpConfig,
}

#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub algorithm: JwtAlgorithm,
    pub expiration_hours: i64,
}

/// SMTP settings are all optional: when any of host, username, password or
/// recipient is absent, escalation email is skipped without failing requests.
#[derive(Clone, Default)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub support_email: Option<String>,
}

impl SmtpConfig {
    pub fn is_configured(&self) -> bool {
        self.host.is_some()
            && self.username.is_some()
            && self.password.is_some()
            && self.support_email.is_some()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let get = |key: &str| std::env::var(key).ok();
        let get_or = |key: &str, default: &str| {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let secret = get("JWT_SECRET").ok_or_else(|| anyhow!("JWT_SECRET is not set"))?;
        let algorithm = get_or("JWT_ALGORITHM", "HS256").parse()?;
        let expiration_hours = get_or("JWT_EXPIRATION_HOURS", "24")
            .parse()
            .map_err(|e| anyhow!("Invalid JWT_EXPIRATION_HOURS: {e}"))?;

        Ok(Self {
            server: ServerConfig {
                host: get_or("SERVER_HOST", "127.0.0.1"),
                port: get_or("SERVER_PORT", "8001")
                    .parse()
                    .map_err(|e| anyhow!("Invalid SERVER_PORT: {e}"))?,
            },
            jwt: JwtSettings {
                secret,
                algorithm,
                expiration_hours,
            },
            smtp: SmtpConfig {
                host: get("SMTP_HOST"),
                port: get_or("SMTP_PORT", "587")
                    .parse()
                    .map_err(|e| anyhow!("Invalid SMTP_PORT: {e}"))?,
                username: get("SMTP_USERNAME"),
                password: get("SMTP_PASSWORD"),
                support_email: get("SUPPORT_EMAIL"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smtp_configured_requires_all_fields() {
        let mut smtp = SmtpConfig {
            host: Some("smtp.example.com".into()),
            port: 587,
            username: Some("mailer".into()),
            password: Some("secret".into()),
            support_email: Some("support@example.com".into()),
        };
        assert!(smtp.is_configured());

        smtp.password = None;
        assert!(!smtp.is_configured());
    }
}
