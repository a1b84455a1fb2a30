//! Application state shared across handlers.

use anyhow::Result;

use crate::config::AppConfig;
use crate::escalation::mailer::EscalationMailer;
use crate::security::jwt::TokenService;
use crate::store::Store;

pub struct AppState {
    pub store: Store,
    pub tokens: TokenService,
    pub mailer: EscalationMailer,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            store: Store::new(),
            tokens: TokenService::new(
                &config.jwt.secret,
                config.jwt.algorithm,
                config.jwt.expiration_hours,
            )?,
            mailer: EscalationMailer::new(config.smtp.clone()),
        })
    }
}
