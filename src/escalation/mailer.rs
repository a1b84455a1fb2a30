//! Escalation email delivery over authenticated STARTTLS SMTP.

use lettre::{
    message::{header::ContentType, Message},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use tracing::debug;

use crate::config::SmtpConfig;
use crate::shared::models::Escalation;

/// One-shot send result. `Skipped` means SMTP was not configured; no retry
/// policy exists at any level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed(String),
    Skipped,
}

#[derive(Clone)]
pub struct EscalationMailer {
    config: SmtpConfig,
}

impl EscalationMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Sends the notification email for an escalation, blocking on the SMTP
    /// session. Callers run this on a blocking task.
    pub fn send(&self, escalation: &Escalation) -> DeliveryOutcome {
        if !self.config.is_configured() {
            debug!("SMTP not configured, skipping escalation email");
            return DeliveryOutcome::Skipped;
        }
        // is_configured() guarantees these are present.
        let (Some(host), Some(username), Some(password), Some(support_email)) = (
            self.config.host.as_deref(),
            self.config.username.as_deref(),
            self.config.password.as_deref(),
            self.config.support_email.as_deref(),
        ) else {
            return DeliveryOutcome::Skipped;
        };

        match self.try_send(escalation, host, username, password, support_email) {
            Ok(()) => DeliveryOutcome::Sent,
            Err(e) => DeliveryOutcome::Failed(e),
        }
    }

    fn try_send(
        &self,
        escalation: &Escalation,
        host: &str,
        username: &str,
        password: &str,
        support_email: &str,
    ) -> Result<(), String> {
        let body = format!(
            "New escalation received:\n\n\
             Session ID: {}\n\
             Guide ID: {}\n\
             Step ID: {}\n\
             Category: {}\n\n\
             Customer Message:\n{}\n\n\
             Contact Information:\n{}\n",
            escalation.session_id,
            escalation.guide_id,
            escalation.step_id,
            escalation.category,
            escalation.message,
            escalation.contact,
        );

        let email = Message::builder()
            .from(
                username
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(support_email
                .parse()
                .map_err(|e| format!("Invalid to address: {e}"))?)
            .subject(format!(
                "Escalation: {} - {}",
                escalation.category, escalation.step_id
            ))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| format!("Failed to build email: {e}"))?;

        let mailer = SmtpTransport::starttls_relay(host)
            .map_err(|e| format!("SMTP relay error: {e}"))?
            .port(self.config.port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        mailer
            .send(&email)
            .map(|_| ())
            .map_err(|e| format!("Failed to send email: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn sample_escalation() -> Escalation {
        Escalation::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "step-3".into(),
            "billing".into(),
            "charged twice".into(),
            vec![],
            json!({"email": "cust@example.com"}),
        )
    }

    #[test]
    fn unconfigured_smtp_skips() {
        let mailer = EscalationMailer::new(SmtpConfig::default());
        assert_eq!(mailer.send(&sample_escalation()), DeliveryOutcome::Skipped);
    }

    #[test]
    fn partially_configured_smtp_skips() {
        let mailer = EscalationMailer::new(SmtpConfig {
            host: Some("smtp.example.com".into()),
            port: 587,
            username: Some("mailer".into()),
            password: None,
            support_email: Some("support@example.com".into()),
        });
        assert_eq!(mailer.send(&sample_escalation()), DeliveryOutcome::Skipped);
    }
}
