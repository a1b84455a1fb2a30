//! Document models for the guided-flow collections.
//!
//! Six collections back the service: users, guides, guide_versions, sessions,
//! flow_events and escalations. Guide step content lives inside a version's
//! opaque `graph` value and is never interpreted here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Agent => "agent",
            Self::Customer => "customer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Draft,
    Review,
    Published,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guide {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    pub current_version_id: Option<Uuid>,
    pub default_locale: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
}

impl Guide {
    pub fn new(
        slug: String,
        title: String,
        category: String,
        tags: Vec<String>,
        created_by: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug,
            title,
            category,
            tags,
            current_version_id: None,
            default_locale: "en".to_string(),
            created_at: Utc::now(),
            created_by,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideVersion {
    pub id: Uuid,
    pub guide_id: Uuid,
    pub version: u32,
    pub status: VersionStatus,
    pub locales: Vec<String>,
    pub graph: Value,
    pub crm_note_template: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GuideVersion {
    pub fn new(
        guide_id: Uuid,
        version: u32,
        graph: Value,
        crm_note_template: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            guide_id,
            version,
            status: VersionStatus::Draft,
            locales: vec!["en".to_string()],
            graph,
            crm_note_template,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub role: Role,
    pub guide_version_id: Uuid,
    pub locale: String,
    pub progress: Value,
    pub customer_context: Value,
    pub crm_context: Value,
    pub agent_context: Value,
}

impl Session {
    pub fn new(role: Role, guide_version_id: Uuid, locale: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            completed_at: None,
            role,
            guide_version_id,
            locale,
            progress: Value::Object(Default::default()),
            customer_context: Value::Object(Default::default()),
            crm_context: Value::Object(Default::default()),
            agent_context: Value::Object(Default::default()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub session_id: Uuid,
    pub step_id: Option<String>,
    pub action: String,
    pub props: Value,
}

impl FlowEvent {
    pub fn new(session_id: Uuid, step_id: Option<String>, action: String, props: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            session_id,
            step_id,
            action,
            props,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

/// Outcome of the escalation email attempt. Both fields stay unset until the
/// attempt runs; a skipped send (missing SMTP configuration) leaves them unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliveryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escalation {
    pub id: Uuid,
    pub session_id: Uuid,
    pub guide_id: Uuid,
    pub step_id: String,
    pub category: String,
    pub message: String,
    pub history_snapshot: Vec<Value>,
    pub contact: Value,
    pub delivery: Delivery,
    pub created_at: DateTime<Utc>,
}

impl Escalation {
    pub fn new(
        session_id: Uuid,
        guide_id: Uuid,
        step_id: String,
        category: String,
        message: String,
        history_snapshot: Vec<Value>,
        contact: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            guide_id,
            step_id,
            category,
            message,
            history_snapshot,
            contact,
            delivery: Delivery::default(),
            created_at: Utc::now(),
        }
    }
}
