//! In-process document store.
//!
//! All six collections live behind one `RwLock`, constructed explicitly in
//! `main` and handed to handlers through `AppState`. Compound updates (version
//! insert plus parent guide pointer, escalation delivery status) run under a
//! single write-lock acquisition, so the two-write races of the original
//! design cannot be observed here.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::shared::models::{
    DeliveryStatus, Escalation, FlowEvent, Guide, GuideVersion, Role, Session, User,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("user with email {0} already exists")]
    DuplicateEmail(String),

    #[error("guide with slug {0} already exists")]
    DuplicateSlug(String),

    #[error("guide {0}")]
    GuideNotFound(Uuid),

    #[error("guide version {0}")]
    VersionNotFound(Uuid),

    #[error("session {0}")]
    SessionNotFound(Uuid),

    #[error("escalation {0}")]
    EscalationNotFound(Uuid),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    guides: HashMap<Uuid, Guide>,
    guide_versions: HashMap<Uuid, GuideVersion>,
    sessions: HashMap<Uuid, Session>,
    flow_events: Vec<FlowEvent>,
    escalations: HashMap<Uuid, Escalation>,
}

#[derive(Default)]
pub struct Store {
    inner: RwLock<Collections>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- users -----

    pub async fn insert_user(
        &self,
        email: String,
        password_hash: String,
        role: Role,
    ) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail(email));
        }
        let user = User::new(email, password_hash, role);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        let inner = self.inner.read().await;
        inner.users.values().find(|u| u.email == email).cloned()
    }

    // ----- guides -----

    pub async fn insert_guide(
        &self,
        slug: String,
        title: String,
        category: String,
        tags: Vec<String>,
        created_by: Uuid,
    ) -> StoreResult<Guide> {
        let mut inner = self.inner.write().await;
        if inner.guides.values().any(|g| g.slug == slug) {
            return Err(StoreError::DuplicateSlug(slug));
        }
        let guide = Guide::new(slug, title, category, tags, created_by);
        inner.guides.insert(guide.id, guide.clone());
        Ok(guide)
    }

    pub async fn list_guides(&self) -> Vec<Guide> {
        let inner = self.inner.read().await;
        let mut guides: Vec<Guide> = inner.guides.values().cloned().collect();
        guides.sort_by_key(|g| g.created_at);
        guides
    }

    pub async fn get_guide(&self, id: Uuid) -> Option<Guide> {
        let inner = self.inner.read().await;
        inner.guides.get(&id).cloned()
    }

    /// Inserts the next version for a guide and repoints the guide's
    /// `current_version_id` at it, atomically. Version numbers per guide form
    /// a contiguous ascending sequence starting at 1.
    pub async fn insert_version(
        &self,
        guide_id: Uuid,
        graph: Value,
        crm_note_template: Option<String>,
    ) -> StoreResult<GuideVersion> {
        let mut inner = self.inner.write().await;
        if !inner.guides.contains_key(&guide_id) {
            return Err(StoreError::GuideNotFound(guide_id));
        }
        let next = inner
            .guide_versions
            .values()
            .filter(|v| v.guide_id == guide_id)
            .map(|v| v.version)
            .max()
            .unwrap_or(0)
            + 1;
        let version = GuideVersion::new(guide_id, next, graph, crm_note_template);
        inner.guide_versions.insert(version.id, version.clone());
        if let Some(guide) = inner.guides.get_mut(&guide_id) {
            guide.current_version_id = Some(version.id);
        }
        Ok(version)
    }

    pub async fn get_version(&self, guide_id: Uuid, version_id: Uuid) -> Option<GuideVersion> {
        let inner = self.inner.read().await;
        inner
            .guide_versions
            .get(&version_id)
            .filter(|v| v.guide_id == guide_id)
            .cloned()
    }

    // ----- sessions -----

    pub async fn insert_session(
        &self,
        role: Role,
        guide_version_id: Uuid,
        locale: String,
    ) -> StoreResult<Session> {
        let mut inner = self.inner.write().await;
        if !inner.guide_versions.contains_key(&guide_version_id) {
            return Err(StoreError::VersionNotFound(guide_version_id));
        }
        let session = Session::new(role, guide_version_id, locale);
        inner.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    pub async fn get_session(&self, id: Uuid) -> Option<Session> {
        let inner = self.inner.read().await;
        inner.sessions.get(&id).cloned()
    }

    pub async fn set_customer_context(&self, id: Uuid, context: Value) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or(StoreError::SessionNotFound(id))?;
        session.customer_context = context;
        Ok(())
    }

    pub async fn set_crm_context(&self, id: Uuid, context: Value) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or(StoreError::SessionNotFound(id))?;
        session.crm_context = context;
        Ok(())
    }

    /// Marks a session completed. Idempotent: the first call stamps
    /// `completed_at`, later calls leave the original timestamp untouched.
    pub async fn complete_session(&self, id: Uuid) -> StoreResult<Session> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or(StoreError::SessionNotFound(id))?;
        if session.completed_at.is_none() {
            session.completed_at = Some(Utc::now());
        }
        Ok(session.clone())
    }

    // ----- flow events -----

    pub async fn insert_event(
        &self,
        session_id: Uuid,
        step_id: Option<String>,
        action: String,
        props: Value,
    ) -> FlowEvent {
        let mut inner = self.inner.write().await;
        let event = FlowEvent::new(session_id, step_id, action, props);
        inner.flow_events.push(event.clone());
        event
    }

    // ----- escalations -----

    pub async fn insert_escalation(&self, escalation: Escalation) -> Escalation {
        let mut inner = self.inner.write().await;
        inner.escalations.insert(escalation.id, escalation.clone());
        escalation
    }

    pub async fn set_delivery(
        &self,
        id: Uuid,
        status: DeliveryStatus,
        error: Option<String>,
    ) -> StoreResult<Escalation> {
        let mut inner = self.inner.write().await;
        let escalation = inner
            .escalations
            .get_mut(&id)
            .ok_or(StoreError::EscalationNotFound(id))?;
        escalation.delivery.status = Some(status);
        escalation.delivery.error = error;
        Ok(escalation.clone())
    }

    // ----- analytics -----

    pub async fn session_counts(&self) -> (usize, usize) {
        let inner = self.inner.read().await;
        let total = inner.sessions.len();
        let completed = inner
            .sessions
            .values()
            .filter(|s| s.completed_at.is_some())
            .count();
        (total, completed)
    }

    pub async fn escalation_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.escalations.len()
    }

    pub async fn recent_sessions(&self, limit: usize) -> Vec<Session> {
        let inner = self.inner.read().await;
        let mut sessions: Vec<Session> = inner.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        sessions.truncate(limit);
        sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn seeded_guide(store: &Store) -> Guide {
        store
            .insert_guide(
                "reset-password".into(),
                "Reset a password".into(),
                "general".into(),
                vec![],
                Uuid::new_v4(),
            )
            .await
            .expect("insert guide")
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let store = Store::new();
        store
            .insert_user("a@x.com".into(), "h1".into(), Role::Admin)
            .await
            .expect("first insert");
        let err = store
            .insert_user("a@x.com".into(), "h2".into(), Role::Agent)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn duplicate_slug_rejected() {
        let store = Store::new();
        seeded_guide(&store).await;
        let err = store
            .insert_guide(
                "reset-password".into(),
                "Other".into(),
                "general".into(),
                vec![],
                Uuid::new_v4(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlug(_)));
    }

    #[tokio::test]
    async fn version_numbers_are_contiguous_and_guide_tracks_latest() {
        let store = Store::new();
        let guide = seeded_guide(&store).await;
        assert_eq!(guide.current_version_id, None);

        let v1 = store
            .insert_version(guide.id, json!({}), None)
            .await
            .expect("v1");
        let v2 = store
            .insert_version(guide.id, json!({"root": "s1"}), None)
            .await
            .expect("v2");
        let v3 = store
            .insert_version(guide.id, json!({}), Some("note".into()))
            .await
            .expect("v3");

        assert_eq!((v1.version, v2.version, v3.version), (1, 2, 3));
        let guide = store.get_guide(guide.id).await.expect("guide");
        assert_eq!(guide.current_version_id, Some(v3.id));
    }

    #[tokio::test]
    async fn version_for_unknown_guide_fails() {
        let store = Store::new();
        let err = store
            .insert_version(Uuid::new_v4(), json!({}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::GuideNotFound(_)));
    }

    #[tokio::test]
    async fn get_version_requires_matching_guide() {
        let store = Store::new();
        let guide = seeded_guide(&store).await;
        let version = store
            .insert_version(guide.id, json!({}), None)
            .await
            .expect("version");

        assert!(store.get_version(guide.id, version.id).await.is_some());
        assert!(store.get_version(Uuid::new_v4(), version.id).await.is_none());
    }

    #[tokio::test]
    async fn session_requires_existing_version() {
        let store = Store::new();
        let err = store
            .insert_session(Role::Customer, Uuid::new_v4(), "en".into())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::VersionNotFound(_)));
    }

    #[tokio::test]
    async fn completion_is_idempotent() {
        let store = Store::new();
        let guide = seeded_guide(&store).await;
        let version = store
            .insert_version(guide.id, json!({}), None)
            .await
            .expect("version");
        let session = store
            .insert_session(Role::Customer, version.id, "en".into())
            .await
            .expect("session");

        let first = store.complete_session(session.id).await.expect("complete");
        let stamp = first.completed_at.expect("stamped");
        let second = store.complete_session(session.id).await.expect("again");
        assert_eq!(second.completed_at, Some(stamp));
    }

    #[tokio::test]
    async fn recent_sessions_sorted_and_limited() {
        let store = Store::new();
        let guide = seeded_guide(&store).await;
        let version = store
            .insert_version(guide.id, json!({}), None)
            .await
            .expect("version");
        let mut ids = Vec::new();
        for _ in 0..3 {
            let s = store
                .insert_session(Role::Customer, version.id, "en".into())
                .await
                .expect("session");
            ids.push(s.id);
        }

        let recent = store.recent_sessions(2).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, ids[2]);
        assert_eq!(recent[1].id, ids[1]);
    }

    #[tokio::test]
    async fn delivery_status_recorded_once() {
        let store = Store::new();
        let escalation = store
            .insert_escalation(Escalation::new(
                Uuid::new_v4(),
                Uuid::new_v4(),
                "step-1".into(),
                "billing".into(),
                "please help".into(),
                vec![],
                json!({}),
            ))
            .await;
        assert!(escalation.delivery.status.is_none());

        let updated = store
            .set_delivery(escalation.id, DeliveryStatus::Failed, Some("timeout".into()))
            .await
            .expect("set delivery");
        assert_eq!(updated.delivery.status, Some(DeliveryStatus::Failed));
        assert_eq!(updated.delivery.error.as_deref(), Some("timeout"));
    }
}
