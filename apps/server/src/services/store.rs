// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory session store.
//!
//! Nothing is persisted: sessions live for the duration of the process and
//! are destroyed on explicit reset. Accessors take closures so the lock is
//! scoped to the callback and can never be held across an await on the
//! inference call.

use rustc_hash::FxHashMap;
use showroom_core::Session;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;

/// All live sessions, keyed by id.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<FxHashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its id.
    pub async fn insert(&self, session: Session) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, session);
        id
    }

    /// Read access to one session.
    pub async fn with_session<R>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&Session) -> R,
    ) -> Result<R, ApiError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(id).ok_or(ApiError::SessionNotFound(*id))?;
        Ok(f(session))
    }

    /// Write access to one session.
    pub async fn with_session_mut<R>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, ApiError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or(ApiError::SessionNotFound(*id))?;
        Ok(f(session))
    }

    /// Destroy a session and everything it owns.
    pub async fn remove(&self, id: &Uuid) -> Result<(), ApiError> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(ApiError::SessionNotFound(*id))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showroom_core::{DocumentMeta, Page, PageCategory};

    fn session() -> Session {
        Session::new(
            DocumentMeta {
                name: "plan.pdf".into(),
                size: 10,
                modified_ms: 0,
                mime_type: "application/pdf".into(),
            },
            vec![Page {
                index: 0,
                data_uri: "data:image/jpeg;base64,AA==".into(),
                category: PageCategory::Other,
            }],
            None,
        )
    }

    #[tokio::test]
    async fn sessions_round_trip() {
        let store = SessionStore::new();
        let id = store.insert(session()).await;

        let name = store
            .with_session(&id, |s| s.document.name.clone())
            .await
            .unwrap();
        assert_eq!(name, "plan.pdf");

        store.remove(&id).await.unwrap();
        assert!(matches!(
            store.with_session(&id, |_| ()).await,
            Err(ApiError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.with_session_mut(&id, |_| ()).await,
            Err(ApiError::SessionNotFound(_))
        ));
        assert!(store.remove(&id).await.is_err());
    }
}
