use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

use crate::types::UserSkillProfile;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("profile store backend error: {0}")]
    Backend(String),
}

/// Narrow persistence contract for user profiles. Writes are atomic at the
/// granularity of one full profile, last-writer-wins; durability is the
/// implementation's concern, not the engine's.
pub trait ProfileStore: Send + Sync {
    fn load(&self, user_id: &str) -> Result<Option<UserSkillProfile>, StoreError>;
    fn save(&self, user_id: &str, profile: &UserSkillProfile) -> Result<(), StoreError>;
    /// Discards a user's profile. External/test-only operation.
    fn reset(&self, user_id: &str) -> Result<(), StoreError>;
}

/// In-memory store for embedding and tests.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, UserSkillProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn load(&self, user_id: &str) -> Result<Option<UserSkillProfile>, StoreError> {
        Ok(self.profiles.read().get(user_id).cloned())
    }

    fn save(&self, user_id: &str, profile: &UserSkillProfile) -> Result<(), StoreError> {
        let mut stamped = profile.clone();
        stamped.last_updated = chrono::Utc::now().timestamp_millis();
        self.profiles.write().insert(user_id.to_string(), stamped);
        Ok(())
    }

    fn reset(&self, user_id: &str) -> Result<(), StoreError> {
        self.profiles.write().remove(user_id);
        Ok(())
    }
}
