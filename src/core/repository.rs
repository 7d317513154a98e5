//! Saved profiles, newest first, backed by a [`LocalStore`]

use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use super::profile::{Profile, ValidationError};
use super::store::{LocalStore, StoreError};

/// Store key holding the serialized profile list
pub const PROFILES_KEY: &str = "dynamic_portfolio_profiles_v1";

/// Maximum number of stored profiles
pub const MAX_PROFILES: usize = 30;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no saved profile at position {0}")]
    NotFound(usize),
    #[error("no saved profile with id {0}")]
    Missing(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// CRUD over the bounded profile list
pub struct ProfileRepository<S> {
    store: S,
}

impl<S: LocalStore> ProfileRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All stored profiles, empty when the stored data is missing or unreadable
    pub fn list(&self) -> Vec<Profile> {
        let raw = match self.store.get(PROFILES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to load profiles: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::warn!("Failed to parse stored profiles: {}", e);
                Vec::new()
            }
        }
    }

    /// Profile at `index` in newest-first order
    pub fn get(&self, index: usize) -> Result<Profile, RepositoryError> {
        self.list()
            .into_iter()
            .nth(index)
            .ok_or(RepositoryError::NotFound(index))
    }

    /// Validate and store a new profile at the front of the list
    ///
    /// The draft's id is ignored; a fresh one is assigned. Entries beyond
    /// [`MAX_PROFILES`] are dropped from the end.
    pub fn save(&self, draft: Profile) -> Result<Profile, SaveError> {
        draft.validate()?;

        let mut profiles = self.list();
        let newest = profiles.iter().map(|p| p.id).max();
        let profile = Profile {
            id: next_id(now_millis(), newest),
            full_name: draft.full_name.trim().to_string(),
            contact_info: draft.contact_info.trim().to_string(),
            ..draft
        };

        profiles.insert(0, profile.clone());
        profiles.truncate(MAX_PROFILES);
        self.write(&profiles)?;

        tracing::info!("Saved profile {} ({})", profile.id, profile.full_name);
        Ok(profile)
    }

    /// Current position of the profile with `id`
    pub fn position(&self, id: i64) -> Option<usize> {
        self.list().iter().position(|p| p.id == id)
    }

    /// Remove the profile at `index`, keeping the order of the others
    pub fn delete(&self, index: usize) -> Result<Profile, RepositoryError> {
        let mut profiles = self.list();
        if index >= profiles.len() {
            return Err(RepositoryError::NotFound(index));
        }

        let removed = profiles.remove(index);
        self.write(&profiles)?;

        tracing::info!("Deleted profile {} ({})", removed.id, removed.full_name);
        Ok(removed)
    }

    fn write(&self, profiles: &[Profile]) -> Result<(), StoreError> {
        let json = serde_json::to_string(profiles).map_err(|source| StoreError::Serialize {
            key: PROFILES_KEY.to_string(),
            source,
        })?;
        self.store.set(PROFILES_KEY, &json)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Timestamp id that stays unique when saves land in the same millisecond
fn next_id(now: i64, newest: Option<i64>) -> i64 {
    match newest {
        Some(newest) if newest >= now => newest + 1,
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;

    fn draft(name: &str) -> Profile {
        Profile {
            full_name: name.to_string(),
            contact_info: format!("{}@example.com", name.to_lowercase()),
            ..Default::default()
        }
    }

    fn repo() -> ProfileRepository<MemoryStore> {
        ProfileRepository::new(MemoryStore::new())
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        assert!(repo().list().is_empty());
    }

    #[test]
    fn test_corrupt_store_lists_nothing() {
        let store = MemoryStore::new();
        store.set(PROFILES_KEY, "{not json").unwrap();
        assert!(ProfileRepository::new(&store).list().is_empty());
    }

    #[test]
    fn test_save_rejects_missing_fields() {
        let repo = repo();
        repo.save(draft("Ada")).unwrap();

        let no_contact = Profile {
            contact_info: " ".into(),
            ..draft("Bob")
        };
        assert!(matches!(
            repo.save(no_contact),
            Err(SaveError::Validation(ValidationError::MissingRequired))
        ));
        let no_name = Profile {
            full_name: String::new(),
            ..draft("Cy")
        };
        assert!(repo.save(no_name).is_err());

        let names: Vec<_> = repo.list().into_iter().map(|p| p.full_name).collect();
        assert_eq!(names, vec!["Ada"]);
    }

    #[test]
    fn test_save_prepends_with_fresh_id() {
        let repo = repo();
        let first = repo.save(draft("Ada")).unwrap();
        let second = repo.save(Profile { id: first.id, ..draft("Bob") }).unwrap();

        assert_ne!(first.id, second.id);
        let list = repo.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], second);
        assert_eq!(list[1], first);
    }

    #[test]
    fn test_capacity_keeps_newest_thirty() {
        let repo = repo();
        for i in 0..31 {
            repo.save(draft(&format!("User{i}"))).unwrap();
        }

        let list = repo.list();
        assert_eq!(list.len(), MAX_PROFILES);
        assert_eq!(list[0].full_name, "User30");
        assert_eq!(list[29].full_name, "User1");
        assert!(list.iter().all(|p| p.full_name != "User0"));

        let mut ids: Vec<_> = list.iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), MAX_PROFILES);
    }

    #[test]
    fn test_delete_preserves_order() {
        let repo = repo();
        for name in ["A", "B", "C", "D"] {
            repo.save(draft(name)).unwrap();
        }

        let removed = repo.delete(1).unwrap();
        assert_eq!(removed.full_name, "C");

        let names: Vec<_> = repo.list().into_iter().map(|p| p.full_name).collect();
        assert_eq!(names, vec!["D", "B", "A"]);
    }

    #[test]
    fn test_delete_out_of_range() {
        let repo = repo();
        repo.save(draft("A")).unwrap();
        assert!(matches!(repo.delete(3), Err(RepositoryError::NotFound(3))));
        assert_eq!(repo.list().len(), 1);
    }

    #[test]
    fn test_get_by_index() {
        let repo = repo();
        repo.save(draft("A")).unwrap();
        repo.save(draft("B")).unwrap();
        assert_eq!(repo.get(0).unwrap().full_name, "B");
        assert_eq!(repo.get(1).unwrap().full_name, "A");
        assert!(matches!(repo.get(2), Err(RepositoryError::NotFound(2))));
    }

    #[test]
    fn test_position_follows_id() {
        let repo = repo();
        let first = repo.save(draft("A")).unwrap();
        assert_eq!(repo.position(first.id), Some(0));
        repo.save(draft("B")).unwrap();
        assert_eq!(repo.position(first.id), Some(1));
        assert_eq!(repo.position(first.id + 1_000), None);
    }

    #[test]
    fn test_next_id_moves_past_newest() {
        assert_eq!(next_id(100, None), 100);
        assert_eq!(next_id(100, Some(50)), 100);
        assert_eq!(next_id(100, Some(100)), 101);
        assert_eq!(next_id(100, Some(140)), 141);
    }
}
