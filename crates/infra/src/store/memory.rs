//! In-process profile store
//!
//! Used for offline runs and local demos. Enforces the same email unique
//! constraint as the remote table and reports violations with the same code.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use rollcall_core::{ProfileStore, StoreResult};
use rollcall_domain::constants::{SINGLE_ROW_MISMATCH_CODE, UNIQUE_VIOLATION_CODE};
use rollcall_domain::{ProfileCreationRequest, ProfileId, ProfileRecord, StoreError, StoreErrorBody};

#[derive(Default)]
pub struct InMemoryProfileStore {
    rows: RwLock<Vec<ProfileRecord>>,
    last_id: AtomicI64,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        Ok(self.rows.read().iter().any(|row| row.email == email))
    }

    async fn insert(&self, request: &ProfileCreationRequest) -> StoreResult<()> {
        let mut rows = self.rows.write();
        if rows.iter().any(|row| row.email == request.email) {
            return Err(StoreError::Rejected(
                StoreErrorBody::new("duplicate key value violates unique constraint")
                    .with_code(UNIQUE_VIOLATION_CODE)
                    .with_details(format!("Key (\"Email\")=({}) already exists.", request.email)),
            ));
        }

        let id = ProfileId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        rows.push(ProfileRecord::with_id(request.clone(), Some(id)));
        Ok(())
    }

    async fn fetch_by_email(&self, email: &str) -> StoreResult<Option<ProfileRecord>> {
        let rows = self.rows.read();
        let mut matching = rows.iter().filter(|row| row.email == email);

        match (matching.next(), matching.next()) {
            (Some(record), None) => Ok(Some(record.clone())),
            (None, _) => Ok(None),
            (Some(_), Some(_)) => Err(StoreError::Rejected(
                StoreErrorBody::new("JSON object requested, multiple (or no) rows returned")
                    .with_code(SINGLE_ROW_MISMATCH_CODE)
                    .with_details("The result contains 2 rows"),
            )),
        }
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.rows.read().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str) -> ProfileCreationRequest {
        ProfileCreationRequest {
            email: email.into(),
            last_name: "Pop".into(),
            first_name: "Ana".into(),
            group: "A1".into(),
            year: 2,
            specialization: "CS".into(),
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let store = InMemoryProfileStore::new();
        store.insert(&request("a@x.com")).await.unwrap();
        store.insert(&request("b@x.com")).await.unwrap();

        let second = store.fetch_by_email("b@x.com").await.unwrap().unwrap();
        assert_eq!(second.id, Some(ProfileId(2)));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_insert_reports_unique_violation() {
        let store = InMemoryProfileStore::new();
        store.insert(&request("a@x.com")).await.unwrap();

        let err = store.insert(&request("a@x.com")).await.unwrap_err();

        assert!(err.body().is_some_and(|body| body.has_code(UNIQUE_VIOLATION_CODE)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn emails_are_compared_exactly() {
        let store = InMemoryProfileStore::new();
        store.insert(&request("a@x.com")).await.unwrap();

        assert!(store.email_exists("a@x.com").await.unwrap());
        assert!(!store.email_exists("A@x.com").await.unwrap());
        assert!(store.fetch_by_email("A@x.com").await.unwrap().is_none());
    }
}
