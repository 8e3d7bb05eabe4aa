use std::sync::Arc;

use crate::directory::{ActivityDirectory, Catalog};
use crate::seed;

/// Shared application state accessible by all handlers
pub struct AppState {
    directory: ActivityDirectory,
}

impl AppState {
    /// State seeded with the built-in activity list
    pub fn new() -> Arc<Self> {
        Self::with_catalog(seed::default_catalog())
    }

    pub fn with_catalog(catalog: Catalog) -> Arc<Self> {
        Arc::new(Self {
            directory: ActivityDirectory::new(catalog),
        })
    }

    pub fn directory(&self) -> &ActivityDirectory {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_state_uses_default_catalog() {
        let state = AppState::new();
        assert_eq!(state.directory().len().await, 9);
    }

    #[tokio::test]
    async fn test_states_are_isolated() {
        let a = AppState::new();
        let b = AppState::new();

        a.directory()
            .signup("Debate Team", "solo@mergington.edu")
            .await
            .unwrap();

        let in_a = a.directory().get("Debate Team").await.unwrap();
        let in_b = b.directory().get("Debate Team").await.unwrap();
        assert_eq!(in_a.participants.len(), 2);
        assert_eq!(in_b.participants.len(), 1);
    }

    #[tokio::test]
    async fn test_with_empty_catalog() {
        let state = AppState::with_catalog(Catalog::default());
        assert!(state.directory().list().await.is_empty());
    }
}
