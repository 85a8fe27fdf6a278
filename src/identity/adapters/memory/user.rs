//! In-memory user repository for tests and the `memory` storage backend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{Role, User, UserId, Username},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    username_index: HashMap<Username, UserId>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `users`.
    ///
    /// Later entries replace earlier ones that share a username.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let mut state = InMemoryUserState::default();
        for user in users {
            if let Some(previous) = state.username_index.insert(user.username().clone(), user.id())
            {
                state.users.remove(&previous);
            }
            state.users.insert(user.id(), user);
        }
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

fn lock_error(err: impl ToString) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.username_index.contains_key(user.username()) {
            return Err(UserRepositoryError::DuplicateUsername(
                user.username().clone(),
            ));
        }
        state
            .username_index
            .insert(user.username().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .username_index
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id).cloned())
            .collect())
    }

    async fn list_by_role(&self, role: Role) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|user| user.role() == role)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username().as_str().cmp(b.username().as_str()));
        Ok(users)
    }

    async fn count(&self) -> UserRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(u64::try_from(state.users.len()).unwrap_or(u64::MAX))
    }
}
