use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::{
    Database, DatabaseError, NewSavedCocktail, NewSession, NewUser, PrimaryKey, Result,
    SavedCocktailData, SessionData, UserData,
};

/// An in-memory database implementation, used by tests and local experiments.
/// State is lost when the process exits.
#[derive(Default)]
pub struct MemoryDatabase {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    users: Vec<UserData>,
    sessions: Vec<StoredSession>,
    saved_cocktails: Vec<SavedCocktailData>,

    next_user_id: PrimaryKey,
    next_session_id: PrimaryKey,
    next_saved_cocktail_id: PrimaryKey,
}

/// Sessions are stored flat and joined with their user on lookup
struct StoredSession {
    id: PrimaryKey,
    token: String,
    user_id: PrimaryKey,
    expires_at: DateTime<Utc>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State {
    fn user(&self, user_id: PrimaryKey) -> Option<UserData> {
        self.users.iter().find(|u| u.id == user_id).cloned()
    }

    fn session(&self, stored: &StoredSession) -> Option<SessionData> {
        let user = self.user(stored.user_id)?;

        Some(SessionData {
            id: stored.id,
            token: stored.token.clone(),
            expires_at: stored.expires_at,
            user,
        })
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData> {
        self.state
            .read()
            .user(user_id)
            .ok_or(DatabaseError::NotFound {
                resource: "user",
                identifier: "id",
            })
    }

    async fn user_by_username(&self, username: &str) -> Result<UserData> {
        self.state
            .read()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(DatabaseError::NotFound {
                resource: "user",
                identifier: "username",
            })
    }

    async fn user_by_email(&self, email: &str) -> Result<UserData> {
        self.state
            .read()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(DatabaseError::NotFound {
                resource: "user",
                identifier: "email",
            })
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        let mut state = self.state.write();

        if state.users.iter().any(|u| u.username == new_user.username) {
            return Err(DatabaseError::Conflict {
                resource: "user",
                field: "username",
                value: new_user.username,
            });
        }

        if state.users.iter().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::Conflict {
                resource: "user",
                field: "email",
                value: new_user.email,
            });
        }

        state.next_user_id += 1;

        let user = UserData {
            id: state.next_user_id,
            username: new_user.username,
            email: new_user.email,
            password: new_user.password,
        };

        state.users.push(user.clone());

        Ok(user)
    }

    async fn session_by_token(&self, token: &str) -> Result<SessionData> {
        let state = self.state.read();

        state
            .sessions
            .iter()
            .find(|s| s.token == token && s.expires_at > Utc::now())
            .and_then(|s| state.session(s))
            .ok_or(DatabaseError::NotFound {
                resource: "session",
                identifier: "token",
            })
    }

    async fn create_session(&self, new_session: NewSession) -> Result<SessionData> {
        let mut state = self.state.write();

        if state.sessions.iter().any(|s| s.token == new_session.token) {
            return Err(DatabaseError::Conflict {
                resource: "session",
                field: "token",
                value: new_session.token,
            });
        }

        if state.user(new_session.user_id).is_none() {
            return Err(DatabaseError::NotFound {
                resource: "user",
                identifier: "id",
            });
        }

        state.next_session_id += 1;

        let stored = StoredSession {
            id: state.next_session_id,
            token: new_session.token,
            user_id: new_session.user_id,
            expires_at: new_session.expires_at,
        };

        let session = state.session(&stored).ok_or(DatabaseError::NotFound {
            resource: "user",
            identifier: "id",
        })?;

        state.sessions.push(stored);

        Ok(session)
    }

    async fn delete_session_by_token(&self, token: &str) -> Result<()> {
        self.state.write().sessions.retain(|s| s.token != token);

        Ok(())
    }

    async fn clear_expired_sessions(&self) -> Result<()> {
        let now = Utc::now();
        self.state.write().sessions.retain(|s| s.expires_at > now);

        Ok(())
    }

    async fn create_saved_cocktail(
        &self,
        new_cocktail: NewSavedCocktail,
    ) -> Result<SavedCocktailData> {
        let mut state = self.state.write();

        if state.user(new_cocktail.user_id).is_none() {
            return Err(DatabaseError::NotFound {
                resource: "user",
                identifier: "id",
            });
        }

        state.next_saved_cocktail_id += 1;

        let saved = SavedCocktailData {
            id: state.next_saved_cocktail_id,
            user_id: new_cocktail.user_id,
            cocktail_id: new_cocktail.cocktail_id,
            name: new_cocktail.name,
            ingredients: new_cocktail.ingredients,
        };

        state.saved_cocktails.push(saved.clone());

        Ok(saved)
    }

    async fn saved_cocktails_by_user(
        &self,
        user_id: PrimaryKey,
    ) -> Result<Vec<SavedCocktailData>> {
        Ok(self
            .state
            .read()
            .saved_cocktails
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod test {
    use chrono::{Duration, Utc};

    use super::*;

    #[tokio::test]
    async fn test_clear_expired_sessions() {
        let db = MemoryDatabase::new();

        let user = db
            .create_user(NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "not-a-real-hash".to_string(),
            })
            .await
            .expect("user is created");

        db.create_session(NewSession {
            token: "stale".to_string(),
            user_id: user.id,
            expires_at: Utc::now() - Duration::hours(1),
        })
        .await
        .expect("session is created");

        db.create_session(NewSession {
            token: "fresh".to_string(),
            user_id: user.id,
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await
        .expect("session is created");

        db.clear_expired_sessions().await.expect("sessions cleared");

        assert!(db.session_by_token("stale").await.is_err());
        assert!(db.session_by_token("fresh").await.is_ok());
    }
}
