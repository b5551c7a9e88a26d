use argon2::{
    password_hash::{Encoding, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::{Duration, Utc};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use std::sync::Arc;
use thiserror::Error;

use crate::{util::random_string, Database, DatabaseError, NewSession, NewUser, SessionData, UserData};

lazy_static! {
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_]+$").expect("regex is valid");
}

pub struct Auth<Db> {
    db: Arc<Db>,
    argon: Argon2<'static>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password is incorrect
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// A registration field did not pass the policy checks
    #[error("{field} {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },
    /// Something else went wrong with the database
    #[error(transparent)]
    Db(DatabaseError),
    #[error("HashError: {0}")]
    HashError(String),
}

impl<Db> Auth<Db>
where
    Db: Database,
{
    const SESSION_DURATION_IN_DAYS: usize = 7;
    const MIN_PASSWORD_LENGTH: usize = 8;
    const MIN_USERNAME_LENGTH: usize = 2;
    const MAX_USERNAME_LENGTH: usize = 80;

    pub fn new(db: &Arc<Db>) -> Self {
        Self {
            db: db.clone(),
            argon: Argon2::default(),
        }
    }

    /// Logs in a user, returning a new session
    pub async fn login(&self, credentials: Credentials) -> Result<SessionData, AuthError> {
        self.db
            .clear_expired_sessions()
            .await
            .map_err(AuthError::Db)?;

        let user = self
            .db
            .user_by_username(&credentials.username)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound {
                    resource: _,
                    identifier: _,
                } => AuthError::InvalidCredentials,
                err => AuthError::Db(err),
            })?;

        let stored_password = PasswordHash::parse(&user.password, Encoding::default())
            .map_err(|e| AuthError::HashError(e.to_string()))?;

        self.argon
            .verify_password(credentials.password.as_bytes(), &stored_password)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let expires_at = Utc::now() + Duration::days(Self::SESSION_DURATION_IN_DAYS as i64);

        let new_session = NewSession {
            token: random_string(32),
            user_id: user.id,
            expires_at,
        };

        let new_session = self
            .db
            .create_session(new_session)
            .await
            .map_err(AuthError::Db)?;

        Ok(new_session)
    }

    /// Deletes the associated session if it exists.
    /// Logging out an already invalid token is a no-op.
    pub async fn logout(&self, token: &str) -> Result<(), DatabaseError> {
        self.db.delete_session_by_token(token).await
    }

    /// Creates a new user with the given credentials
    pub async fn register(&self, registration: NewRegistration) -> Result<UserData, AuthError> {
        self.validate(&registration)?;

        let salt = SaltString::generate(&mut OsRng);
        let hashed_password = self
            .argon
            .hash_password(registration.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        self.db
            .create_user(NewUser {
                username: registration.username,
                email: registration.email,
                password: hashed_password,
            })
            .await
            .map_err(AuthError::Db)
    }

    /// Returns a session if it exists and has not expired
    pub async fn session(&self, token: &str) -> Result<SessionData, DatabaseError> {
        self.db.session_by_token(token).await
    }

    fn validate(&self, registration: &NewRegistration) -> Result<(), AuthError> {
        let username_length = registration.username.chars().count();

        if username_length < Self::MIN_USERNAME_LENGTH {
            return Err(AuthError::Validation {
                field: "username",
                reason: "is too short",
            });
        }

        if username_length > Self::MAX_USERNAME_LENGTH {
            return Err(AuthError::Validation {
                field: "username",
                reason: "is too long",
            });
        }

        if !USERNAME_REGEX.is_match(&registration.username) {
            return Err(AuthError::Validation {
                field: "username",
                reason: "may only contain letters, numbers, and underscores",
            });
        }

        if registration.email.is_empty() || !registration.email.contains('@') {
            return Err(AuthError::Validation {
                field: "email",
                reason: "is not a valid address",
            });
        }

        if registration.password.chars().count() < Self::MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation {
                field: "password",
                reason: "must be at least 8 characters",
            });
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct NewRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::MemoryDatabase;

    fn setup() -> Auth<MemoryDatabase> {
        let db = Arc::new(MemoryDatabase::new());
        Auth::new(&db)
    }

    fn alice() -> NewRegistration {
        NewRegistration {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "correct-horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register() {
        let db = Arc::new(MemoryDatabase::new());
        let auth = Auth::new(&db);

        let user = auth.register(alice()).await.expect("user is registered");

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");

        let found = db
            .user_by_username("alice")
            .await
            .expect("user can be found");

        assert_eq!(found.id, user.id);
        // Only the hash is stored
        assert_ne!(found.password, "correct-horse");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates() {
        let auth = setup();

        auth.register(alice()).await.expect("user is registered");

        let same_username = auth
            .register(NewRegistration {
                email: "other@example.com".to_string(),
                ..alice()
            })
            .await;

        assert!(matches!(
            same_username,
            Err(AuthError::Db(DatabaseError::Conflict {
                field: "username",
                ..
            }))
        ));

        let same_email = auth
            .register(NewRegistration {
                username: "alice_two".to_string(),
                ..alice()
            })
            .await;

        assert!(matches!(
            same_email,
            Err(AuthError::Db(DatabaseError::Conflict { field: "email", .. }))
        ));
    }

    #[tokio::test]
    async fn test_register_validates_fields() {
        let auth = setup();

        let short_password = auth
            .register(NewRegistration {
                password: "short".to_string(),
                ..alice()
            })
            .await;

        assert!(matches!(
            short_password,
            Err(AuthError::Validation {
                field: "password",
                ..
            })
        ));

        let bad_email = auth
            .register(NewRegistration {
                email: "not-an-address".to_string(),
                ..alice()
            })
            .await;

        assert!(matches!(
            bad_email,
            Err(AuthError::Validation { field: "email", .. })
        ));

        let bad_username = auth
            .register(NewRegistration {
                username: "al ice!".to_string(),
                ..alice()
            })
            .await;

        assert!(matches!(
            bad_username,
            Err(AuthError::Validation {
                field: "username",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_login() {
        let auth = setup();

        let user = auth.register(alice()).await.expect("user is registered");

        let session = auth
            .login(Credentials {
                username: "alice".to_string(),
                password: "correct-horse".to_string(),
            })
            .await
            .expect("login succeeds");

        assert_eq!(session.user.id, user.id);

        let resolved = auth
            .session(&session.token)
            .await
            .expect("session resolves");

        assert_eq!(resolved.user.username, "alice");
    }

    #[tokio::test]
    async fn test_login_fails_uniformly() {
        let auth = setup();

        auth.register(alice()).await.expect("user is registered");

        let wrong_password = auth
            .login(Credentials {
                username: "alice".to_string(),
                password: "wrong-horse".to_string(),
            })
            .await
            .expect_err("login fails");

        let unknown_user = auth
            .login(Credentials {
                username: "nonexistent".to_string(),
                password: "anything-goes".to_string(),
            })
            .await
            .expect_err("login fails");

        // Neither error may leak which of the two cases occurred
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let auth = setup();

        auth.register(alice()).await.expect("user is registered");

        let session = auth
            .login(Credentials {
                username: "alice".to_string(),
                password: "correct-horse".to_string(),
            })
            .await
            .expect("login succeeds");

        auth.logout(&session.token).await.expect("logout succeeds");

        assert!(auth.session(&session.token).await.is_err());

        // A second logout with the same token is a no-op
        auth.logout(&session.token).await.expect("logout succeeds");
    }

    #[tokio::test]
    async fn test_expired_session_is_invisible() {
        let db = Arc::new(MemoryDatabase::new());
        let auth = Auth::new(&db);

        let user = auth.register(alice()).await.expect("user is registered");

        db.create_session(crate::NewSession {
            token: "expired".to_string(),
            user_id: user.id,
            expires_at: Utc::now() - Duration::hours(1),
        })
        .await
        .expect("session is created");

        assert!(auth.session("expired").await.is_err());
    }
}
