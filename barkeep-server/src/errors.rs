use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use barkeep_core::{AuthError, BookmarkError, DatabaseError, RecipeError};

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{resource}:{identifier} not found")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(String),
    #[error("Recipe service failed: {0}")]
    Upstream(String),
    #[error("Unknown internal error: {0}")]
    Unknown(String),
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict {
                resource: _,
                field: _,
                value: _,
            } => StatusCode::CONFLICT,
            Self::NotFound {
                resource: _,
                identifier: _,
            } => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.as_status_code(), self.to_string()).into_response()
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Validation { field, reason } => {
                Self::Validation(format!("{} {}", field, reason))
            }
            AuthError::Db(e) => e.into(),
            e => Self::Unknown(e.to_string()),
        }
    }
}

impl From<DatabaseError> for ServerError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound {
                resource,
                identifier,
            } => Self::NotFound {
                resource,
                identifier,
            },
            DatabaseError::Conflict {
                resource,
                field,
                value,
            } => Self::Conflict {
                resource,
                field,
                value,
            },
            e => Self::Unknown(e.to_string()),
        }
    }
}

impl From<BookmarkError> for ServerError {
    fn from(value: BookmarkError) -> Self {
        match value {
            BookmarkError::Validation { field } => {
                Self::Validation(format!("{} must not be empty", field))
            }
            BookmarkError::UnknownUser => Self::Validation("User does not exist".to_string()),
            BookmarkError::Db(e) => e.into(),
        }
    }
}

impl From<RecipeError> for ServerError {
    fn from(value: RecipeError) -> Self {
        match value {
            RecipeError::NotFound => Self::NotFound {
                resource: "cocktail",
                identifier: "query",
            },
            RecipeError::Upstream(e) => Self::Upstream(e),
            RecipeError::Parse(e) => Self::Upstream(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_codes() {
        let conflict: ServerError = DatabaseError::Conflict {
            resource: "user",
            field: "username",
            value: "alice".to_string(),
        }
        .into();

        assert_eq!(conflict.as_status_code(), StatusCode::CONFLICT);

        let invalid: ServerError = AuthError::InvalidCredentials.into();
        assert_eq!(invalid.as_status_code(), StatusCode::BAD_REQUEST);

        let upstream: ServerError = RecipeError::Upstream("status 500".to_string()).into();
        assert_eq!(upstream.as_status_code(), StatusCode::BAD_GATEWAY);

        let missing: ServerError = RecipeError::NotFound.into();
        assert_eq!(missing.as_status_code(), StatusCode::NOT_FOUND);
    }
}
