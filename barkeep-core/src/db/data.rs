use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// The type used for primary keys in the database.
pub type PrimaryKey = i32;

/// A barkeep account
#[derive(Debug, Clone, FromRow)]
pub struct UserData {
    pub id: PrimaryKey,
    pub username: String,
    pub email: String,
    /// The argon2 hash of the password in PHC string format
    pub password: String,
}

/// Login session data for authentication
#[derive(Debug, Clone)]
pub struct SessionData {
    pub id: PrimaryKey,
    /// The session token, or key if you will
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// The user that is logged in
    pub user: UserData,
}

/// A cocktail a user bookmarked from the recipe service
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SavedCocktailData {
    pub id: PrimaryKey,
    /// The user this cocktail belongs to
    pub user_id: PrimaryKey,
    /// The id of the cocktail as assigned by the recipe service
    pub cocktail_id: String,
    pub name: String,
    /// A comma separated list of ingredients
    pub ingredients: String,
}
