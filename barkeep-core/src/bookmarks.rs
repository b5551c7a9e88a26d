use std::sync::Arc;
use thiserror::Error;

use crate::{Database, DatabaseError, NewSavedCocktail, PrimaryKey, SavedCocktailData};

/// Manages the cocktails users have saved to their profile
pub struct Bookmarks<Db> {
    db: Arc<Db>,
}

#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("{field} must not be empty")]
    Validation { field: &'static str },
    /// The owning user does not exist
    #[error("User does not exist")]
    UnknownUser,
    /// Something else went wrong with the database
    #[error(transparent)]
    Db(DatabaseError),
}

impl<Db> Bookmarks<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Saves a cocktail to a user's profile.
    /// Saving the same cocktail twice creates a second record.
    pub async fn save(
        &self,
        new_cocktail: NewSavedCocktail,
    ) -> Result<SavedCocktailData, BookmarkError> {
        validate(&new_cocktail)?;

        self.db
            .create_saved_cocktail(new_cocktail)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound {
                    resource: "user",
                    identifier: _,
                } => BookmarkError::UnknownUser,
                err => BookmarkError::Db(err),
            })
    }

    /// Returns all cocktails the user saved, in insertion order
    pub async fn list_by_user(
        &self,
        user_id: PrimaryKey,
    ) -> Result<Vec<SavedCocktailData>, DatabaseError> {
        self.db.saved_cocktails_by_user(user_id).await
    }
}

fn validate(new_cocktail: &NewSavedCocktail) -> Result<(), BookmarkError> {
    if new_cocktail.cocktail_id.trim().is_empty() {
        return Err(BookmarkError::Validation {
            field: "cocktail_id",
        });
    }

    if new_cocktail.name.trim().is_empty() {
        return Err(BookmarkError::Validation { field: "name" });
    }

    if new_cocktail.ingredients.trim().is_empty() {
        return Err(BookmarkError::Validation {
            field: "ingredients",
        });
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{MemoryDatabase, NewUser, UserData};

    async fn setup() -> (Bookmarks<MemoryDatabase>, UserData) {
        let db = Arc::new(MemoryDatabase::new());

        let user = db
            .create_user(NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "not-a-real-hash".to_string(),
            })
            .await
            .expect("user is created");

        (Bookmarks::new(&db), user)
    }

    fn margarita(user_id: PrimaryKey) -> NewSavedCocktail {
        NewSavedCocktail {
            user_id,
            cocktail_id: "11007".to_string(),
            name: "Margarita".to_string(),
            ingredients: "Tequila,Lime,Salt".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_and_list() {
        let (bookmarks, user) = setup().await;

        let saved = bookmarks
            .save(margarita(user.id))
            .await
            .expect("cocktail is saved");

        let listed = bookmarks
            .list_by_user(user.id)
            .await
            .expect("cocktails are listed");

        assert_eq!(listed, vec![saved]);
        assert_eq!(listed[0].cocktail_id, "11007");
        assert_eq!(listed[0].name, "Margarita");
        assert_eq!(listed[0].ingredients, "Tequila,Lime,Salt");
    }

    #[tokio::test]
    async fn test_duplicate_saves_are_allowed() {
        let (bookmarks, user) = setup().await;

        bookmarks
            .save(margarita(user.id))
            .await
            .expect("cocktail is saved");
        bookmarks
            .save(margarita(user.id))
            .await
            .expect("cocktail is saved again");

        let listed = bookmarks
            .list_by_user(user.id)
            .await
            .expect("cocktails are listed");

        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_save_requires_existing_user() {
        let (bookmarks, user) = setup().await;

        let result = bookmarks.save(margarita(user.id + 1)).await;

        assert!(matches!(result, Err(BookmarkError::UnknownUser)));
    }

    #[tokio::test]
    async fn test_save_rejects_empty_fields() {
        let (bookmarks, user) = setup().await;

        let result = bookmarks
            .save(NewSavedCocktail {
                name: " ".to_string(),
                ..margarita(user.id)
            })
            .await;

        assert!(matches!(
            result,
            Err(BookmarkError::Validation { field: "name" })
        ));
    }
}
