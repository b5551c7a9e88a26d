//! All schemas that are exposed from endpoints are defined here
//! along with the From<T> impls

use serde::Serialize;
use barkeep_core::{
    CocktailDetail as CoreCocktailDetail, CocktailSummary as CoreCocktailSummary,
    Ingredient as CoreIngredient, SavedCocktailData, SessionData, UserData,
};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct User {
    id: i32,
    username: String,
    email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResult {
    token: String,
    user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SavedCocktail {
    id: i32,
    user_id: i32,
    cocktail_id: String,
    name: String,
    ingredients: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CocktailSummary {
    id: String,
    name: String,
    category: Option<String>,
    alcoholic: Option<String>,
    glass: Option<String>,
    thumbnail: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CocktailDetail {
    id: String,
    name: String,
    category: Option<String>,
    alcoholic: Option<String>,
    glass: Option<String>,
    thumbnail: Option<String>,
    instructions: Option<String>,
    ingredients: Vec<CocktailIngredient>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CocktailIngredient {
    name: String,
    measure: Option<String>,
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<User> for UserData {
    fn to_serialized(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl ToSerialized<LoginResult> for SessionData {
    fn to_serialized(&self) -> LoginResult {
        LoginResult {
            token: self.token.clone(),
            user: self.user.to_serialized(),
        }
    }
}

impl ToSerialized<SavedCocktail> for SavedCocktailData {
    fn to_serialized(&self) -> SavedCocktail {
        SavedCocktail {
            id: self.id,
            user_id: self.user_id,
            cocktail_id: self.cocktail_id.clone(),
            name: self.name.clone(),
            ingredients: self.ingredients.clone(),
        }
    }
}

impl ToSerialized<CocktailSummary> for CoreCocktailSummary {
    fn to_serialized(&self) -> CocktailSummary {
        CocktailSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            alcoholic: self.alcoholic.clone(),
            glass: self.glass.clone(),
            thumbnail: self.thumbnail.clone(),
        }
    }
}

impl ToSerialized<CocktailDetail> for CoreCocktailDetail {
    fn to_serialized(&self) -> CocktailDetail {
        CocktailDetail {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            alcoholic: self.alcoholic.clone(),
            glass: self.glass.clone(),
            thumbnail: self.thumbnail.clone(),
            instructions: self.instructions.clone(),
            ingredients: self.ingredients.to_serialized(),
        }
    }
}

impl ToSerialized<CocktailIngredient> for CoreIngredient {
    fn to_serialized(&self) -> CocktailIngredient {
        CocktailIngredient {
            name: self.name.clone(),
            measure: self.measure.clone(),
        }
    }
}
