mod auth;
mod bookmarks;
mod db;
mod recipes;
mod util;

use std::sync::Arc;

pub use auth::*;
pub use bookmarks::*;
pub use db::*;
pub use recipes::*;

/// The barkeep system, facilitating authentication, cocktail search, and saved cocktails.
pub struct Barkeep<Db> {
    pub auth: Auth<Db>,
    pub bookmarks: Bookmarks<Db>,
    pub recipes: RecipeGateway,
}

impl<Db> Barkeep<Db>
where
    Db: Database,
{
    pub fn new(database: Db, recipes: RecipeGateway) -> Self {
        let database = Arc::new(database);

        Self {
            auth: Auth::new(&database),
            bookmarks: Bookmarks::new(&database),
            recipes,
        }
    }
}
