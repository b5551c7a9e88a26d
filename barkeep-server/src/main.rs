use std::{env, sync::Arc};

use barkeep_core::{Barkeep, PgDatabase, RecipeGateway};
use barkeep_server::{logging, run_server, ServerContext};
use log::{error, info};

#[tokio::main]
async fn main() {
    logging::init_logger();

    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            error!("DATABASE_URL must be set.");
            return;
        }
    };

    info!("Connecting to database...");

    let database = match PgDatabase::new(&database_url).await {
        Ok(database) => database,
        Err(error) => {
            error!("Could not connect to database: {}", error);
            error!("Hint: make sure the Postgres instance is running and DATABASE_URL is correct, then try again.");
            return;
        }
    };

    let recipes = env::var("BARKEEP_COCKTAIL_API")
        .map(RecipeGateway::new)
        .unwrap_or_default();

    let barkeep = Barkeep::new(database, recipes);

    info!("Initialized successfully.");

    run_server(ServerContext {
        barkeep: Arc::new(barkeep),
    })
    .await
}
