use std::sync::Arc;

use axum::extract::FromRef;
use barkeep_core::{Barkeep, PgDatabase};

#[derive(Clone, FromRef)]
pub struct ServerContext {
    pub barkeep: Arc<Barkeep<PgDatabase>>,
}
