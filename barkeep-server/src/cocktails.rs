use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json,
};
use serde::Deserialize;
use barkeep_core::{NewSavedCocktail, RecipeError};

use crate::{
    auth::Session,
    context::ServerContext,
    errors::ServerResult,
    schemas::{SaveCocktailSchema, SearchSchema, ValidatedJson},
    serialized::{CocktailDetail, CocktailSummary, SavedCocktail, ToSerialized},
    Router,
};

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: String,
}

#[utoipa::path(
    get,
    path = "/v1/cocktails/search",
    tag = "cocktails",
    params(
        ("q" = String, Query, description = "Cocktail name to search for")
    ),
    responses(
        (status = 200, body = CocktailDetail),
        (status = 404, description = "No cocktail matched the query"),
        (status = 502, description = "The recipe service is unreachable or misbehaving")
    )
)]
async fn search_first(
    State(context): State<ServerContext>,
    Query(query): Query<SearchQuery>,
) -> ServerResult<Json<CocktailDetail>> {
    let summaries = context.barkeep.recipes.search_by_name(&query.q).await?;

    let first = summaries.into_iter().next().ok_or(RecipeError::NotFound)?;
    let detail = context.barkeep.recipes.lookup_by_id(&first.id).await?;

    Ok(Json(detail.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/v1/cocktails/search",
    tag = "cocktails",
    request_body = SearchSchema,
    responses(
        (status = 200, body = Vec<CocktailSummary>),
        (status = 502, description = "The recipe service is unreachable or misbehaving")
    )
)]
async fn search(
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<SearchSchema>,
) -> ServerResult<Json<Vec<CocktailSummary>>> {
    // Unlike the first-match route, no match here is an empty list, not a 404
    let summaries = match context.barkeep.recipes.search_by_name(&body.query).await {
        Ok(summaries) => summaries,
        Err(RecipeError::NotFound) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    Ok(Json(summaries.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/v1/cocktails/saved",
    tag = "cocktails",
    request_body = SaveCocktailSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = SavedCocktail),
        (status = 400, description = "A field is empty"),
        (status = 401, description = "Request refused because of missing authorization")
    )
)]
async fn save_cocktail(
    session: Session,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<SaveCocktailSchema>,
) -> ServerResult<(StatusCode, Json<SavedCocktail>)> {
    let saved = context
        .barkeep
        .bookmarks
        .save(NewSavedCocktail {
            user_id: session.user().id,
            cocktail_id: body.cocktail_id,
            name: body.name,
            ingredients: body.ingredients,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(saved.to_serialized())))
}

#[utoipa::path(
    get,
    path = "/v1/cocktails/saved",
    tag = "cocktails",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Vec<SavedCocktail>),
        (status = 401, description = "Request refused because of missing authorization")
    )
)]
async fn saved_cocktails(
    session: Session,
    State(context): State<ServerContext>,
) -> ServerResult<Json<Vec<SavedCocktail>>> {
    let saved = context
        .barkeep
        .bookmarks
        .list_by_user(session.user().id)
        .await?;

    Ok(Json(saved.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/search", get(search_first).post(search))
        .route("/saved", get(saved_cocktails).post(save_cocktail))
}
