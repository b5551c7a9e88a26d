use std::collections::BTreeMap;
use std::time::Duration;

use log::warn;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

const API_BASE: &str = "https://www.thecocktaildb.com/api/json/v1/1";

/// Number of ingredient columns the recipe service exposes per drink
const INGREDIENT_COLUMNS: usize = 15;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("No matching cocktail was found")]
    NotFound,

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Failed to parse upstream response: {0}")]
    Parse(String),
}

/// Wraps the external recipe service, turning its wire format into
/// typed records or explicit failures.
pub struct RecipeGateway {
    client: Client,
    api_base: String,
}

/// A single row of a search result
#[derive(Debug, Clone)]
pub struct CocktailSummary {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub alcoholic: Option<String>,
    pub glass: Option<String>,
    pub thumbnail: Option<String>,
}

/// The full record for one cocktail
#[derive(Debug, Clone)]
pub struct CocktailDetail {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub alcoholic: Option<String>,
    pub glass: Option<String>,
    pub thumbnail: Option<String>,
    pub instructions: Option<String>,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub measure: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DrinkList {
    drinks: Option<Vec<Drink>>,
}

/// The upstream representation of a drink. Ingredients are spread over
/// numbered columns, so everything not named here lands in `columns`.
#[derive(Debug, Clone, Deserialize)]
struct Drink {
    #[serde(rename = "idDrink")]
    id: String,
    #[serde(rename = "strDrink")]
    name: String,
    #[serde(rename = "strCategory")]
    category: Option<String>,
    #[serde(rename = "strAlcoholic")]
    alcoholic: Option<String>,
    #[serde(rename = "strGlass")]
    glass: Option<String>,
    #[serde(rename = "strInstructions")]
    instructions: Option<String>,
    #[serde(rename = "strDrinkThumb")]
    thumbnail: Option<String>,
    #[serde(flatten)]
    columns: BTreeMap<String, Option<String>>,
}

impl Drink {
    /// Collects the `strIngredient1..15` and `strMeasure1..15` pairs into
    /// an ordered list, skipping empty columns.
    fn ingredients(&self) -> Vec<Ingredient> {
        (1..=INGREDIENT_COLUMNS)
            .filter_map(|index| {
                let name = self
                    .columns
                    .get(&format!("strIngredient{}", index))?
                    .as_deref()?
                    .trim();

                if name.is_empty() {
                    return None;
                }

                let measure = self
                    .columns
                    .get(&format!("strMeasure{}", index))
                    .and_then(|m| m.as_deref())
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty());

                Some(Ingredient {
                    name: name.to_string(),
                    measure,
                })
            })
            .collect()
    }
}

impl From<Drink> for CocktailSummary {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            name: drink.name,
            category: drink.category,
            alcoholic: drink.alcoholic,
            glass: drink.glass,
            thumbnail: drink.thumbnail,
        }
    }
}

impl From<Drink> for CocktailDetail {
    fn from(drink: Drink) -> Self {
        let ingredients = drink.ingredients();

        Self {
            id: drink.id,
            name: drink.name,
            category: drink.category,
            alcoholic: drink.alcoholic,
            glass: drink.glass,
            thumbnail: drink.thumbnail,
            instructions: drink.instructions,
            ingredients,
        }
    }
}

impl RecipeGateway {
    pub fn new(api_base: String) -> Self {
        Self {
            client: Client::new(),
            api_base,
        }
    }

    /// Searches the recipe service by cocktail name.
    /// Zero matches is an explicit [RecipeError::NotFound].
    pub async fn search_by_name(&self, query: &str) -> Result<Vec<CocktailSummary>, RecipeError> {
        let url = format!("{}/search.php", self.api_base);
        let drinks = self.fetch_drinks(&url, ("s", query)).await?;

        Ok(drinks.into_iter().map(CocktailSummary::from).collect())
    }

    /// Fetches the full record for one cocktail id
    pub async fn lookup_by_id(&self, cocktail_id: &str) -> Result<CocktailDetail, RecipeError> {
        let url = format!("{}/lookup.php", self.api_base);
        let drinks = self.fetch_drinks(&url, ("i", cocktail_id)).await?;

        // The lookup endpoint wraps the single record in the same list shape
        drinks
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or(RecipeError::NotFound)
    }

    async fn fetch_drinks(
        &self,
        url: &str,
        param: (&str, &str),
    ) -> Result<Vec<Drink>, RecipeError> {
        let response = self
            .client
            .get(url)
            .query(&[param])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                warn!("Recipe service is unreachable: {}", e);
                RecipeError::Upstream(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RecipeError::Upstream(e.to_string()))?;

        decode_drinks(status, &body)
    }
}

impl Default for RecipeGateway {
    fn default() -> Self {
        Self::new(API_BASE.to_string())
    }
}

/// Interprets a recipe service response:
/// a non-success status is an upstream failure, a well-formed body with
/// `drinks: null` or an empty list means nothing matched.
fn decode_drinks(status: StatusCode, body: &str) -> Result<Vec<Drink>, RecipeError> {
    if !status.is_success() {
        return Err(RecipeError::Upstream(format!(
            "unexpected status {}",
            status
        )));
    }

    let list: DrinkList =
        serde_json::from_str(body).map_err(|e| RecipeError::Parse(e.to_string()))?;

    match list.drinks {
        Some(drinks) if !drinks.is_empty() => Ok(drinks),
        _ => Err(RecipeError::NotFound),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MARGARITA: &str = r#"{
        "drinks": [
            {
                "idDrink": "11007",
                "strDrink": "Margarita",
                "strCategory": "Ordinary Drink",
                "strAlcoholic": "Alcoholic",
                "strGlass": "Cocktail glass",
                "strInstructions": "Shake with ice and strain into glass.",
                "strDrinkThumb": "https://example.com/margarita.jpg",
                "strIngredient1": "Tequila",
                "strIngredient2": "Triple sec",
                "strIngredient3": "Lime juice",
                "strIngredient4": " ",
                "strIngredient5": null,
                "strMeasure1": "1 1/2 oz ",
                "strMeasure2": "1/2 oz ",
                "strMeasure3": null,
                "strMeasure4": null,
                "strMeasure5": null
            }
        ]
    }"#;

    #[test]
    fn test_decode_match() {
        let drinks = decode_drinks(StatusCode::OK, MARGARITA).expect("body decodes");

        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].id, "11007");
        assert_eq!(drinks[0].name, "Margarita");
    }

    #[test]
    fn test_decode_no_match() {
        let result = decode_drinks(StatusCode::OK, r#"{"drinks": null}"#);
        assert!(matches!(result, Err(RecipeError::NotFound)));

        let result = decode_drinks(StatusCode::OK, r#"{"drinks": []}"#);
        assert!(matches!(result, Err(RecipeError::NotFound)));
    }

    #[test]
    fn test_decode_upstream_failure() {
        let result = decode_drinks(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        assert!(matches!(result, Err(RecipeError::Upstream(_))));
    }

    #[test]
    fn test_decode_garbage_body() {
        let result = decode_drinks(StatusCode::OK, "<!doctype html>");
        assert!(matches!(result, Err(RecipeError::Parse(_))));
    }

    #[test]
    fn test_ingredient_extraction() {
        let drinks = decode_drinks(StatusCode::OK, MARGARITA).expect("body decodes");
        let detail: CocktailDetail = drinks[0].clone().into();

        assert_eq!(
            detail.ingredients,
            vec![
                Ingredient {
                    name: "Tequila".to_string(),
                    measure: Some("1 1/2 oz".to_string()),
                },
                Ingredient {
                    name: "Triple sec".to_string(),
                    measure: Some("1/2 oz".to_string()),
                },
                Ingredient {
                    name: "Lime juice".to_string(),
                    measure: None,
                },
            ]
        );
    }
}
