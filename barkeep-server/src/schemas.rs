use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterSchema {
    #[validate(length(min = 2, max = 80))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 64))]
    pub password: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginSchema {
    #[validate(length(max = 128))]
    pub username: String,
    #[validate(length(max = 64))]
    pub password: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchSchema {
    #[validate(length(min = 1, max = 256))]
    pub query: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SaveCocktailSchema {
    #[validate(length(min = 1, max = 50))]
    pub cocktail_id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1))]
    pub ingredients: String,
}

pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extracted_json: Json<T> = Json::from_request(req, state)
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "JSON parse failed"))?;

        extracted_json
            .0
            .validate()
            .map_err(|_| (StatusCode::BAD_REQUEST, "Request body is invalid"))?;

        Ok(Self(extracted_json.0))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_register_schema_validation() {
        let valid: RegisterSchema = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "correct-horse"
        }))
        .expect("body deserializes");

        assert!(valid.validate().is_ok());

        let weak_password: RegisterSchema = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "short"
        }))
        .expect("body deserializes");

        assert!(weak_password.validate().is_err());

        let bad_email: RegisterSchema = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "email": "not-an-address",
            "password": "correct-horse"
        }))
        .expect("body deserializes");

        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_save_schema_rejects_unknown_fields() {
        let result: Result<SaveCocktailSchema, _> = serde_json::from_value(serde_json::json!({
            "cocktailId": "11007",
            "name": "Margarita",
            "ingredients": "Tequila,Lime,Salt",
            "rating": 5
        }));

        assert!(result.is_err());
    }
}
