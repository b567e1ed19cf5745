use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use shared::utils::describe_validation_errors;
use validator::Validate;

type Rejection = (StatusCode, Json<Value>);

fn fail(message: String) -> Rejection {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "status": "fail",
            "message": message
        })),
    )
}

/// JSON body that has passed its `validator` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| fail(format!("Invalid JSON body: {}", rejection.body_text())))?;

        value
            .validate()
            .map_err(|errors| fail(describe_validation_errors(&errors)))?;

        Ok(SimpleValidatedJson(value))
    }
}

/// Query string counterpart of [`SimpleValidatedJson`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| fail(format!("Invalid query: {}", rejection.body_text())))?;

        value
            .validate()
            .map_err(|errors| fail(describe_validation_errors(&errors)))?;

        Ok(ValidatedQuery(value))
    }
}
