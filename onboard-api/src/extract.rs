/// Request extractors
///
/// `ValidatedJson<T>` deserializes a JSON body and runs its `validator` rules
/// before the handler sees it. Both malformed bodies and rule violations are
/// reported as `ApiError`, so they render in the same envelope as every other
/// failure instead of axum's plain-text rejections.
///
/// # Example
///
/// ```no_run
/// use onboard_api::extract::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Payload {
///     #[validate(email(message = "Invalid email"))]
///     email: String,
/// }
///
/// async fn handler(ValidatedJson(payload): ValidatedJson<Payload>) -> String {
///     payload.email
/// }
/// ```

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that passed validation
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::BadRequest("Expected a JSON request body".to_string())
        }
        other => ApiError::BadRequest(other.body_text()),
    }
}
