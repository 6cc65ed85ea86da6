use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_with::skip_serializing_none;
use view::ViewError;

#[skip_serializing_none]
#[derive(Serialize, Debug)]
pub struct ApiError {
    pub error: String,
    #[serde(rename = "error_description")]
    pub description: Option<String>,
    #[serde(skip_serializing)]
    pub status_code: StatusCode,
}

impl ApiError {
    pub fn new(error: &str, status_code: StatusCode) -> Self {
        ApiError {
            error: String::from(error),
            description: None,
            status_code,
        }
    }

    pub fn new_with_description(error: &str, description: &str, status_code: StatusCode) -> Self {
        ApiError {
            error: String::from(error),
            description: Some(String::from(description)),
            status_code,
        }
    }

    pub fn not_found() -> Self {
        ApiError::new("Record not found", StatusCode::NOT_FOUND)
    }

    pub fn unauthenticated() -> Self {
        ApiError::new(
            "This method requires an authenticated user",
            StatusCode::UNAUTHORIZED,
        )
    }
}

impl From<ViewError> for ApiError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::Unauthenticated => ApiError::unauthenticated(),
            ViewError::PostNotFound => ApiError::not_found(),
            ViewError::NotLoaded => ApiError::new(
                "The post is still loading, try again",
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            ViewError::InvalidForm(err) => ApiError::new_with_description(
                "Validation failed",
                &err.to_string(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            ViewError::Service(err) => {
                log::error!("Error from route, {:#?}", err);
                ApiError::new_with_description(
                    "The change could not be saved",
                    &format!("{:#}", err),
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
