use crate::form::FormError;

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("this action requires a signed-in user")]
    Unauthenticated,
    #[error("the view has not finished loading")]
    NotLoaded,
    #[error("post not found")]
    PostNotFound,
    #[error("invalid form: {0}")]
    InvalidForm(#[from] FormError),
    #[error(transparent)]
    Service(#[from] anyhow::Error),
}
