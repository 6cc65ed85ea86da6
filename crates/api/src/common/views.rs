use std::sync::Arc;

use view::{navigation::Navigator, Identity, SinglePostView};
use web::AppState;

/// Opens a single-post view for one request and waits for its data.
///
/// A view that is not ready within the configured timeout is returned as is;
/// the page then renders whatever already arrived.
pub async fn open_post(
    state: &AppState,
    identity: Identity,
    navigator: Arc<dyn Navigator>,
    id: &str,
) -> SinglePostView {
    let view =
        SinglePostView::initialize(state.services.clone(), identity, navigator, id).await;

    if tokio::time::timeout(state.config.web.view_timeout(), view.ready())
        .await
        .is_err()
    {
        log::warn!("post {} view not ready after {:?}", id, state.config.web.view_timeout());
    }

    view
}
