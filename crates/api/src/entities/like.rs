use serde::Serialize;
use view::{LikeOutcome, PostPage};

#[derive(Serialize, Debug)]
pub struct LikeResult {
    pub outcome: LikeOutcome,
    pub page: PostPage,
}
