//! Video search results.

use serde::{Deserialize, Serialize};

/// One hit from the video search client, in the site's own ranking order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    /// 11-character video id; doubles as the deep-link content id.
    pub id: String,
    /// Empty when the result came from the raw-page fallback scan.
    pub title: String,
    pub channel: String,
}
