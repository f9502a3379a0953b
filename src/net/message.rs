use tokio::sync::oneshot::Sender;

use super::Headers;
use crate::ArcStr;

/// Messages that can be sent to the [`Net`](super::Net) actor.
#[derive(Debug)]
pub enum Message {
    /// Performs an HTTP GET request to the specified URL
    Get {
        url: ArcStr,
        headers: Option<Headers>,
        tx: Sender<anyhow::Result<ArcStr>>,
    },
}
