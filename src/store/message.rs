use tokio::sync::oneshot;

use super::data::Metadata;
use crate::ArcStr;

#[derive(Debug)]
pub enum Message {
    Get {
        key: ArcStr,
        tx: oneshot::Sender<Option<ArcStr>>,
    },
    Set {
        key: ArcStr,
        blob: ArcStr,
        tx: oneshot::Sender<bool>,
    },
    Remove {
        key: ArcStr,
        tx: oneshot::Sender<bool>,
    },
    Metadata {
        key: ArcStr,
        tx: oneshot::Sender<Option<Metadata>>,
    },
    /// Drop every expired entry, replying with how many went away
    ClearExpired { tx: oneshot::Sender<usize> },
}
