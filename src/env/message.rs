use std::env::VarError;

use tokio::sync::oneshot;

use crate::ArcStr;

/// Messages that can be sent to an [`Env`](super::Env) actor.
#[derive(Debug)]
pub enum Message {
    /// Gets an environment variable
    Get {
        tx: oneshot::Sender<Result<ArcStr, VarError>>,
        key: ArcStr,
    },
}
