use std::env::VarError;

use tokio::sync::{mpsc, oneshot};

use crate::ArcStr;

use super::{Env, message::Message};

/// The core of the Env actor. Reads variables from the process environment.
#[derive(Debug, Default)]
pub struct Core;

impl Core {
    pub fn new() -> Self {
        Default::default()
    }

    /// Transforms an instance of [`Core`] into an actor ready to receive messages.
    pub fn spawn(self) -> (Env, tokio::task::JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    Message::Get { tx, key } => self.get_env(tx, key),
                }
            }
        });

        (Env::Actual(tx), handle)
    }

    /// Looks up `key` and sends the result through `tx`.
    pub fn get_env(&self, tx: oneshot::Sender<Result<ArcStr, VarError>>, key: ArcStr) {
        let _ = tx.send(std::env::var(&*key).map(ArcStr::from));
    }
}
