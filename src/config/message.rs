use tokio::sync::oneshot;

use crate::{ArcPath, log::LogLevel, provider::ProviderId};

use super::data::{PathOpt, ProviderConfig, USizeOpt};

/// Messages that can be sent to the configuration actor.
///
/// Operations that return a value carry a channel to send the result back to
/// the caller.
#[derive(Debug)]
pub enum Message {
    /// Load configuration from file
    Load {
        tx: oneshot::Sender<anyhow::Result<()>>,
    },
    /// Save configuration to file
    Save {
        tx: oneshot::Sender<anyhow::Result<()>>,
    },
    GetPath {
        opt: PathOpt,
        tx: oneshot::Sender<ArcPath>,
    },
    SetPath {
        opt: PathOpt,
        path: ArcPath,
    },
    GetLogLevel {
        tx: oneshot::Sender<LogLevel>,
    },
    SetLogLevel {
        level: LogLevel,
    },
    GetUSize {
        opt: USizeOpt,
        tx: oneshot::Sender<usize>,
    },
    SetUSize {
        opt: USizeOpt,
        size: usize,
    },
    /// Get every configured provider, enabled or not
    GetProviders {
        tx: oneshot::Sender<Vec<ProviderConfig>>,
    },
    /// Get one provider by id
    GetProvider {
        id: ProviderId,
        tx: oneshot::Sender<Option<ProviderConfig>>,
    },
    SetProviders {
        providers: Vec<ProviderConfig>,
    },
}
