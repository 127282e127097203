//! Mode dispatch: send one message, or run one sync.

use emotesync_core::Config;

use crate::announce::Announcer;
use crate::engine::{SyncEngine, SyncResult};
use crate::error::SyncError;
use crate::inventory::ScanOrder;
use crate::pacing::Pacer;
use crate::remote::{Notifier, RemoteEmoteStore};

/// What a single invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Post this text to the notification channel and stop.
    Message(String),
    /// Reconcile the season folder.
    Sync,
}

impl Mode {
    /// No positional arguments → sync; otherwise the arguments joined by
    /// single spaces form the message.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let words: Vec<String> = args.into_iter().map(Into::into).collect();
        if words.is_empty() {
            Mode::Sync
        } else {
            Mode::Message(words.join(" "))
        }
    }
}

/// Outcome of one dispatched invocation.
#[derive(Debug)]
pub enum RunReport {
    Message { text: String, delivered: bool },
    Sync(SyncResult),
}

/// Run `mode` against the remote collaborators.
///
/// Message mode never scans, lists, deletes, or creates.
pub fn run<S, N, P>(
    mode: Mode,
    config: &Config,
    store: &S,
    notifier: &N,
    pacer: P,
    order: ScanOrder,
) -> Result<RunReport, SyncError>
where
    S: RemoteEmoteStore + ?Sized,
    N: Notifier + ?Sized,
    P: Pacer,
{
    match mode {
        Mode::Message(text) => {
            let ws = config.workspace_id;
            store
                .workspace(ws)
                .map_err(|source| SyncError::WorkspaceNotFound { workspace: ws, source })?;
            let announcer = Announcer::resolve(notifier, ws, config.notification_channel_id);
            let delivered = announcer.announce(&text);
            Ok(RunReport::Message { text, delivered })
        }
        Mode::Sync => {
            let mut engine = SyncEngine::new(store, notifier, pacer).with_order(order);
            engine.run(config).map(RunReport::Sync)
        }
    }
}
