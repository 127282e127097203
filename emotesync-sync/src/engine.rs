//! Reconciliation engine.
//!
//! ## Run protocol
//!
//! 1. Resolve the workspace (fatal if it does not resolve).
//! 2. Scan the season folder (fatal only if the folder cannot be enumerated).
//! 3. Take one snapshot of the remote emote listing.
//! 4. Announce the start of the run.
//! 5. For each scanned entry, in scan order:
//!    - read failure → `Failed`
//!    - same-named remote emote → delete it; on failure → `Failed`, no create
//!    - create → `Created` and pause, or `Failed`
//! 6. Announce the summary.
//!
//! Per-asset failures are recorded in [`SyncResult`] and never abort the loop.
//! The snapshot is never re-listed; the engine only applies its own deletes
//! and creates to it so that colliding local names replace each other.

use emotesync_core::{Config, EmoteAsset, RemoteEmote, WorkspaceId};

use crate::announce::{aborted_text, complete_text, initiated_text, Announcer};
use crate::error::{AssetFailure, SyncError};
use crate::inventory::{self, ScanOrder};
use crate::pacing::Pacer;
use crate::remote::{Notifier, RemoteEmoteStore};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Lifecycle of a [`SyncEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Idle,
    Running,
    Done,
    /// A pre-check failed; reconciliation never started.
    Failed,
}

/// Result of processing one asset.
#[derive(Debug)]
pub enum SyncOutcome {
    Created,
    Failed(AssetFailure),
}

/// Aggregate of every per-asset outcome in a run.
///
/// `created_count + failed_count` equals the number of attempted assets;
/// files with unsupported extensions are never attempted.
#[derive(Debug, Default)]
pub struct SyncResult {
    pub created_count: usize,
    pub failed_count: usize,
    /// `(emote name, reason)` in processing order.
    pub failures: Vec<(String, AssetFailure)>,
}

impl SyncResult {
    pub fn record(&mut self, name: String, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Created => self.created_count += 1,
            SyncOutcome::Failed(failure) => {
                self.failed_count += 1;
                self.failures.push((name, failure));
            }
        }
    }

    pub fn attempted(&self) -> usize {
        self.created_count + self.failed_count
    }
}

// ---------------------------------------------------------------------------
// SyncEngine
// ---------------------------------------------------------------------------

/// One-shot reconciliation of a season folder against a remote workspace.
pub struct SyncEngine<'a, S: ?Sized, N: ?Sized, P> {
    store: &'a S,
    notifier: &'a N,
    pacer: P,
    order: ScanOrder,
    state: EngineState,
}

impl<'a, S, N, P> SyncEngine<'a, S, N, P>
where
    S: RemoteEmoteStore + ?Sized,
    N: Notifier + ?Sized,
    P: Pacer,
{
    pub fn new(store: &'a S, notifier: &'a N, pacer: P) -> Self {
        Self {
            store,
            notifier,
            pacer,
            order: ScanOrder::default(),
            state: EngineState::Idle,
        }
    }

    pub fn with_order(mut self, order: ScanOrder) -> Self {
        self.order = order;
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Reconcile `config.season_dir()` against the workspace.
    ///
    /// Returns `Err` only for fatal pre-checks; per-asset failures are in
    /// the returned [`SyncResult`]. An engine runs once: any later call
    /// returns [`SyncError::AlreadyRun`] without contacting the remote.
    pub fn run(&mut self, config: &Config) -> Result<SyncResult, SyncError> {
        if self.state != EngineState::Idle {
            return Err(SyncError::AlreadyRun { state: self.state });
        }
        let ws = config.workspace_id;
        let season = config.season.as_str();

        let workspace = match self.store.workspace(ws) {
            Ok(workspace) => workspace,
            Err(source) => {
                let announcer = Announcer::resolve(self.notifier, ws, config.notification_channel_id);
                let err = SyncError::WorkspaceNotFound { workspace: ws, source };
                return Err(self.fail(&announcer, season, err));
            }
        };
        tracing::info!("connected to workspace '{}' ({})", workspace.name, workspace.id);
        let announcer = Announcer::resolve(self.notifier, ws, config.notification_channel_id);

        let folder = config.season_dir();
        tracing::info!("processing emotes from folder: {}", folder.display());
        let entries = match inventory::scan(&folder, self.order) {
            Ok(entries) => entries,
            Err(err) => return Err(self.fail(&announcer, season, err)),
        };

        self.state = EngineState::Running;
        let mut snapshot = match self.store.list(ws) {
            Ok(emotes) => emotes,
            Err(source) => {
                let err = SyncError::Listing { workspace: ws, source };
                return Err(self.fail(&announcer, season, err));
            }
        };
        tracing::debug!("remote snapshot holds {} emote(s)", snapshot.len());
        announcer.announce(&initiated_text(season));

        let mut result = SyncResult::default();
        for entry in entries {
            match entry {
                Ok(asset) => {
                    let outcome = self.reconcile(ws, &mut snapshot, &asset);
                    result.record(asset.name, outcome);
                }
                Err(err) => {
                    let name = err.name.clone();
                    result.record(name, SyncOutcome::Failed(AssetFailure::Read(err)));
                }
            }
        }

        tracing::info!(
            "sync complete: {} created, {} failed",
            result.created_count,
            result.failed_count
        );
        announcer.announce(&complete_text(result.created_count, result.failed_count));
        self.state = EngineState::Done;
        Ok(result)
    }

    /// Replace-or-create a single asset.
    fn reconcile(
        &mut self,
        ws: WorkspaceId,
        snapshot: &mut Vec<RemoteEmote>,
        asset: &EmoteAsset,
    ) -> SyncOutcome {
        if let Some(pos) = snapshot.iter().position(|e| e.name == asset.name) {
            let existing = &snapshot[pos];
            if let Err(err) = self.store.delete(ws, &existing.id) {
                tracing::warn!("error deleting emote {}: {err}", asset.name);
                return SyncOutcome::Failed(AssetFailure::Delete(err));
            }
            tracing::info!("deleted emote: {} ({})", asset.name, existing.id);
            snapshot.remove(pos);
        }

        match self.store.create(ws, &asset.name, &asset.bytes) {
            Ok(created) => {
                tracing::info!("created emote: {} ({})", created.name, created.id);
                snapshot.push(created);
                self.pacer.pause();
                SyncOutcome::Created
            }
            Err(err) => {
                tracing::warn!("error creating emote {}: {err}", asset.name);
                SyncOutcome::Failed(AssetFailure::Create(err))
            }
        }
    }

    fn fail(&mut self, announcer: &Announcer<'_, N>, season: &str, err: SyncError) -> SyncError {
        tracing::error!("sync aborted: {err}");
        self.state = EngineState::Failed;
        announcer.announce(&aborted_text(season, &err.to_string()));
        err
    }
}
