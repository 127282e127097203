//! End-to-end reconciliation tests against in-memory collaborators.

use std::cell::{Cell, RefCell};
use std::fs;

use emotesync_core::{ChannelId, Config, EmoteId, RemoteEmote, WorkspaceId};
use emotesync_sync::{
    pipeline::{self, Mode, RunReport},
    AssetFailure, Channel, EngineState, Notifier, Pacer, RemoteEmoteStore, RemoteError,
    ScanOrder, SyncEngine, SyncError, Workspace,
};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Workspace,
    List,
    Delete(String),
    Create(String),
}

#[derive(Default)]
struct FakeStore {
    emotes: RefCell<Vec<(RemoteEmote, Vec<u8>)>>,
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u64>,
    missing_workspace: bool,
    fail_list: bool,
    fail_delete: Vec<&'static str>,
    fail_create: Vec<&'static str>,
}

impl FakeStore {
    fn with_emotes(names: &[&str]) -> Self {
        let store = FakeStore::default();
        for name in names {
            store.insert(name, b"old".to_vec());
        }
        store
    }

    fn insert(&self, name: &str, bytes: Vec<u8>) -> RemoteEmote {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let emote = RemoteEmote {
            id: EmoteId(format!("e{id}")),
            name: name.to_string(),
        };
        self.emotes.borrow_mut().push((emote.clone(), bytes));
        emote
    }

    fn bytes_of(&self, name: &str) -> Vec<Vec<u8>> {
        self.emotes
            .borrow()
            .iter()
            .filter(|(e, _)| e.name == name)
            .map(|(_, b)| b.clone())
            .collect()
    }

    fn mutations(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Delete(_) | Call::Create(_)))
            .cloned()
            .collect()
    }

    fn emote_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !matches!(c, Call::Workspace))
            .count()
    }
}

impl RemoteEmoteStore for FakeStore {
    fn workspace(&self, workspace: WorkspaceId) -> Result<Workspace, RemoteError> {
        self.calls.borrow_mut().push(Call::Workspace);
        if self.missing_workspace {
            return Err(RemoteError::NotFound(format!("guild {workspace}")));
        }
        Ok(Workspace {
            id: workspace,
            name: "pod".into(),
        })
    }

    fn list(&self, _workspace: WorkspaceId) -> Result<Vec<RemoteEmote>, RemoteError> {
        self.calls.borrow_mut().push(Call::List);
        if self.fail_list {
            return Err(RemoteError::Transport("connection reset".into()));
        }
        Ok(self.emotes.borrow().iter().map(|(e, _)| e.clone()).collect())
    }

    fn delete(&self, _workspace: WorkspaceId, emote: &EmoteId) -> Result<(), RemoteError> {
        let mut emotes = self.emotes.borrow_mut();
        let pos = emotes
            .iter()
            .position(|(e, _)| &e.id == emote)
            .ok_or_else(|| RemoteError::NotFound(emote.to_string()))?;
        let name = emotes[pos].0.name.clone();
        self.calls.borrow_mut().push(Call::Delete(name.clone()));
        if self.fail_delete.contains(&name.as_str()) {
            return Err(RemoteError::PermissionDenied(name));
        }
        emotes.remove(pos);
        Ok(())
    }

    fn create(
        &self,
        _workspace: WorkspaceId,
        name: &str,
        bytes: &[u8],
    ) -> Result<RemoteEmote, RemoteError> {
        self.calls.borrow_mut().push(Call::Create(name.to_string()));
        if self.fail_create.contains(&name) {
            return Err(RemoteError::PayloadTooLarge(format!("{name}: 300 KiB")));
        }
        Ok(self.insert(name, bytes.to_vec()))
    }
}

#[derive(Default)]
struct FakeNotifier {
    no_channel: bool,
    sent: RefCell<Vec<String>>,
}

impl Notifier for FakeNotifier {
    fn resolve_channel(
        &self,
        _workspace: WorkspaceId,
        explicit: Option<ChannelId>,
    ) -> Result<Option<Channel>, RemoteError> {
        if self.no_channel {
            return Ok(None);
        }
        Ok(Some(Channel {
            id: explicit.unwrap_or(ChannelId(1)),
            name: "general".into(),
        }))
    }

    fn send(&self, _channel: &Channel, text: &str) -> Result<(), RemoteError> {
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct CountingPacer(usize);

impl Pacer for CountingPacer {
    fn pause(&mut self) {
        self.0 += 1;
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn season(files: &[(&str, &[u8])]) -> (TempDir, Config) {
    let root = TempDir::new().expect("tempdir");
    let dir = root.path().join("base");
    fs::create_dir_all(&dir).expect("mkdir");
    for (name, bytes) in files {
        fs::write(dir.join(name), bytes).expect("write");
    }
    let config = Config {
        token: "token".into(),
        workspace_id: WorkspaceId(42),
        notification_channel_id: None,
        asset_folder: root.path().to_path_buf(),
        season: "base".into(),
    };
    (root, config)
}

fn sync(
    config: &Config,
    store: &FakeStore,
    notifier: &FakeNotifier,
    pacer: &mut CountingPacer,
) -> Result<emotesync_sync::SyncResult, SyncError> {
    let mut engine = SyncEngine::new(store, notifier, pacer).with_order(ScanOrder::ByFileName);
    engine.run(config)
}

// ---------------------------------------------------------------------------
// 1. Happy paths
// ---------------------------------------------------------------------------

#[test]
fn distinct_assets_into_empty_store_are_all_created() {
    let (_root, config) = season(&[("a.png", b"a"), ("b.jpg", b"b"), ("c.gif", b"c")]);
    let store = FakeStore::default();
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let result = sync(&config, &store, &notifier, &mut pacer).expect("sync");
    assert_eq!(result.created_count, 3);
    assert_eq!(result.failed_count, 0);
    assert_eq!(result.attempted(), 3);
    assert_eq!(pacer.0, 3, "one pause per successful create");
}

#[test]
fn example_season_replaces_fox_and_creates_cat() {
    let (_root, config) = season(&[
        ("fox.png", b"new-fox"),
        ("cat.gif", b"cat"),
        ("README.txt", b"docs"),
    ]);
    let store = FakeStore::with_emotes(&["fox"]);
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let result = sync(&config, &store, &notifier, &mut pacer).expect("sync");
    assert_eq!((result.created_count, result.failed_count), (2, 0));
    assert_eq!(
        store.mutations(),
        vec![
            Call::Create("cat".into()),
            Call::Delete("fox".into()),
            Call::Create("fox".into()),
        ]
    );
    assert_eq!(store.bytes_of("fox"), vec![b"new-fox".to_vec()]);
    assert_eq!(store.bytes_of("cat"), vec![b"cat".to_vec()]);
    assert!(store.bytes_of("README").is_empty());
}

#[test]
fn notifications_bracket_the_run() {
    let (_root, config) = season(&[("a.png", b"a")]);
    let store = FakeStore::default();
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    sync(&config, &store, &notifier, &mut pacer).expect("sync");
    let sent = notifier.sent.borrow();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].starts_with("**[OPERATION INITIATED]**"));
    assert!(sent[0].contains("'base'"));
    assert!(sent[1].starts_with("**[OPERATION COMPLETE]** 1 emote asset(s)"));
    assert!(!sent[1].contains("failed"));
}

#[test]
fn listing_happens_exactly_once() {
    let (_root, config) = season(&[("a.png", b"a"), ("b.png", b"b")]);
    let store = FakeStore::with_emotes(&["a", "b"]);
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    sync(&config, &store, &notifier, &mut pacer).expect("sync");
    let lists = store
        .calls
        .borrow()
        .iter()
        .filter(|c| **c == Call::List)
        .count();
    assert_eq!(lists, 1);
}

#[test]
fn missing_channel_does_not_fail_the_run() {
    let (_root, config) = season(&[("a.png", b"a")]);
    let store = FakeStore::default();
    let notifier = FakeNotifier {
        no_channel: true,
        ..FakeNotifier::default()
    };
    let mut pacer = CountingPacer::default();

    let result = sync(&config, &store, &notifier, &mut pacer).expect("sync");
    assert_eq!(result.created_count, 1);
    assert!(notifier.sent.borrow().is_empty());
}

// ---------------------------------------------------------------------------
// 2. Per-asset failure isolation
// ---------------------------------------------------------------------------

#[test]
fn delete_failure_keeps_old_emote_and_skips_create() {
    let (_root, config) = season(&[("fox.png", b"new-fox"), ("owl.png", b"owl")]);
    let store = FakeStore {
        fail_delete: vec!["fox"],
        ..FakeStore::with_emotes(&["fox"])
    };
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let result = sync(&config, &store, &notifier, &mut pacer).expect("sync");
    assert_eq!((result.created_count, result.failed_count), (1, 1));
    assert!(!store.mutations().contains(&Call::Create("fox".into())));
    assert_eq!(store.bytes_of("fox"), vec![b"old".to_vec()]);

    let (name, failure) = &result.failures[0];
    assert_eq!(name, "fox");
    assert!(matches!(failure, AssetFailure::Delete(RemoteError::PermissionDenied(_))));
    assert!(notifier.sent.borrow()[1].ends_with(" 1 failed."));
}

#[test]
fn create_failure_does_not_stop_later_assets() {
    let (_root, config) = season(&[("a.png", b"a"), ("b.png", b"b"), ("c.png", b"c")]);
    let store = FakeStore {
        fail_create: vec!["a"],
        ..FakeStore::default()
    };
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let result = sync(&config, &store, &notifier, &mut pacer).expect("sync");
    assert_eq!((result.created_count, result.failed_count), (2, 1));
    assert_eq!(pacer.0, 2, "failed creates are not paced");
    assert!(matches!(result.failures[0].1, AssetFailure::Create(_)));
    assert_eq!(store.bytes_of("c"), vec![b"c".to_vec()]);
}

#[test]
#[cfg(unix)]
fn unreadable_file_counts_as_failed_and_others_are_created() {
    let (root, config) = season(&[("a.png", b"a"), ("c.png", b"c")]);
    let dir = root.path().join("base");
    std::os::unix::fs::symlink(root.path().join("nowhere"), dir.join("b.png")).expect("symlink");

    let store = FakeStore::default();
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let result = sync(&config, &store, &notifier, &mut pacer).expect("sync");
    assert_eq!((result.created_count, result.failed_count), (2, 1));
    assert_eq!(result.failures[0].0, "b");
    assert!(matches!(result.failures[0].1, AssetFailure::Read(_)));
    assert_eq!(
        store.mutations(),
        vec![Call::Create("a".into()), Call::Create("c".into())]
    );
    assert_eq!(pacer.0, 2);
}

#[test]
#[cfg(unix)]
fn permission_denied_file_counts_as_failed() {
    use std::os::unix::fs::PermissionsExt;

    let (root, config) = season(&[("a.png", b"a"), ("b.png", b"b")]);
    let locked = root.path().join("base").join("b.png");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");
    if fs::read(&locked).is_ok() {
        // Permission bits are not enforced for root.
        return;
    }

    let store = FakeStore::default();
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let result = sync(&config, &store, &notifier, &mut pacer).expect("sync");
    assert_eq!((result.created_count, result.failed_count), (1, 1));
    assert!(matches!(result.failures[0].1, AssetFailure::Read(_)));

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).expect("chmod back");
}

// ---------------------------------------------------------------------------
// 3. Naming collisions and repeat runs
// ---------------------------------------------------------------------------

#[test]
fn colliding_local_names_last_processed_wins() {
    let (_root, config) = season(&[("a.gif", b"gif"), ("a.png", b"png")]);
    let store = FakeStore::with_emotes(&["a"]);
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let result = sync(&config, &store, &notifier, &mut pacer).expect("sync");
    assert_eq!((result.created_count, result.failed_count), (2, 0));
    assert_eq!(store.bytes_of("a"), vec![b"png".to_vec()], "exactly one 'a' remains");
}

#[test]
fn second_run_recreates_every_asset() {
    let (_root, config) = season(&[("a.png", b"a"), ("b.png", b"b")]);
    let store = FakeStore::default();
    let notifier = FakeNotifier::default();

    let first = sync(&config, &store, &notifier, &mut CountingPacer::default()).expect("first");
    let second = sync(&config, &store, &notifier, &mut CountingPacer::default()).expect("second");

    assert_eq!(first.created_count, second.created_count);
    assert_eq!(store.bytes_of("a").len(), 1);
    assert_eq!(store.bytes_of("b").len(), 1);
    let deletes = store
        .mutations()
        .iter()
        .filter(|c| matches!(c, Call::Delete(_)))
        .count();
    assert_eq!(deletes, 2, "presence, not content, drives replacement");
}

// ---------------------------------------------------------------------------
// 4. Fatal pre-checks
// ---------------------------------------------------------------------------

#[test]
fn unknown_workspace_fails_before_touching_emotes() {
    let (_root, config) = season(&[("a.png", b"a")]);
    let store = FakeStore {
        missing_workspace: true,
        ..FakeStore::default()
    };
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let mut engine = SyncEngine::new(&store, &notifier, &mut pacer);
    let err = engine.run(&config).unwrap_err();
    assert!(matches!(err, SyncError::WorkspaceNotFound { .. }), "got: {err}");
    assert_eq!(engine.state(), EngineState::Failed);
    assert_eq!(store.emote_calls(), 0);

    let sent = notifier.sent.borrow();
    assert_eq!(sent.len(), 1, "best-effort abort notice");
    assert!(sent[0].starts_with("**[OPERATION ABORTED]**"));
}

#[test]
fn failed_listing_is_fatal_and_mutates_nothing() {
    let (_root, config) = season(&[("a.png", b"a")]);
    let store = FakeStore {
        fail_list: true,
        ..FakeStore::default()
    };
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let err = sync(&config, &store, &notifier, &mut pacer).unwrap_err();
    assert!(matches!(err, SyncError::Listing { .. }));
    assert!(store.mutations().is_empty());
}

#[test]
fn vanished_season_folder_is_fatal() {
    let (root, config) = season(&[]);
    fs::remove_dir(root.path().join("base")).expect("rmdir");
    let store = FakeStore::default();
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let mut engine = SyncEngine::new(&store, &notifier, &mut pacer);
    let err = engine.run(&config).unwrap_err();
    assert!(matches!(err, SyncError::AssetFolder { .. }));
    assert_eq!(engine.state(), EngineState::Failed);
    assert!(!store.calls.borrow().contains(&Call::List));
}

#[test]
fn engine_reports_done_after_success() {
    let (_root, config) = season(&[]);
    let store = FakeStore::default();
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let mut engine = SyncEngine::new(&store, &notifier, &mut pacer);
    assert_eq!(engine.state(), EngineState::Idle);
    let result = engine.run(&config).expect("sync");
    assert_eq!(result.attempted(), 0);
    assert_eq!(engine.state(), EngineState::Done);
}

#[test]
fn engine_refuses_a_second_run() {
    let (_root, config) = season(&[("a.png", b"a")]);
    let store = FakeStore::default();
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let mut engine = SyncEngine::new(&store, &notifier, &mut pacer);
    engine.run(&config).expect("first run");
    let calls_after_first = store.calls.borrow().len();
    let sent_after_first = notifier.sent.borrow().len();

    let err = engine.run(&config).unwrap_err();
    assert!(
        matches!(err, SyncError::AlreadyRun { state: EngineState::Done }),
        "got: {err}"
    );
    assert_eq!(engine.state(), EngineState::Done);
    assert_eq!(store.calls.borrow().len(), calls_after_first);
    assert_eq!(notifier.sent.borrow().len(), sent_after_first);
    drop(engine);
    assert_eq!(pacer.0, 1);
}

#[test]
fn failed_engine_cannot_be_rerun() {
    let (_root, config) = season(&[("a.png", b"a")]);
    let store = FakeStore {
        missing_workspace: true,
        ..FakeStore::default()
    };
    let notifier = FakeNotifier::default();
    let mut pacer = CountingPacer::default();

    let mut engine = SyncEngine::new(&store, &notifier, &mut pacer);
    engine.run(&config).unwrap_err();
    let err = engine.run(&config).unwrap_err();
    assert!(matches!(err, SyncError::AlreadyRun { state: EngineState::Failed }));
    assert_eq!(store.calls.borrow().len(), 1, "workspace looked up once");
}

// ---------------------------------------------------------------------------
// 5. Mode dispatch
// ---------------------------------------------------------------------------

#[test]
fn message_mode_sends_once_and_never_touches_emotes() {
    let (_root, config) = season(&[("a.png", b"a")]);
    let store = FakeStore::with_emotes(&["a"]);
    let notifier = FakeNotifier::default();

    let report = pipeline::run(
        Mode::from_args(["Hello", "World"]),
        &config,
        &store,
        &notifier,
        CountingPacer::default(),
        ScanOrder::Storage,
    )
    .expect("run");

    assert!(matches!(
        report,
        RunReport::Message { ref text, delivered: true } if text == "Hello World"
    ));
    assert_eq!(*notifier.sent.borrow(), vec!["Hello World".to_string()]);
    assert_eq!(store.emote_calls(), 0);
}

#[test]
fn sync_mode_through_dispatcher_returns_result() {
    let (_root, config) = season(&[("a.png", b"a")]);
    let store = FakeStore::default();
    let notifier = FakeNotifier::default();

    let report = pipeline::run(
        Mode::from_args(Vec::<String>::new()),
        &config,
        &store,
        &notifier,
        CountingPacer::default(),
        ScanOrder::Storage,
    )
    .expect("run");

    match report {
        RunReport::Sync(result) => assert_eq!(result.created_count, 1),
        other => panic!("expected sync report, got {other:?}"),
    }
}
