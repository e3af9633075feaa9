use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::state::{NowPlaying, PermissionState, PlaybackState, UNKNOWN_SONG};
use super::stats::ControllerStats;
use crate::audio::{AudioFrame, CaptureDevice, TapConfig};
use crate::error::{ControllerError, Failure};
use crate::playback::PlaybackService;
use crate::recognition::{MatchResult, RecognitionService, RecognitionSession};

/// Controller settings
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Stream handed to the playback service
    pub stream_url: String,

    /// Tap installed on the capture device while playing
    pub tap: TapConfig,
}

/// Coordinates playback with a live recognition session and keeps the
/// "now playing" label
///
/// Playback state, the current match and the label are only mutated while
/// holding the controller lock. Captured buffers are forwarded by a
/// dedicated task that never takes that lock.
pub struct RecognitionController {
    stream_url: String,
    tap_config: TapConfig,
    capture: Arc<dyn CaptureDevice>,
    recognition: Arc<dyn RecognitionService>,
    inner: Arc<Mutex<Inner>>,
    shared: Arc<Shared>,
}

struct Inner {
    state: PlaybackState,
    playback: Box<dyn PlaybackService>,
    now_playing: NowPlaying,
    live: Option<LiveSession>,
    started_at: Option<DateTime<Utc>>,
}

/// Resources held while playing, released in declaration order
struct LiveSession {
    tapped: bool,
    forwarder: Option<JoinHandle<()>>,
    session: Option<Arc<dyn RecognitionSession>>,
    listener: Option<JoinHandle<()>>,
}

struct Shared {
    label_tx: watch::Sender<String>,
    state_tx: watch::Sender<PlaybackState>,
    permission: std::sync::Mutex<PermissionState>,
    last_failure: std::sync::Mutex<Option<Failure>>,
    sessions_opened: AtomicU64,
    buffers_forwarded: AtomicU64,
    label_updates: AtomicU64,
    session_errors: AtomicU64,
}

impl Shared {
    fn permission(&self) -> PermissionState {
        match self.permission.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn set_permission(&self, state: PermissionState) {
        match self.permission.lock() {
            Ok(mut guard) => *guard = state,
            Err(poisoned) => *poisoned.into_inner() = state,
        }
    }

    fn record_failure(&self, failure: Failure) {
        match self.last_failure.lock() {
            Ok(mut guard) => *guard = Some(failure),
            Err(poisoned) => *poisoned.into_inner() = Some(failure),
        }
    }

    fn last_failure(&self) -> Option<Failure> {
        match self.last_failure.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl RecognitionController {
    pub fn new(
        options: ControllerOptions,
        playback: Box<dyn PlaybackService>,
        capture: Arc<dyn CaptureDevice>,
        recognition: Arc<dyn RecognitionService>,
    ) -> Self {
        let (label_tx, _) = watch::channel(UNKNOWN_SONG.to_string());
        let (state_tx, _) = watch::channel(PlaybackState::Stopped);

        info!(
            "Recognition controller ready (playback: {}, capture: {}, recognizer: {})",
            playback.name(),
            capture.name(),
            recognition.name()
        );

        Self {
            stream_url: options.stream_url,
            tap_config: options.tap,
            capture,
            recognition,
            inner: Arc::new(Mutex::new(Inner {
                state: PlaybackState::Stopped,
                playback,
                now_playing: NowPlaying::new(),
                live: None,
                started_at: None,
            })),
            shared: Arc::new(Shared {
                label_tx,
                state_tx,
                permission: std::sync::Mutex::new(PermissionState::Unknown),
                last_failure: std::sync::Mutex::new(None),
                sessions_opened: AtomicU64::new(0),
                buffers_forwarded: AtomicU64::new(0),
                label_updates: AtomicU64::new(0),
                session_errors: AtomicU64::new(0),
            }),
        }
    }

    /// Start playback and recognition
    pub async fn start(&self) -> Result<(), ControllerError> {
        let mut inner = self.inner.lock().await;
        self.start_locked(&mut inner).await
    }

    /// Stop recognition and playback
    ///
    /// The label is left as it is.
    pub async fn stop(&self) -> Result<(), ControllerError> {
        let mut inner = self.inner.lock().await;
        self.stop_locked(&mut inner).await
    }

    /// Flip between playing and stopped, returning the new state
    pub async fn toggle(&self) -> Result<PlaybackState, ControllerError> {
        let mut inner = self.inner.lock().await;
        match inner.state {
            PlaybackState::Playing => self.stop_locked(&mut inner).await?,
            PlaybackState::Stopped => self.start_locked(&mut inner).await?,
        }
        Ok(inner.state)
    }

    /// Stop if playing; used on shutdown
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state == PlaybackState::Playing {
            let _ = self.stop_locked(&mut inner).await;
        }
    }

    /// Handle a recognition result
    ///
    /// Never changes the playback state.
    pub async fn on_match(&self, result: MatchResult) {
        let mut inner = self.inner.lock().await;
        apply_result(&mut inner, &self.shared, result);
    }

    pub fn state(&self) -> PlaybackState {
        *self.shared.state_tx.borrow()
    }

    pub fn label(&self) -> String {
        self.shared.label_tx.borrow().clone()
    }

    pub fn permission(&self) -> PermissionState {
        self.shared.permission()
    }

    /// Observe label changes
    pub fn watch_label(&self) -> watch::Receiver<String> {
        self.shared.label_tx.subscribe()
    }

    /// Observe playback state changes
    pub fn watch_state(&self) -> watch::Receiver<PlaybackState> {
        self.shared.state_tx.subscribe()
    }

    /// Get current controller statistics
    pub async fn stats(&self) -> ControllerStats {
        let started_at = {
            let inner = self.inner.lock().await;
            inner.started_at
        };

        let duration_secs = started_at
            .map(|at| Utc::now().signed_duration_since(at).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);

        ControllerStats {
            state: self.state(),
            label: self.label(),
            permission: self.permission(),
            started_at,
            duration_secs,
            sessions_opened: self.shared.sessions_opened.load(Ordering::SeqCst),
            buffers_forwarded: self.shared.buffers_forwarded.load(Ordering::SeqCst),
            label_updates: self.shared.label_updates.load(Ordering::SeqCst),
            session_errors: self.shared.session_errors.load(Ordering::SeqCst),
            last_failure: self.shared.last_failure(),
        }
    }

    async fn start_locked(&self, inner: &mut Inner) -> Result<(), ControllerError> {
        if inner.state == PlaybackState::Playing {
            warn!("Playback already started");
            return Err(ControllerError::AlreadyStarted);
        }

        info!("Starting playback of {}", self.stream_url);

        self.request_permission();

        if let Err(e) = inner.playback.play(&self.stream_url).await {
            error!("Failed to start playback: {:#}", e);
            self.shared
                .record_failure(Failure::PlaybackStartFailure(format!("{:#}", e)));
        }
        info!("Playback status: {}", inner.playback.status().await);

        let live = self.attach_session().await;

        inner.live = Some(live);
        inner.state = PlaybackState::Playing;
        inner.started_at = Some(Utc::now());
        self.shared.state_tx.send_replace(PlaybackState::Playing);

        info!("Playing and started recognition");

        Ok(())
    }

    async fn stop_locked(&self, inner: &mut Inner) -> Result<(), ControllerError> {
        if inner.state != PlaybackState::Playing {
            warn!("Playback not active");
            return Err(ControllerError::NotStarted);
        }

        info!("Stopping playback and recognition");

        if let Some(live) = inner.live.take() {
            self.detach_session(live).await;
        }

        if let Err(e) = inner.playback.stop().await {
            error!("Failed to stop playback: {:#}", e);
        }

        inner.state = PlaybackState::Stopped;
        inner.started_at = None;
        self.shared.state_tx.send_replace(PlaybackState::Stopped);

        info!("Stopped playing and recognition");

        Ok(())
    }

    /// Ask for capture permission without waiting for the answer
    fn request_permission(&self) {
        match self.shared.permission() {
            PermissionState::Granted | PermissionState::Pending => return,
            PermissionState::Unknown | PermissionState::Denied => {}
        }
        self.shared.set_permission(PermissionState::Pending);

        let capture = Arc::clone(&self.capture);
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            let granted = match capture.request_permission().await {
                Ok(granted) => granted,
                Err(e) => {
                    error!("Capture permission request failed: {:#}", e);
                    false
                }
            };

            if granted {
                info!("Recording permission granted");
                shared.set_permission(PermissionState::Granted);
            } else {
                warn!("Recording permission denied, songs will not be recognized");
                shared.set_permission(PermissionState::Denied);
                shared.record_failure(Failure::PermissionDenied);
            }
        });
    }

    async fn attach_session(&self) -> LiveSession {
        let mut live = LiveSession {
            tapped: false,
            forwarder: None,
            session: None,
            listener: None,
        };

        let (events_tx, events_rx) = mpsc::channel(32);

        let session = match self.recognition.create_session(events_tx).await {
            Ok(session) => session,
            Err(e) => {
                self.attach_failed(e);
                return live;
            }
        };

        self.shared.sessions_opened.fetch_add(1, Ordering::SeqCst);
        info!("Recognition session {} opened", session.id());

        live.listener = Some(self.spawn_listener(events_rx));

        match self.capture.install_tap(self.tap_config.clone()).await {
            Ok(tap_rx) => {
                live.tapped = true;
                live.forwarder = Some(self.spawn_forwarder(Arc::clone(&session), tap_rx));
            }
            Err(e) => self.attach_failed(e),
        }

        live.session = Some(session);
        live
    }

    async fn detach_session(&self, mut live: LiveSession) {
        // Buffers must stop before the session goes away
        if live.tapped {
            if let Err(e) = self.capture.remove_tap().await {
                error!("Failed to remove capture tap: {:#}", e);
            }
        }

        if let Some(forwarder) = live.forwarder.take() {
            forwarder.abort();
            join_task(forwarder, "Buffer forwarder").await;
        }

        if let Some(session) = live.session.take() {
            if let Err(e) = session.close().await {
                error!("Failed to close recognition session {}: {:#}", session.id(), e);
            }
            info!("Recognition session {} closed", session.id());
        }

        if let Some(listener) = live.listener.take() {
            listener.abort();
            join_task(listener, "Result listener").await;
        }
    }

    fn attach_failed(&self, e: anyhow::Error) {
        error!("Failed to attach recognition session: {:#}", e);
        self.shared.session_errors.fetch_add(1, Ordering::SeqCst);
        self.shared
            .record_failure(Failure::SessionAttachFailure(format!("{:#}", e)));
    }

    /// Applies session results until the session is detached.
    ///
    /// Detaching aborts and joins this task under the inner lock, so a
    /// retired session never reaches `apply_result`.
    fn spawn_listener(&self, mut events_rx: mpsc::Receiver<MatchResult>) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            while let Some(result) = events_rx.recv().await {
                let mut inner = inner.lock().await;
                apply_result(&mut inner, &shared, result);
            }
        })
    }

    fn spawn_forwarder(
        &self,
        session: Arc<dyn RecognitionSession>,
        mut tap_rx: mpsc::Receiver<AudioFrame>,
    ) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            debug!("Buffer forwarder started for {}", session.id());
            let mut skipped = 0u64;

            while let Some(frame) = tap_rx.recv().await {
                if shared.permission() != PermissionState::Granted {
                    skipped += 1;
                    continue;
                }

                match session.feed(frame).await {
                    Ok(()) => {
                        shared.buffers_forwarded.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => warn!("Failed to feed buffer to {}: {:#}", session.id(), e),
                }
            }

            debug!(
                "Buffer forwarder for {} finished ({} buffers skipped without permission)",
                session.id(),
                skipped
            );
        })
    }
}

fn apply_result(inner: &mut Inner, shared: &Shared, result: MatchResult) {
    if let MatchResult::SessionError { message } = &result {
        warn!("Recognition session failed with error: {}", message);
        shared.session_errors.fetch_add(1, Ordering::SeqCst);
        shared.record_failure(Failure::SessionError(message.clone()));
        return;
    }

    if inner.now_playing.apply(&result) {
        let label = inner.now_playing.label();
        info!("Now playing: {}", label);
        shared.label_tx.send_replace(label);
        shared.label_updates.fetch_add(1, Ordering::SeqCst);
    }
}

async fn join_task(handle: JoinHandle<()>, what: &str) {
    if let Err(e) = handle.await {
        if !e.is_cancelled() {
            error!("{} panicked: {}", what, e);
        }
    }
}
