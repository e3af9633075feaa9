// Mock collaborators for controller tests
//
// All mocks append to a shared event log so tests can check ordering.

#![allow(dead_code)]

use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use streamo::{
    AudioFrame, CaptureDevice, ControllerOptions, MatchResult, PlaybackService, PlaybackStatus,
    RecognitionController, RecognitionService, RecognitionSession, TapConfig,
};
use tokio::sync::mpsc;

pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

fn record(log: &EventLog, event: impl Into<String>) {
    log.lock().unwrap().push(event.into());
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn position(log: &EventLog, event: &str) -> Option<usize> {
    events(log).iter().position(|e| e == event)
}

// ============================================================================
// Playback
// ============================================================================

pub struct MockPlayback {
    log: EventLog,
    fail_play: bool,
    playing: bool,
}

impl MockPlayback {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            fail_play: false,
            playing: false,
        }
    }

    pub fn failing(log: EventLog) -> Self {
        Self {
            log,
            fail_play: true,
            playing: false,
        }
    }
}

#[async_trait::async_trait]
impl PlaybackService for MockPlayback {
    async fn play(&mut self, url: &str) -> Result<()> {
        record(&self.log, format!("play {}", url));
        if self.fail_play {
            bail!("stream unreachable");
        }
        self.playing = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        record(&self.log, "playback_stop");
        self.playing = false;
        Ok(())
    }

    async fn status(&mut self) -> PlaybackStatus {
        if self.playing {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Idle
        }
    }

    fn name(&self) -> &str {
        "mock player"
    }
}

// ============================================================================
// Capture
// ============================================================================

pub struct MockCapture {
    log: EventLog,
    grant: bool,
    fail_install: bool,
    tap: Mutex<Option<mpsc::Sender<AudioFrame>>>,
    pub permission_requests: AtomicUsize,
}

impl MockCapture {
    pub fn new(log: EventLog, grant: bool) -> Self {
        Self {
            log,
            grant,
            fail_install: false,
            tap: Mutex::new(None),
            permission_requests: AtomicUsize::new(0),
        }
    }

    pub fn failing_install(log: EventLog) -> Self {
        Self {
            fail_install: true,
            ..Self::new(log, true)
        }
    }

    pub fn is_tapped_now(&self) -> bool {
        self.tap.lock().unwrap().is_some()
    }

    /// Deliver one buffer through the installed tap
    pub async fn push_frame(&self) -> bool {
        let tx = self.tap.lock().unwrap().clone();
        match tx {
            Some(tx) => tx
                .send(AudioFrame {
                    samples: vec![0i16; 1024],
                    sample_rate: 44100,
                    channels: 1,
                    timestamp_ms: 0,
                })
                .await
                .is_ok(),
            None => false,
        }
    }
}

#[async_trait::async_trait]
impl CaptureDevice for MockCapture {
    async fn request_permission(&self) -> Result<bool> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.grant)
    }

    async fn install_tap(&self, config: TapConfig) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.fail_install {
            bail!("input device unavailable");
        }
        let mut tap = self.tap.lock().unwrap();
        if tap.is_some() {
            bail!("A tap is already installed");
        }
        record(&self.log, format!("install_tap {}", config.buffer_size));
        let (tx, rx) = mpsc::channel(16);
        *tap = Some(tx);
        Ok(rx)
    }

    async fn remove_tap(&self) -> Result<()> {
        record(&self.log, "remove_tap");
        self.tap.lock().unwrap().take();
        Ok(())
    }

    fn is_tapped(&self) -> bool {
        self.tap.lock().unwrap().is_some()
    }

    fn name(&self) -> &str {
        "mock capture"
    }
}

// ============================================================================
// Recognition
// ============================================================================

#[derive(Default)]
pub struct SessionCounters {
    pub created: AtomicUsize,
    pub open: AtomicUsize,
    pub max_open: AtomicUsize,
}

pub struct MockRecognition {
    log: EventLog,
    fail_create: bool,
    match_on_feed: Option<MatchResult>,
    pub counters: Arc<SessionCounters>,
    sessions: Mutex<Vec<Arc<MockSession>>>,
}

impl MockRecognition {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            fail_create: false,
            match_on_feed: None,
            counters: Arc::new(SessionCounters::default()),
            sessions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(log: EventLog) -> Self {
        Self {
            fail_create: true,
            ..Self::new(log)
        }
    }

    /// Report `result` every time a buffer is fed
    pub fn matching_on_feed(log: EventLog, result: MatchResult) -> Self {
        Self {
            match_on_feed: Some(result),
            ..Self::new(log)
        }
    }

    pub fn latest_session(&self) -> Option<Arc<MockSession>> {
        self.sessions.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl RecognitionService for MockRecognition {
    async fn create_session(
        &self,
        events: mpsc::Sender<MatchResult>,
    ) -> Result<Arc<dyn RecognitionSession>> {
        if self.fail_create {
            bail!("recognizer offline");
        }

        let created = self.counters.created.fetch_add(1, Ordering::SeqCst) + 1;
        let open = self.counters.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_open.fetch_max(open, Ordering::SeqCst);
        record(&self.log, "create_session");

        let session = Arc::new(MockSession {
            id: format!("mock-{}", created),
            log: Arc::clone(&self.log),
            events,
            match_on_feed: self.match_on_feed.clone(),
            counters: Arc::clone(&self.counters),
            fed: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        });
        self.sessions.lock().unwrap().push(Arc::clone(&session));

        Ok(session)
    }

    fn name(&self) -> &str {
        "mock recognizer"
    }
}

pub struct MockSession {
    id: String,
    log: EventLog,
    events: mpsc::Sender<MatchResult>,
    match_on_feed: Option<MatchResult>,
    counters: Arc<SessionCounters>,
    pub fed: AtomicUsize,
    pub closed: AtomicBool,
}

impl MockSession {
    /// Report a result as the recognizer would
    pub async fn emit(&self, result: MatchResult) -> bool {
        self.events.send(result).await.is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RecognitionSession for MockSession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn feed(&self, _frame: AudioFrame) -> Result<()> {
        if self.is_closed() {
            record(&self.log, "feed_after_close");
            bail!("session closed");
        }
        self.fed.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = &self.match_on_feed {
            let _ = self.events.send(result.clone()).await;
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.counters.open.fetch_sub(1, Ordering::SeqCst);
            record(&self.log, "close");
        }
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub const STREAM_URL: &str = "http://radio.test/stream.mp3";

pub fn options() -> ControllerOptions {
    ControllerOptions {
        stream_url: STREAM_URL.to_string(),
        tap: TapConfig {
            buffer_size: 1024,
            sample_rate: 44100,
            channels: 1,
        },
    }
}

pub fn controller(
    playback: MockPlayback,
    capture: Arc<MockCapture>,
    recognition: Arc<MockRecognition>,
) -> RecognitionController {
    RecognitionController::new(options(), Box::new(playback), capture, recognition)
}

/// Poll `condition` until it holds or two seconds pass
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..400 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
