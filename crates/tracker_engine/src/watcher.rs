//! Background clipboard polling that turns copied job URLs into drafts.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracker_core::{classify, update, DraftRecord, Effect, Msg, WatchState, WatchView};
use tracker_logging::{tracker_error, tracker_info, tracker_warn};

use crate::ScrapeOrchestrator;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard holds no text")]
    NoText,
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can report the current clipboard text.
pub trait ClipboardSource {
    fn read_text(&mut self) -> Result<String, ClipboardError>;
}

/// Single-slot hand-off between the watcher thread and the UI poll.
#[derive(Debug, Clone, Default)]
pub struct DraftSlot {
    state: Arc<Mutex<WatchState>>,
}

impl DraftSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pending draft and clears it in one step.
    pub fn take(&self) -> Option<DraftRecord> {
        self.lock().take_draft()
    }

    pub fn view(&self) -> WatchView {
        self.lock().view()
    }

    pub fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        self.step(|state| update(state, msg))
    }

    /// Runs `transition` on a copy; the slot changes only once it returns.
    fn step(&self, transition: impl FnOnce(WatchState) -> (WatchState, Vec<Effect>)) -> Vec<Effect> {
        let mut guard = self.lock();
        let (next, effects) = transition(guard.clone());
        *guard = next;
        effects
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub type Today = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Clone)]
pub struct WatcherConfig {
    pub poll_interval: Duration,
    pub today: Today,
}

impl WatcherConfig {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            today: Arc::new(|| Local::now().date_naive()),
        }
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// Classify `url`, try to enrich it from the page, and stamp it as a draft.
pub async fn resolve_draft(
    orchestrator: &ScrapeOrchestrator,
    url: &str,
    today: NaiveDate,
) -> DraftRecord {
    let info = classify(url);
    let info = orchestrator.enhance(url, info).await;
    DraftRecord::new(url, info, today)
}

pub struct ClipboardWatcher {
    stop: Arc<AtomicBool>,
    slot: DraftSlot,
    handle: Option<JoinHandle<()>>,
}

impl ClipboardWatcher {
    /// Start polling on a dedicated thread.
    ///
    /// The clipboard handle is created by `make_source` on the watcher thread,
    /// since platform clipboards are not always `Send`.
    pub fn spawn<F>(
        config: WatcherConfig,
        orchestrator: Arc<ScrapeOrchestrator>,
        slot: DraftSlot,
        make_source: F,
    ) -> io::Result<Self>
    where
        F: FnOnce() -> Box<dyn ClipboardSource> + Send + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let thread_slot = slot.clone();

        let handle = thread::Builder::new()
            .name("clipboard-watcher".to_string())
            .spawn(move || {
                let mut source = make_source();
                tracker_info!(
                    "Clipboard watcher started (poll every {:?})",
                    config.poll_interval
                );
                while !thread_stop.load(Ordering::SeqCst) {
                    let iteration = panic::catch_unwind(AssertUnwindSafe(|| {
                        poll_once(
                            &runtime,
                            source.as_mut(),
                            &thread_slot,
                            &orchestrator,
                            &config,
                        )
                    }));
                    if iteration.is_err() {
                        tracker_error!("Clipboard watcher iteration panicked; continuing");
                    }
                    if thread_stop.load(Ordering::SeqCst) {
                        break;
                    }
                    thread::park_timeout(config.poll_interval);
                }
                for effect in thread_slot.dispatch(Msg::StopRequested) {
                    if effect == Effect::Shutdown {
                        tracker_info!("Clipboard watcher stopped");
                    }
                }
            })?;

        Ok(Self {
            stop,
            slot,
            handle: Some(handle),
        })
    }

    pub fn slot(&self) -> &DraftSlot {
        &self.slot
    }

    /// Ask the loop to exit after the current iteration.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = &self.handle {
            handle.thread().unpark();
        }
    }

    pub fn stop(mut self) {
        self.request_stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracker_error!("Clipboard watcher thread panicked");
            }
        }
    }
}

impl Drop for ClipboardWatcher {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

fn poll_once(
    runtime: &tokio::runtime::Runtime,
    source: &mut dyn ClipboardSource,
    slot: &DraftSlot,
    orchestrator: &ScrapeOrchestrator,
    config: &WatcherConfig,
) {
    let msg = match source.read_text() {
        Ok(text) => Msg::ClipboardObserved(text),
        Err(ClipboardError::NoText) => Msg::NoOp,
        Err(err) => {
            tracker_warn!("Clipboard read failed: {}", err);
            Msg::NoOp
        }
    };

    for effect in slot.dispatch(msg) {
        match effect {
            Effect::ResolveDraft { url } => {
                tracker_info!("Detected job URL: {}", url);
                let today = (config.today)();
                let draft = runtime.block_on(resolve_draft(orchestrator, &url, today));
                tracker_info!("Draft created for {} ({})", url, draft.platform);
                slot.dispatch(Msg::DraftResolved(draft));
            }
            Effect::Shutdown => {}
        }
    }
}
