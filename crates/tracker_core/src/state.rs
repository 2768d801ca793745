use crate::view_model::{WatchPhase, WatchView};
use crate::DraftRecord;

/// State shared between the clipboard loop and the draft poll endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchState {
    last_observed: String,
    pending: Option<DraftRecord>,
    drafts_created: u64,
    stopping: bool,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> WatchView {
        WatchView {
            phase: self.phase(),
            pending_url: self.pending.as_ref().map(|draft| draft.url.clone()),
            drafts_created: self.drafts_created,
            stopping: self.stopping,
        }
    }

    pub fn phase(&self) -> WatchPhase {
        if self.pending.is_some() {
            WatchPhase::DraftPending
        } else {
            WatchPhase::Idle
        }
    }

    pub fn last_observed(&self) -> &str {
        &self.last_observed
    }

    pub fn is_stopping(&self) -> bool {
        self.stopping
    }

    /// Read and clear the pending draft (DraftPending -> Idle).
    pub fn take_draft(&mut self) -> Option<DraftRecord> {
        self.pending.take()
    }

    pub(crate) fn observe(&mut self, text: String) -> bool {
        let changed = self.last_observed != text;
        self.last_observed = text;
        changed
    }

    pub(crate) fn set_pending(&mut self, draft: DraftRecord) {
        self.pending = Some(draft);
        self.drafts_created += 1;
    }

    pub(crate) fn begin_stop(&mut self) -> bool {
        let first = !self.stopping;
        self.stopping = true;
        first
    }
}
