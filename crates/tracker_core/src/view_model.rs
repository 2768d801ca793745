#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchPhase {
    #[default]
    Idle,
    DraftPending,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchView {
    pub phase: WatchPhase,
    pub pending_url: Option<String>,
    pub drafts_created: u64,
    pub stopping: bool,
}
