/// Side effects requested by [`crate::update`]; executed by the watcher loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Classify (and possibly scrape) a newly copied job URL into a draft.
    ResolveDraft { url: String },
    /// Leave the polling loop.
    Shutdown,
}
