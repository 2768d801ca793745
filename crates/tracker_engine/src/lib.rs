//! Tracker engine: polite page scraping and the clipboard watcher.
mod decode;
mod extract;
mod fetch;
mod orchestrator;
mod robots;
mod settings;
mod throttle;
mod types;
mod watcher;

pub use decode::{decode_body, decode_page, DecodeError, DecodedText};
pub use extract::{clean_role, css_strategy, first_match, FieldScraper, SelectorError, Strategy};
pub use fetch::{Fetcher, ReqwestFetcher};
pub use orchestrator::{GateDecision, ScrapeGate, ScrapeOrchestrator, ScrapeOutcome};
pub use robots::{RobotsCache, RobotsPolicy, RobotsRules};
pub use settings::{FetchSettings, ScrapeSettings, SelectorSettings, DEFAULT_USER_AGENT};
pub use throttle::RateLimiter;
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, ResourceKind};
pub use watcher::{
    resolve_draft, ClipboardError, ClipboardSource, ClipboardWatcher, DraftSlot, Today,
    WatcherConfig,
};
