use std::sync::Once;

use chrono::NaiveDate;
use tracker_core::{
    classify, update, DraftRecord, Effect, Msg, WatchPhase, WatchState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tracker_logging::initialize_for_tests);
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn observe(state: WatchState, text: &str) -> (WatchState, Vec<Effect>) {
    update(state, Msg::ClipboardObserved(text.to_string()))
}

fn draft_for(url: &str) -> DraftRecord {
    DraftRecord::new(url, classify(url), today())
}

#[test]
fn new_job_url_requests_draft() {
    init_logging();
    let url = "https://www.linkedin.com/jobs/view/123456";
    let (state, effects) = observe(WatchState::new(), url);

    assert_eq!(
        effects,
        vec![Effect::ResolveDraft {
            url: url.to_string()
        }]
    );
    assert_eq!(state.last_observed(), url);
    assert_eq!(state.view().phase, WatchPhase::Idle);
}

#[test]
fn same_url_twice_produces_one_request() {
    init_logging();
    let url = "https://acme.greenhouse.io/jobs/789";
    let (state, first) = observe(WatchState::new(), url);
    let (_state, second) = observe(state, url);

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}

#[test]
fn non_job_text_is_remembered_but_ignored() {
    init_logging();
    let (state, effects) = observe(WatchState::new(), "just some notes");
    assert!(effects.is_empty());
    assert_eq!(state.last_observed(), "just some notes");

    let (state, effects) = observe(state, "https://example.com/blog/post");
    assert!(effects.is_empty());

    // Copying the job URL after something else still triggers.
    let (_state, effects) = observe(state, "https://jobs.lever.co/acme/abc-123");
    assert_eq!(effects.len(), 1);
}

#[test]
fn recopying_after_other_content_triggers_again() {
    init_logging();
    let url = "https://careers.google.com/jobs/results/42";
    let (state, _) = observe(WatchState::new(), url);
    let (state, _) = observe(state, "something else");
    let (_state, effects) = observe(state, url);
    assert_eq!(effects.len(), 1);
}

#[test]
fn resolved_draft_becomes_pending_and_take_clears_it() {
    init_logging();
    let url = "https://acme.greenhouse.io/jobs/789";
    let (state, _) = observe(WatchState::new(), url);
    let (mut state, effects) = update(state, Msg::DraftResolved(draft_for(url)));
    assert!(effects.is_empty());

    let view = state.view();
    assert_eq!(view.phase, WatchPhase::DraftPending);
    assert_eq!(view.pending_url.as_deref(), Some(url));
    assert_eq!(view.drafts_created, 1);

    let draft = state.take_draft().expect("pending draft");
    assert_eq!(draft.url, url);
    assert_eq!(draft.status, "Applied");
    assert_eq!(draft.date_applied, "2024-03-15");
    assert_eq!(state.view().phase, WatchPhase::Idle);
    assert!(state.take_draft().is_none());
}

#[test]
fn newer_draft_replaces_unclaimed_one() {
    init_logging();
    let first = "https://acme.greenhouse.io/jobs/1";
    let second = "https://jobs.lever.co/globex/xyz";
    let (state, _) = update(WatchState::new(), Msg::DraftResolved(draft_for(first)));
    let (mut state, _) = update(state, Msg::DraftResolved(draft_for(second)));

    assert_eq!(state.view().drafts_created, 2);
    assert_eq!(state.take_draft().map(|d| d.url), Some(second.to_string()));
    assert!(state.take_draft().is_none());
}

#[test]
fn stop_emits_shutdown_once_and_ignores_later_clipboard() {
    init_logging();
    let (state, effects) = update(WatchState::new(), Msg::StopRequested);
    assert_eq!(effects, vec![Effect::Shutdown]);
    assert!(state.view().stopping);

    let (state, effects) = update(state, Msg::StopRequested);
    assert!(effects.is_empty());

    let (_state, effects) = observe(state, "https://jobs.example.com/1");
    assert!(effects.is_empty());
}

#[test]
fn noop_changes_nothing() {
    init_logging();
    let state = WatchState::new();
    let before = state.view();
    let (next, effects) = update(state, Msg::NoOp);
    assert_eq!(next.view(), before);
    assert!(effects.is_empty());
}
