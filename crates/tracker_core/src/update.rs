use crate::{looks_like_job_url, Effect, Msg, WatchState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: WatchState, msg: Msg) -> (WatchState, Vec<Effect>) {
    let effects = match msg {
        Msg::ClipboardObserved(text) => {
            if state.is_stopping() {
                return (state, Vec::new());
            }
            let url = text.trim().to_string();
            let changed = state.observe(text);
            if changed && looks_like_job_url(&url) {
                vec![Effect::ResolveDraft { url }]
            } else {
                Vec::new()
            }
        }
        Msg::DraftResolved(draft) => {
            // Last write wins: a newer draft replaces an unclaimed one.
            state.set_pending(draft);
            Vec::new()
        }
        Msg::StopRequested => {
            if state.begin_stop() {
                vec![Effect::Shutdown]
            } else {
                Vec::new()
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
