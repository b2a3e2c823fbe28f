//! Debounced search input.
//!
//! The debouncer is a clock-driven state machine: callers feed it edits and
//! poll it with the current instant (once per UI frame, for instance). Each
//! dispatched action carries a generation so late responses from an older
//! search can be dropped.

use std::time::{Duration, Instant};

use shared::protocol::SearchRequest;

use crate::filter::FileFilter;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    /// Query is blank: go back to the unfiltered collections.
    Reload,
    Search(SearchRequest),
}

pub fn plan_search(query: &str, filter: &FileFilter) -> SearchAction {
    if query.trim().is_empty() {
        return SearchAction::Reload;
    }
    SearchAction::Search(SearchRequest {
        query: query.to_string(),
        term_id: filter.semester.clone(),
        subject_id: filter.subject.clone(),
        tags: Vec::new(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebouncedSearch {
    pub generation: u64,
    pub action: SearchAction,
}

#[derive(Debug, Clone)]
struct PendingInput {
    query: String,
    filter: FileFilter,
    due: Instant,
}

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<PendingInput>,
    generation: u64,
    showing_results: bool,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            generation: 0,
            showing_results: false,
        }
    }

    /// Restarts the quiet period with the latest query and filter.
    pub fn input_changed(&mut self, query: &str, filter: &FileFilter, now: Instant) {
        self.pending = Some(PendingInput {
            query: query.to_string(),
            filter: filter.clone(),
            due: now + self.delay,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|pending| pending.due.saturating_duration_since(now))
    }

    /// Emits an action once the quiet period has elapsed. A blank query only
    /// reloads when search results are currently displayed.
    pub fn poll(&mut self, now: Instant) -> Option<DebouncedSearch> {
        let due = self.pending.as_ref()?.due;
        if now < due {
            return None;
        }
        let pending = self.pending.take()?;

        let action = plan_search(&pending.query, &pending.filter);
        match action {
            SearchAction::Reload if !self.showing_results => return None,
            SearchAction::Reload => self.showing_results = false,
            SearchAction::Search(_) => self.showing_results = true,
        }

        self.generation += 1;
        tracing::debug!(generation = self.generation, "dispatching debounced search");
        Some(DebouncedSearch {
            generation: self.generation,
            action,
        })
    }

    /// True when `generation` is the most recent dispatch.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn showing_results(&self) -> bool {
        self.showing_results
    }

    /// A full reload outside the debouncer (after a mutation, say) puts the
    /// unfiltered list back and invalidates in-flight searches.
    pub fn note_external_reload(&mut self) {
        self.showing_results = false;
        self.generation += 1;
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_SEARCH_DEBOUNCE_MS))
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
