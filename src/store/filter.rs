use std::time::{Duration, Instant};

use crate::models::Priority;

/// Quiet period before a search edit reaches the filtered read, matching the
/// keystroke debounce of the board UI.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Transient read-side filter state. Never persisted and never part of the
/// authoritative board.
#[derive(Debug, Clone)]
pub struct Filters {
    raw_term: String,
    settled_term: String,
    last_edit: Option<Instant>,
    debounce: Duration,
    priority: Option<Priority>,
}

impl Filters {
    pub fn new(debounce: Duration) -> Self {
        Self {
            raw_term: String::new(),
            settled_term: String::new(),
            last_edit: None,
            debounce,
            priority: None,
        }
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        if self.term_has_settled() {
            self.settled_term = self.raw_term.clone();
        }
        self.raw_term = term.into();
        self.last_edit = Some(Instant::now());
    }

    /// The term as last typed, before debouncing.
    pub fn term(&self) -> &str {
        &self.raw_term
    }

    /// The term the filtered read sees: the latest edit once the quiet
    /// period has elapsed, otherwise the previously settled value.
    pub fn settled_term(&self) -> &str {
        if self.term_has_settled() {
            &self.raw_term
        } else {
            &self.settled_term
        }
    }

    fn term_has_settled(&self) -> bool {
        match self.last_edit {
            Some(at) => at.elapsed() >= self.debounce,
            None => true,
        }
    }

    /// Priority selection applies immediately; only free-text search is
    /// debounced.
    pub fn set_priority(&mut self, priority: Option<Priority>) {
        self.priority = priority;
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn zero_debounce_settles_immediately() {
        let mut filters = Filters::new(Duration::ZERO);
        filters.set_term("kan");
        assert_eq!(filters.term(), "kan");
        assert_eq!(filters.settled_term(), "kan");
    }

    #[test]
    fn term_lags_until_the_quiet_period_elapses() {
        let mut filters = Filters::new(Duration::from_millis(200));
        filters.set_term("first");
        thread::sleep(Duration::from_millis(250));
        assert_eq!(filters.settled_term(), "first");

        filters.set_term("second");
        assert_eq!(filters.term(), "second");
        assert_eq!(filters.settled_term(), "first");

        thread::sleep(Duration::from_millis(250));
        assert_eq!(filters.settled_term(), "second");
    }

    #[test]
    fn rapid_edits_keep_the_old_settled_value() {
        let mut filters = Filters::new(Duration::from_millis(200));
        filters.set_term("a");
        filters.set_term("ab");
        filters.set_term("abc");
        assert_eq!(filters.settled_term(), "");
        thread::sleep(Duration::from_millis(250));
        assert_eq!(filters.settled_term(), "abc");
    }

    #[test]
    fn priority_is_not_debounced() {
        let mut filters = Filters::new(Duration::from_millis(500));
        filters.set_priority(Some(Priority::High));
        assert_eq!(filters.priority(), Some(Priority::High));
        filters.set_priority(None);
        assert_eq!(filters.priority(), None);
    }
}
