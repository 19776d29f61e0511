//! The nested-scope state machine
//!
//! A [`ProfilingSession`] owns one live [`SampleSet`], a LIFO stack of saved
//! sets and the "measurement running" sentinel. Opening a [`Scope`] pauses
//! the enclosing measurement (crediting the time it accrued so far), saves a
//! deep snapshot of the live set and resets it in place; dropping the scope
//! finalizes the fresh set, merges it back into the snapshot popped off the
//! stack and resumes timing for the parent. Time spent inside a child scope
//! is therefore never double-counted against its parent's category.
//!
//! Sessions own their state outright. Independent measured runs use
//! independent sessions, so one run's totals can never leak into another.
//! The session is single-threaded by contract; `RefCell` makes it `!Sync`,
//! so concurrent use from several threads is a compile error rather than
//! silent corruption. Scopes must close in the reverse order of opening,
//! which ordinary Rust scoping produces on every exit path, panics included.

use std::cell::RefCell;
use std::time::Instant;

use tracing::{info, trace};

use crate::category::Category;
use crate::report;
use crate::report::{generate_result, ProfilerResult};
use crate::sample_set::SampleSet;

struct SessionState {
    current: SampleSet,
    stack: Vec<SampleSet>,
    /// `None` while no measurement is running
    segment_start: Option<Instant>,
    /// Snapshot of the live set taken at every finalize; drives
    /// subject-scoped reporting and [`ProfilingSession::report`]
    last_finalized: Option<SampleSet>,
    trace_enabled: bool,
}

impl SessionState {
    /// Credit the time accrued since `segment_start` to the active category
    /// and snapshot the live set
    fn finalize(&mut self, now: Instant) {
        if let Some(start) = self.segment_start {
            let delta = now.duration_since(start);
            self.current.active_sample_mut().add_time(delta);
            if self.trace_enabled {
                trace!("{} {}ms", self.current.active(), delta.as_millis());
            }
            self.last_finalized = Some(self.current.clone());
        }
    }
}

/// One profiling run: the live sample set, the scope stack and the clock
///
/// Create the session right before opening the root scope; the total elapsed
/// time of the outermost report is measured from session construction.
pub struct ProfilingSession {
    state: RefCell<SessionState>,
}

impl ProfilingSession {
    pub fn new() -> Self {
        ProfilingSession {
            state: RefCell::new(SessionState {
                current: SampleSet::new(),
                stack: Vec::new(),
                segment_start: None,
                last_finalized: None,
                trace_enabled: false,
            }),
        }
    }

    /// Open an unlabeled scope in the default category
    ///
    /// Wrap all your code with such a scope to catch in `OTHER` whatever the
    /// more specific scopes are missing.
    pub fn scope(&self) -> Scope<'_> {
        self.open(None, Category::Other)
    }

    /// Open an unlabeled scope in the given category
    pub fn scope_in(&self, category: Category) -> Scope<'_> {
        self.open(None, category)
    }

    /// Open a labeled scope in the default category
    ///
    /// A labeled scope emits a report of its own local totals when it closes.
    pub fn scope_named(&self, label: &str) -> Scope<'_> {
        self.open(Some(label), Category::Other)
    }

    /// Open a labeled scope in the given category
    pub fn scope_named_in(&self, label: &str, category: Category) -> Scope<'_> {
        self.open(Some(label), category)
    }

    /// Run a closure inside a scope of the given category
    pub fn measure<F, R>(&self, category: Category, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _scope = self.scope_in(category);
        f()
    }

    /// Add `delta` to a named counter on the live set
    ///
    /// Counters accumulate at the nesting depth that is currently live and
    /// are carried up by the same merge-on-close protocol as samples.
    pub fn increment_counter(&self, name: &str, delta: i64) {
        self.state.borrow_mut().current.increment_counter(name, delta);
    }

    /// Toggle TRACE diagnostics of every open/pause/resume/close transition
    ///
    /// Does not affect accounting.
    pub fn set_trace_enabled(&self, enabled: bool) {
        self.state.borrow_mut().trace_enabled = enabled;
    }

    pub fn trace_enabled(&self) -> bool {
        self.state.borrow().trace_enabled
    }

    /// Whether a measurement is currently running
    pub fn is_measuring(&self) -> bool {
        self.state.borrow().segment_start.is_some()
    }

    /// Deep copy of the live sample set
    pub fn snapshot(&self) -> SampleSet {
        self.state.borrow().current.clone()
    }

    /// The most recently finalized sample set, if any scope has finished a
    /// measurement segment yet
    pub fn last_finalized(&self) -> Option<SampleSet> {
        self.state.borrow().last_finalized.clone()
    }

    /// Result derived from the live set, measuring total time up to now
    pub fn result(&self) -> ProfilerResult {
        generate_result(&self.state.borrow().current)
    }

    /// Force an immediate report of the most recently finalized set
    pub fn report(&self, label: &str) {
        let snapshot = self.state.borrow().last_finalized.clone();
        if let Some(set) = snapshot {
            report::emit(label, &set);
        }
    }

    fn open(&self, label: Option<&str>, category: Category) -> Scope<'_> {
        {
            let mut state = self.state.borrow_mut();
            let now = Instant::now();
            if state.segment_start.is_none() {
                // root scope: nothing to pause, the stack stays untouched
                if state.trace_enabled {
                    trace!("start({category})");
                }
            } else {
                if state.trace_enabled {
                    trace!("pause({}) start({category})", state.current.active());
                }
                state.finalize(now);
                let snapshot = state.current.clone();
                state.stack.push(snapshot);
                state.current.reset();
            }
            state.current.set_subject(label.map(str::to_string));
            state.current.set_active(category);
            state.current.active_sample_mut().record_occurrence();
            state.segment_start = Some(Instant::now());
        }
        if let Some(label) = label {
            info!("{}", report::BANNER);
            info!("\u{25b8}[{label}]");
            info!("{}", report::BANNER);
        }
        Scope { session: self }
    }

    fn close(&self) {
        let subject = {
            let mut state = self.state.borrow_mut();
            let now = Instant::now();
            state.finalize(now);
            match state.stack.pop() {
                None => {
                    // root scope: the live set now holds the final cumulative
                    // totals for the whole run
                    if state.trace_enabled {
                        trace!("close({})", state.current.active());
                    }
                    state.segment_start = None;
                }
                Some(mut parent) => {
                    if state.trace_enabled {
                        trace!(
                            "close({}) resume({})",
                            state.current.active(),
                            parent.active()
                        );
                    }
                    parent.merge(&state.current);
                    state.current = parent;
                    state.segment_start = Some(Instant::now());
                }
            }
            state
                .last_finalized
                .as_ref()
                .and_then(|set| set.subject().map(str::to_string))
        };
        if let Some(subject) = subject {
            self.report(&subject);
        }
    }
}

impl Default for ProfilingSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle bounding one measured region of code
///
/// Closing happens in `Drop`, so the measurement finishes exactly once on
/// every exit path, including panics.
#[must_use = "a scope only measures until it is dropped"]
pub struct Scope<'a> {
    session: &'a ProfilingSession,
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.session.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn spin(duration: Duration) {
        let start = Instant::now();
        while start.elapsed() < duration {
            std::hint::spin_loop();
        }
    }

    #[test]
    fn test_fresh_session_is_idle() {
        let session = ProfilingSession::new();
        assert!(!session.is_measuring());
        assert!(session.last_finalized().is_none());
    }

    #[test]
    fn test_root_scope_credits_its_category() {
        let session = ProfilingSession::new();
        {
            let _scope = session.scope_in(Category::Cpu);
            spin(Duration::from_millis(10));
        }
        let set = session.snapshot();
        assert!(set.sample(Category::Cpu).elapsed() >= Duration::from_millis(10));
        assert_eq!(set.sample(Category::Tcp).elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_sentinel_clears_after_root_close() {
        let session = ProfilingSession::new();
        {
            let _scope = session.scope();
            assert!(session.is_measuring());
        }
        assert!(!session.is_measuring());
    }

    #[test]
    fn test_nested_scope_time_not_credited_to_parent() {
        let session = ProfilingSession::new();
        {
            let _outer = session.scope_in(Category::Cpu);
            {
                let _inner = session.scope_in(Category::Sql);
                spin(Duration::from_millis(20));
            }
        }
        let set = session.snapshot();
        assert!(set.sample(Category::Sql).elapsed() >= Duration::from_millis(20));
        // the parent only accrues its own self-time, which is tiny here
        assert!(set.sample(Category::Cpu).elapsed() < Duration::from_millis(10));
    }

    #[test]
    fn test_sibling_scopes_accumulate() {
        let session = ProfilingSession::new();
        {
            let _root = session.scope_in(Category::Cpu);
            for _ in 0..3 {
                let _sibling = session.scope_in(Category::File);
                spin(Duration::from_millis(5));
            }
        }
        let set = session.snapshot();
        assert!(set.sample(Category::File).elapsed() >= Duration::from_millis(15));
        assert_eq!(set.sample(Category::File).occurrences(), 3);
    }

    #[test]
    fn test_counters_merge_to_the_root() {
        let session = ProfilingSession::new();
        {
            let _root = session.scope_in(Category::Cpu);
            session.increment_counter("outer", 1);
            {
                let _nested = session.scope_in(Category::Sql);
                session.increment_counter("inner", 42);
                session.increment_counter("outer", 1);
            }
        }
        let set = session.snapshot();
        assert_eq!(set.counter("outer"), 2);
        assert_eq!(set.counter("inner"), 42);
    }

    #[test]
    fn test_measure_returns_the_closure_value() {
        let session = ProfilingSession::new();
        let value = session.measure(Category::Cpu, || 6 * 7);
        assert_eq!(value, 42);
        assert_eq!(session.snapshot().sample(Category::Cpu).occurrences(), 1);
    }

    #[test]
    fn test_scope_closes_on_panic() {
        let session = ProfilingSession::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = session.scope_in(Category::Cpu);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(!session.is_measuring());
        assert_eq!(session.snapshot().sample(Category::Cpu).occurrences(), 1);
    }

    #[test]
    fn test_last_finalized_holds_local_totals_of_closed_child() {
        let session = ProfilingSession::new();
        {
            let _root = session.scope_in(Category::Cpu);
            {
                let _child = session.scope_named_in("child", Category::Sql);
                spin(Duration::from_millis(10));
            }
            let finalized = session.last_finalized().expect("child was finalized");
            assert_eq!(finalized.subject(), Some("child"));
            assert!(finalized.sample(Category::Sql).elapsed() >= Duration::from_millis(10));
            assert_eq!(finalized.sample(Category::Cpu).elapsed(), Duration::ZERO);
        }
    }

    #[test]
    fn test_result_accounts_for_all_categories() {
        let session = ProfilingSession::new();
        {
            let _root = session.scope_in(Category::Cpu);
            spin(Duration::from_millis(5));
            {
                let _child = session.scope_in(Category::Tcp);
                spin(Duration::from_millis(5));
            }
        }
        let result = session.result();
        assert!(result.accounted >= Duration::from_millis(10));
        assert_eq!(result.total, result.accounted + result.unaccounted);
    }

    #[test]
    fn test_trace_flag_round_trips() {
        let session = ProfilingSession::new();
        assert!(!session.trace_enabled());
        session.set_trace_enabled(true);
        assert!(session.trace_enabled());
    }
}
