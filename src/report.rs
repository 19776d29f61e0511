//! Report generation: category breakdown, unaccounted residue, counters

use std::time::Duration;

use tracing::info;

use crate::category::Category;
use crate::duration::format_duration;
use crate::sample_set::SampleSet;

/// 50-dash banner framing every report
pub const BANNER: &str = "--------------------------------------------------";

/// Derived totals for one sample set, computed on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfilerResult {
    /// Sum of all category samples
    pub accounted: Duration,
    /// Wall-clock time since the set's segment epoch
    pub total: Duration,
    /// Time not attributed to any category
    pub unaccounted: Duration,
}

impl ProfilerResult {
    /// Unaccounted share of the total, in whole percent (integer division)
    pub fn unaccounted_percent(&self) -> u64 {
        let total = self.total.as_nanos();
        if total == 0 {
            return 0;
        }
        (self.unaccounted.as_nanos() * 100 / total) as u64
    }
}

/// Derive a result from a sample set, measuring total time up to now
pub fn generate_result(set: &SampleSet) -> ProfilerResult {
    let accounted = Category::ALL
        .iter()
        .map(|category| set.sample(*category).elapsed())
        .sum();
    let total = set.epoch().elapsed();
    ProfilerResult {
        accounted,
        total,
        // jitter can make the sum overshoot by nanoseconds; clamp to zero
        unaccounted: total.saturating_sub(accounted),
    }
}

/// Render the report for one sample set as individual lines
///
/// The layout, with `N` a 50-dash banner:
///
/// ```text
/// N
/// ◂[<subject>]                (only if the subject is non-empty)
/// [<CAT >] <duration>         (one per category, declaration order)
/// [   ?] <duration> (<pct>%)
/// [ All] <duration>
/// [<counter>] <integer>       (one per counter, insertion order)
/// N
/// ```
pub fn render(subject: &str, set: &SampleSet) -> Vec<String> {
    let result = generate_result(set);
    let mut lines = Vec::with_capacity(Category::COUNT + 5);
    lines.push(BANNER.to_string());
    if !subject.is_empty() {
        lines.push(format!("\u{25c2}[{subject}]"));
    }
    for category in Category::ALL {
        let sample = set.sample(category);
        lines.push(format!(
            "[{:>4}] {}",
            category.label(),
            format_duration(sample.elapsed())
        ));
    }
    lines.push(format!(
        "[{:>4}] {} ({}%)",
        "?",
        format_duration(result.unaccounted),
        result.unaccounted_percent()
    ));
    lines.push(format!("[{:>4}] {}", "All", format_duration(result.total)));
    for (name, value) in set.counters() {
        lines.push(format!("[{name:>4}] {value}"));
    }
    lines.push(BANNER.to_string());
    lines
}

/// Render and emit a report at INFO severity, one log line per report line
pub fn emit(subject: &str, set: &SampleSet) {
    for line in render(subject, set) {
        info!("{line}");
    }
}
