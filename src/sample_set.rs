//! The live bag of measurements one scope level accumulates into

use std::time::Instant;

use crate::category::Category;
use crate::sample::Sample;

/// One set of profile measurements
///
/// Holds exactly one [`Sample`] per [`Category`] at all times (the array is
/// seeded zeroed, never partially populated), a table of named counters, an
/// optional subject label, the currently active category and the segment
/// epoch that the total elapsed time is measured from.
///
/// Cloning is a deep copy: the pushed snapshot taken when a nested scope
/// opens must be immune to the in-place reset of the live set.
#[derive(Debug, Clone)]
pub struct SampleSet {
    samples: [Sample; Category::COUNT],
    /// Insertion-ordered; the report iterates counters in the order they
    /// first appeared.
    counters: Vec<(String, i64)>,
    subject: Option<String>,
    active: Category,
    epoch: Instant,
}

impl SampleSet {
    /// A fresh set: all samples zero, no counters, no subject, epoch = now
    pub fn new() -> Self {
        SampleSet {
            samples: [Sample::default(); Category::COUNT],
            counters: Vec::new(),
            subject: None,
            active: Category::default(),
            epoch: Instant::now(),
        }
    }

    /// Sample bound to the given category
    pub fn sample(&self, category: Category) -> &Sample {
        &self.samples[category.index()]
    }

    /// Sample bound to the active category
    pub fn active_sample(&self) -> &Sample {
        self.sample(self.active)
    }

    pub(crate) fn active_sample_mut(&mut self) -> &mut Sample {
        &mut self.samples[self.active.index()]
    }

    /// Credit elapsed time to a category directly
    pub fn add_time(&mut self, category: Category, delta: std::time::Duration) {
        self.samples[category.index()].add_time(delta);
    }

    /// Currently active category
    pub fn active(&self) -> Category {
        self.active
    }

    pub(crate) fn set_active(&mut self, category: Category) {
        self.active = category;
    }

    /// Subject label, if this set belongs to a labeled scope
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub(crate) fn set_subject(&mut self, subject: Option<String>) {
        self.subject = subject;
    }

    /// Instant the total elapsed time is measured from
    pub fn epoch(&self) -> Instant {
        self.epoch
    }

    /// Counter value by name; absent counters read as zero
    pub fn counter(&self, name: &str) -> i64 {
        self.counters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }

    /// Counters in insertion order
    pub fn counters(&self) -> impl Iterator<Item = (&str, i64)> {
        self.counters.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Add `delta` to a named counter, creating it at zero if absent
    pub fn increment_counter(&mut self, name: &str, delta: i64) {
        match self.counters.iter_mut().find(|(n, _)| n == name) {
            Some((_, value)) => *value += delta,
            None => self.counters.push((name.to_string(), delta)),
        }
    }

    /// Additively fold another set into this one
    ///
    /// Every category's sample and every counter is summed; counters absent
    /// here are created. Subject, epoch and active category are untouched.
    pub fn merge(&mut self, other: &SampleSet) {
        for category in Category::ALL {
            self.samples[category.index()].add(other.sample(category));
        }
        for (name, value) in other.counters() {
            self.increment_counter(name, value);
        }
    }

    /// Zero every sample, clear counters and subject, restart the epoch
    ///
    /// The active category is left for the caller to overwrite.
    pub fn reset(&mut self) {
        for sample in &mut self.samples {
            sample.reset();
        }
        self.counters.clear();
        self.subject = None;
        self.epoch = Instant::now();
    }
}

impl Default for SampleSet {
    fn default() -> Self {
        Self::new()
    }
}
