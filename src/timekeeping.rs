//! Plain elapsed-time keeping, independent of the category machinery
//!
//! For call sites that only want "how long did this take" in the log, with
//! none of the category attribution a [`ProfilingSession`](crate::session::ProfilingSession)
//! provides.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace, warn, Level};

use crate::duration::format_duration;

/// Measures from construction to drop and logs the elapsed time
///
/// On drop, logs `"<subject> in <duration>."` at the configured severity;
/// without a severity nothing is logged and the timer is only useful through
/// [`TimeKeeping::elapsed`].
#[derive(Debug)]
pub struct TimeKeeping {
    subject: String,
    level: Option<Level>,
    started: Instant,
}

impl TimeKeeping {
    /// Timer that logs nothing on drop
    pub fn new(subject: &str) -> Self {
        TimeKeeping {
            subject: subject.to_string(),
            level: None,
            started: Instant::now(),
        }
    }

    /// Timer that logs at the given severity on drop
    pub fn with_level(subject: &str, level: Level) -> Self {
        TimeKeeping {
            subject: subject.to_string(),
            level: Some(level),
            started: Instant::now(),
        }
    }

    /// Time elapsed since construction
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Replace the subject logged on drop
    pub fn set_subject(&mut self, subject: &str) {
        self.subject = subject.to_string();
    }
}

impl Drop for TimeKeeping {
    fn drop(&mut self) {
        let Some(level) = self.level else { return };
        let message = format!("{} in {}.", self.subject, format_duration(self.elapsed()));
        if level == Level::ERROR {
            error!("{message}");
        } else if level == Level::WARN {
            warn!("{message}");
        } else if level == Level::INFO {
            info!("{message}");
        } else if level == Level::DEBUG {
            debug!("{message}");
        } else {
            trace!("{message}");
        }
    }
}
