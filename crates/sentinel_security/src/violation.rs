//! # Violations
//!
//! The single output of every detector, and the sinks that receive it.
//!
//! Detectors treat the sink as fire-and-forget. Escalation (alerts, kicks,
//! bans) belongs to whoever owns the sink.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Player identifier assigned by the host.
pub type PlayerId = u32;

/// Check family a violation belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Combat checks (attack geometry).
    Fight,
    /// Aim checks (rotation statistics).
    Aim,
}

impl Category {
    /// Name used by the escalation store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fight => "Fight",
            Self::Aim => "Aim",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded violation.
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    /// Offending player.
    pub player: PlayerId,
    /// Check family.
    pub category: Category,
    /// Name of the check that fired.
    pub check_name: &'static str,
    /// Free-form evidence, e.g. `IQR iqr=24.10 infs=3`.
    pub message: String,
    /// Weight for the escalation policy.
    pub severity: f32,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] player {} ({:.1}): {}",
            self.category, self.check_name, self.player, self.severity, self.message
        )
    }
}

/// Receives violations from any number of per-player call sites.
///
/// Implementations must not block the caller.
pub trait ViolationSink: Send + Sync {
    /// Records one violation.
    fn record(&self, violation: Violation);
}

impl<S: ViolationSink + ?Sized> ViolationSink for Arc<S> {
    fn record(&self, violation: Violation) {
        (**self).record(violation);
    }
}

impl ViolationSink for crossbeam_channel::Sender<Violation> {
    fn record(&self, violation: Violation) {
        if let Err(err) = self.send(violation) {
            tracing::warn!(
                player = err.0.player,
                check = err.0.check_name,
                "violation sink disconnected, dropping violation"
            );
        }
    }
}

/// In-memory sink that keeps every violation until taken.
#[derive(Debug, Default)]
pub struct ViolationLog {
    entries: Mutex<Vec<Violation>>,
}

impl ViolationLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Copies the current contents.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Violation> {
        self.entries.lock().clone()
    }

    /// Takes ownership of the recorded violations, leaving the log empty.
    pub fn take(&self) -> Vec<Violation> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Number of violations whose message starts with `prefix`.
    #[must_use]
    pub fn count_with_prefix(&self, prefix: &str) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|v| v.message.starts_with(prefix))
            .count()
    }
}

impl ViolationSink for ViolationLog {
    fn record(&self, violation: Violation) {
        self.entries.lock().push(violation);
    }
}

/// Logs and forwards a violation.
pub(crate) fn emit(sink: &dyn ViolationSink, violation: Violation) {
    tracing::warn!(
        player = violation.player,
        category = violation.category.as_str(),
        check = violation.check_name,
        severity = f64::from(violation.severity),
        "{}",
        violation.message
    );
    sink.record(violation);
}
