//! Non-fatal diagnostics emitted while parsing publication JSON.
//!
//! Publications in the wild frequently carry malformed metadata. Rather than
//! failing a whole manifest for one bad subtitle, the parser drops the
//! offending value and reports it here.

use serde_json::Value;
use std::fmt::{Display, Formatter};

/// How severe a [`Warning`] is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    /// Something looks off but has no impact on the parsed model.
    Minor,
    /// A value was dropped or rewritten while recovering from malformed data.
    Moderate,
}

/// A single non-fatal issue encountered while parsing.
#[derive(Clone, Debug)]
pub struct Warning {
    /// Name of the model type that reported the issue (e.g., `Contributor`).
    pub model: &'static str,
    /// Human-readable description of the issue.
    pub message: String,
    /// The offending JSON fragment, when one was in hand.
    pub source: Option<Value>,
    /// Severity of the issue.
    pub severity: Severity,
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.model, self.message)
    }
}

/// Sink for non-fatal parse issues.
///
/// Parsing entry points accept any implementation; pass a
/// [`NoopWarningLogger`] to ignore warnings entirely or a
/// [`WarningCollector`] to inspect them afterwards.
pub trait WarningLogger {
    /// Records a single [`Warning`].
    fn log(&mut self, warning: Warning);
}

/// Discards every warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopWarningLogger;

impl WarningLogger for NoopWarningLogger {
    fn log(&mut self, _warning: Warning) {}
}

/// Accumulates warnings for later inspection.
#[derive(Debug, Default)]
pub struct WarningCollector {
    warnings: Vec<Warning>,
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// All warnings recorded so far, in emission order.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

impl WarningLogger for WarningCollector {
    fn log(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}

/// Forwards warnings to the [`log`] facade.
///
/// [`Severity::Moderate`] maps to `warn`, [`Severity::Minor`] to `debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogWarningLogger;

impl WarningLogger for LogWarningLogger {
    fn log(&mut self, warning: Warning) {
        match warning.severity {
            Severity::Minor => log::debug!("{warning}"),
            Severity::Moderate => log::warn!("{warning}"),
        }
    }
}

/// Shorthand used by the parsing layer.
pub(crate) fn warn(
    logger: &mut dyn WarningLogger,
    model: &'static str,
    severity: Severity,
    message: impl Into<String>,
    source: Option<&Value>,
) {
    logger.log(Warning {
        model,
        message: message.into(),
        source: source.cloned(),
        severity,
    });
}
