use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// A human-readable message paired with the call site that produced it.
///
/// Every engine error carries one of these instead of a bare `String` so
/// that the location an error was raised from survives into logs and HTTP
/// error bodies without needing `RUST_BACKTRACE`.
#[derive(Clone, Debug)]
pub struct DiagnosticMessage {
    message: Cow<'static, str>,
    location: &'static Location<'static>,
}

impl DiagnosticMessage {
    #[track_caller]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            location: Location::caller(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (at {}:{})",
            self.message,
            self.location.file(),
            self.location.line()
        )
    }
}

/// Builds a [`DiagnosticMessage`] from a format string, analogous to `format!`.
#[macro_export]
macro_rules! diag {
    ($($arg:tt)*) => {
        $crate::error::diagnostics::DiagnosticMessage::new(format!($($arg)*))
    };
}
