#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
    Loading,
}

/// A single user-visible status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Sink for user-facing status updates.
///
/// Keeps the application flow independent of where messages end up (a
/// terminal, a log file, a test recorder).
pub trait StatusReporter: Send {
    fn report(&mut self, kind: StatusKind, message: &str);
}

/// Discards every status update.
pub struct NullStatusReporter;

impl StatusReporter for NullStatusReporter {
    fn report(&mut self, _kind: StatusKind, _message: &str) {}
}

/// Forwards status updates to the `log` facade.
///
/// Errors go to `error!`, everything else to `info!`.
pub struct LogStatusReporter;

impl StatusReporter for LogStatusReporter {
    fn report(&mut self, kind: StatusKind, message: &str) {
        match kind {
            StatusKind::Error => log::error!("{message}"),
            StatusKind::Success | StatusKind::Loading => log::info!("{message}"),
        }
    }
}

/// Remembers the most recent status while forwarding to an inner reporter.
pub struct StatusBoard {
    inner: Box<dyn StatusReporter>,
    last: Option<StatusMessage>,
}

impl StatusBoard {
    pub fn new(inner: Box<dyn StatusReporter>) -> Self {
        Self { inner, last: None }
    }

    pub fn last(&self) -> Option<&StatusMessage> {
        self.last.as_ref()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

impl StatusReporter for StatusBoard {
    fn report(&mut self, kind: StatusKind, message: &str) {
        self.inner.report(kind, message);
        self.last = Some(StatusMessage {
            kind,
            text: message.to_string(),
        });
    }
}
