//! `tracing` setup: a daily rolling log file plus an in-memory tail of
//! recent records for modules that own the terminal.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use tracing::field::{Field, Visit};
use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Overrides [`log_dir`].
pub const LOG_DIR_ENV_VAR: &str = "MOTOR_LOG_DIR";

const LOG_FILE_PREFIX: &str = "motor.log";
const MAX_BUFFERED_LINES: usize = 256;
const LOG_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        })
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        }
    }
}

/// One captured record: its level and the message followed by its fields.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// The most recent records, oldest first.
///
/// Logs cannot go to stdout while the render module owns the terminal, so it
/// reads them from here.
pub type LogBuffer = Arc<Mutex<VecDeque<LogEntry>>>;

pub fn new_log_buffer(capacity: usize) -> LogBuffer {
    Arc::new(Mutex::new(VecDeque::with_capacity(capacity)))
}

/// `$MOTOR_LOG_DIR`, else `motor/logs` under the platform's local data dir,
/// else `./logs`.
pub fn log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV_VAR) {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .map(|data| data.join("motor").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Delete rolled `motor.log*` files last modified more than `max_age` ago.
fn prune_logs(dir: &Path, max_age: Duration) -> usize {
    let Some(cutoff) = SystemTime::now().checked_sub(max_age) else {
        return 0;
    };
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };

    entries
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX))
        .filter(|entry| {
            entry
                .metadata()
                .and_then(|meta| meta.modified())
                .is_ok_and(|modified| modified <= cutoff)
        })
        .filter(|entry| std::fs::remove_file(entry.path()).is_ok())
        .count()
}

/// Appends every event to a [`LogBuffer`] holding at most `capacity` records.
struct TailLayer {
    buffer: LogBuffer,
    capacity: usize,
}

impl<S: tracing::Subscriber> Layer<S> for TailLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut line = LineVisitor::default();
        event.record(&mut line);
        let entry = LogEntry {
            level: (*event.metadata().level()).into(),
            message: line.finish(),
        };

        if let Ok(mut buffer) = self.buffer.lock() {
            push_bounded(&mut buffer, entry, self.capacity);
        }
    }
}

fn push_bounded(buffer: &mut VecDeque<LogEntry>, entry: LogEntry, capacity: usize) {
    let excess = (buffer.len() + 1).saturating_sub(capacity.max(1));
    buffer.drain(..excess);
    buffer.push_back(entry);
}

/// Renders an event as `message key=value key=value`.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if field.name() == "message" {
            let _ = self.message.write_fmt(value);
            return;
        }
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", field.name(), value);
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.field(field, format_args!("{value}"));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.field(field, format_args!("{value:?}"));
    }
}

/// `MOTOR_LOG`, then `RUST_LOG`, then `info`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("MOTOR_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber and return the buffer it fills.
///
/// Records go to a daily rolling `motor.log` in [`log_dir`] and to the
/// returned buffer. Files older than a week are pruned at startup.
pub fn init() -> LogBuffer {
    let dir = log_dir();
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("warning: cannot create log directory {}: {err}", dir.display());
    }
    let pruned = prune_logs(&dir, LOG_RETENTION);

    let buffer = new_log_buffer(MAX_BUFFERED_LINES);
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(rolling::daily(&dir, LOG_FILE_PREFIX))
                .with_ansi(false),
        )
        .with(TailLayer {
            buffer: buffer.clone(),
            capacity: MAX_BUFFERED_LINES,
        })
        .init();

    tracing::debug!(dir = %dir.display(), pruned, "logging initialised");
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    // Serialize env-mutating tests to avoid data races.
    static ENV_LOCK: StdMutex<()> = StdMutex::new(());

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    fn capture(capacity: usize, emit: impl FnOnce()) -> Vec<LogEntry> {
        let buffer = new_log_buffer(capacity);
        let subscriber = tracing_subscriber::registry().with(TailLayer {
            buffer: buffer.clone(),
            capacity,
        });
        tracing::subscriber::with_default(subscriber, emit);
        let captured = buffer.lock().unwrap().iter().cloned().collect();
        captured
    }

    #[test]
    fn log_dir_respects_env_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        let original = std::env::var_os(LOG_DIR_ENV_VAR);

        unsafe { std::env::set_var(LOG_DIR_ENV_VAR, "/tmp/motor-test-logs") };
        assert_eq!(log_dir(), PathBuf::from("/tmp/motor-test-logs"));

        match original {
            Some(v) => unsafe { std::env::set_var(LOG_DIR_ENV_VAR, v) },
            None => unsafe { std::env::remove_var(LOG_DIR_ENV_VAR) },
        }
    }

    #[test]
    fn push_bounded_evicts_oldest() {
        let mut buffer = VecDeque::new();
        for i in 0..5 {
            push_bounded(&mut buffer, entry(&format!("msg {i}")), 3);
        }
        let messages: Vec<_> = buffer.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["msg 2", "msg 3", "msg 4"]);

        push_bounded(&mut buffer, entry("only"), 0);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn level_from_tracing() {
        assert_eq!(LogLevel::from(tracing::Level::WARN), LogLevel::Warn);
        assert_eq!(LogLevel::from(tracing::Level::TRACE).to_string(), "TRACE");
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
    }

    #[test]
    fn tail_layer_renders_message_then_fields() {
        let captured = capture(8, || {
            tracing::warn!(module = "render", phase = "awake", "terminal too small");
            tracing::info!(frames = 3_u64);
        });
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].level, LogLevel::Warn);
        assert_eq!(
            captured[0].message,
            "terminal too small module=render phase=awake"
        );
        assert_eq!(captured[1].message, "frames=3");
    }

    #[test]
    fn tail_layer_is_bounded() {
        let captured = capture(2, || {
            for i in 0..4 {
                tracing::info!("line {i}");
            }
        });
        let messages: Vec<_> = captured.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["line 2", "line 3"]);
    }

    #[test]
    fn prune_removes_only_stale_motor_logs() {
        let tmp = std::env::temp_dir().join("motor-test-prune");
        let _ = std::fs::create_dir_all(&tmp);

        let stale = tmp.join("motor.log.2025-01-01");
        let other = tmp.join("other.txt");
        std::fs::write(&stale, "a").unwrap();
        std::fs::write(&other, "b").unwrap();

        assert_eq!(prune_logs(&tmp, LOG_RETENTION), 0);
        assert!(stale.exists());

        // A zero age puts the cutoff at "now", so every motor log is stale.
        assert_eq!(prune_logs(&tmp, Duration::ZERO), 1);
        assert!(!stale.exists());
        assert!(other.exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn prune_missing_dir_is_noop() {
        let missing = std::env::temp_dir().join("motor-test-prune-missing");
        assert_eq!(prune_logs(&missing, Duration::ZERO), 0);
    }
}
