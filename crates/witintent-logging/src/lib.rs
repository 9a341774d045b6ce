//! Logging configuration and a small stderr logger for witintent.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Log level for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Warn
    }
}

impl LogLevel {
    /// Whether a logger at this level emits messages at `level`.
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= *self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Plain,
    Json,
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Plain
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(LogFormat::Plain),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level to output
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
    /// Enable timestamps
    #[serde(default = "default_true")]
    pub timestamps: bool,
    /// Component-specific log levels
    #[serde(default)]
    pub component_levels: HashMap<String, LogLevel>,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::Plain,
            timestamps: true,
            component_levels: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn with_component_level(mut self, component: impl Into<String>, level: LogLevel) -> Self {
        self.component_levels.insert(component.into(), level);
        self
    }

    /// Effective level for a component, falling back to the global level.
    pub fn effective_level(&self, component: Option<&str>) -> LogLevel {
        component
            .and_then(|c| self.component_levels.get(c).copied())
            .unwrap_or(self.level)
    }

    pub fn should_log(&self, level: LogLevel, component: Option<&str>) -> bool {
        self.effective_level(component).should_log(level)
    }
}

/// A log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level,
            component: None,
            message: message.into(),
        }
    }

    pub fn with_component(
        level: LogLevel,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            component: Some(component.into()),
            ..Self::new(level, message)
        }
    }

    /// Render as a single line.
    pub fn render(&self, format: LogFormat, timestamps: bool) -> String {
        match format {
            LogFormat::Json => {
                let mut value = serde_json::json!({
                    "level": self.level,
                    "message": self.message,
                });
                if timestamps {
                    value["timestamp"] = serde_json::Value::from(self.timestamp.as_str());
                }
                if let Some(c) = &self.component {
                    value["component"] = serde_json::Value::from(c.as_str());
                }
                value.to_string()
            }
            LogFormat::Plain => {
                let mut line = String::new();
                if timestamps {
                    line.push_str(&self.timestamp);
                    line.push(' ');
                }
                line.push_str(&format!("{:<5}", self.level.as_str()));
                if let Some(c) = &self.component {
                    line.push_str(&format!(" [{c}]"));
                }
                line.push(' ');
                line.push_str(&self.message);
                line
            }
            LogFormat::Compact => {
                let tag = self.level.as_str().chars().next().unwrap_or('?');
                match &self.component {
                    Some(c) => format!("{tag} {c}: {}", self.message),
                    None => format!("{tag} {}", self.message),
                }
            }
        }
    }
}

/// Log collector for capturing log entries
#[derive(Debug, Default)]
pub struct LogCollector {
    entries: Vec<LogEntry>,
}

impl LogCollector {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn filter_by_level(&self, level: LogLevel) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.level == level).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

enum Sink {
    Stderr,
    Collect(LogCollector),
}

/// Filters entries by [`LoggingConfig`] and writes them to stderr, or keeps
/// them in memory when built with [`Logger::collecting`].
pub struct Logger {
    config: LoggingConfig,
    sink: Sink,
}

impl Logger {
    pub fn stderr(config: LoggingConfig) -> Self {
        Self {
            config,
            sink: Sink::Stderr,
        }
    }

    pub fn collecting(config: LoggingConfig) -> Self {
        Self {
            config,
            sink: Sink::Collect(LogCollector::new()),
        }
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    pub fn log(&mut self, entry: LogEntry) {
        if !self.config.should_log(entry.level, entry.component.as_deref()) {
            return;
        }
        match &mut self.sink {
            Sink::Stderr => eprintln!("{}", entry.render(self.config.format, self.config.timestamps)),
            Sink::Collect(c) => c.push(entry),
        }
    }

    pub fn error(&mut self, component: &str, message: impl Into<String>) {
        self.log(LogEntry::with_component(LogLevel::Error, component, message));
    }

    pub fn warn(&mut self, component: &str, message: impl Into<String>) {
        self.log(LogEntry::with_component(LogLevel::Warn, component, message));
    }

    pub fn info(&mut self, component: &str, message: impl Into<String>) {
        self.log(LogEntry::with_component(LogLevel::Info, component, message));
    }

    pub fn debug(&mut self, component: &str, message: impl Into<String>) {
        self.log(LogEntry::with_component(LogLevel::Debug, component, message));
    }

    /// Entries kept by a collecting logger; empty for stderr.
    pub fn collected(&self) -> &[LogEntry] {
        match &self.sink {
            Sink::Collect(c) => c.entries(),
            Sink::Stderr => &[],
        }
    }
}
