// Line Formatting Strategy
// Console lines carry ANSI markers; durable lines are the same text with markers stripped

use crate::domain::LogLevel;
use regex::Regex;
use std::sync::OnceLock;

pub const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";

/// Turns a leveled message into a console line
pub trait LineFormatter: Send + Sync {
    fn format(&self, level: LogLevel, message: &str) -> String;
}

/// Coloured `<prefix> <colour><message><reset>` lines
#[derive(Debug, Clone)]
pub struct AnsiFormatter {
    info_tag: String,
}

impl AnsiFormatter {
    pub fn new(info_tag: impl Into<String>) -> Self {
        Self {
            info_tag: info_tag.into(),
        }
    }

    /// Level prefix, markers included
    pub fn prefix(&self, level: LogLevel) -> String {
        match level {
            LogLevel::Error => format!("{RED}[ERROR]{RESET}"),
            LogLevel::Warning | LogLevel::SoftWarning => format!("{YELLOW}[WARNING]{RESET}"),
            LogLevel::Debug => format!("{CYAN}[DEBUG]{RESET}"),
            LogLevel::Info => format!("{RESET}[{}]{RESET}", self.info_tag),
        }
    }

    /// Colour applied to the message body
    pub fn color(level: LogLevel) -> &'static str {
        match level {
            LogLevel::Error => RED,
            LogLevel::Warning => YELLOW,
            LogLevel::SoftWarning => RESET,
            LogLevel::Debug | LogLevel::Info => GRAY,
        }
    }
}

impl LineFormatter for AnsiFormatter {
    fn format(&self, level: LogLevel, message: &str) -> String {
        format!(
            "{} {}{}{}",
            self.prefix(level),
            Self::color(level),
            message,
            RESET
        )
    }
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\x1b\[[;\d]*m").expect("static ANSI pattern is valid"))
}

/// Remove ANSI SGR markers (`ESC[...m`) from a line
pub fn strip_markers(line: &str) -> String {
    marker_pattern().replace_all(line, "").into_owned()
}
