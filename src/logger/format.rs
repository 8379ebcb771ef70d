//! Colorized console output for log lines
//!
//! Format: `HH:MM:SS [TAG     ] [LEVEL] message`. Tags get a fixed color per
//! subsystem; levels color the whole severity column.

use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;

/// Fixed tag column width for alignment
const TAG_WIDTH: usize = 9;

/// Format and print a single log line to stdout
pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let time = Local::now().format("%H:%M:%S").to_string();
    let line = format!(
        "{} [{}] [{}] {}",
        time.dimmed(),
        format_tag(tag),
        format_level(level),
        message
    );
    println!("{}", line);
}

fn format_tag(tag: LogTag) -> ColoredString {
    let padded = format!("{:<width$}", tag.as_str(), width = TAG_WIDTH);
    match tag {
        LogTag::System => padded.bright_yellow().bold(),
        LogTag::Config => padded.yellow().bold(),
        LogTag::Api => padded.bright_blue().bold(),
        LogTag::Rpc => padded.bright_cyan().bold(),
        LogTag::Holders => padded.bright_magenta().bold(),
        LogTag::Portfolio => padded.bright_green().bold(),
        LogTag::Tokens => padded.green().bold(),
        LogTag::Tools => padded.cyan().bold(),
    }
}

fn format_level(level: LogLevel) -> ColoredString {
    match level {
        LogLevel::Error => level.as_str().bright_red().bold(),
        LogLevel::Warning => level.as_str().bright_yellow(),
        LogLevel::Info => level.as_str().normal(),
        LogLevel::Debug => level.as_str().dimmed(),
    }
}
