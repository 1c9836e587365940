use colog::format::CologStyle;
use colored::Colorize;
use env_logger::fmt::Formatter;
use log::{Level, Record};
use std::io::Write;

/// Log lines look like `08:15:02 INFO  dispatch: Skipping news.htm`.
pub struct DsbLogStyle;

/// The module path of a log target, without this crate's name.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix(concat!(env!("CARGO_CRATE_NAME"), "::"))
        .unwrap_or(target)
}

impl CologStyle for DsbLogStyle {
    fn level_token(&self, level: &Level) -> &str {
        match level {
            Level::Error => "ERROR",
            Level::Warn => "WARN ",
            Level::Info => "INFO ",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    fn prefix_token(&self, level: &Level) -> String {
        format!(
            "{} {}",
            chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
            self.level_color(level, self.level_token(level))
        )
    }

    fn format(&self, buf: &mut Formatter, record: &Record<'_>) -> Result<(), std::io::Error> {
        writeln!(
            buf,
            "{} {}: {}",
            self.prefix_token(&record.level()),
            short_target(record.target()).cyan(),
            record.args().to_string().replace('\n', &self.line_separator())
        )
    }
}

/// Install the coloured logger. Level is `info` unless `RUST_LOG` says
/// otherwise.
pub fn init_logger() {
    let mut builder: env_logger::Builder = colog::default_builder();
    builder.format(colog::formatter(DsbLogStyle));
    builder.init();
}
