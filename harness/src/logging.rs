//! Logger initialization for the `sweeproute` binary.
//!
//! Libraries only emit through the `log` facade; this is the one place a
//! backend is installed.

use std::io::{self, Write};

use env_logger::{fmt::Formatter, Builder, Env, Target, WriteStyle};
use log::{Level, LevelFilter};

/// Line layout of log records on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `LEVEL message`
    #[default]
    Compact,
    /// `LEVEL [target] message`
    Pretty,
}

/// Install the stderr logger.
///
/// With `level = None` the filter comes from `RUST_LOG`, defaulting to
/// `info`.
///
/// # Errors
///
/// Fails if a logger is already installed.
pub fn init_logger(level: Option<LevelFilter>, format: LogFormat) -> io::Result<()> {
    let mut builder = match level {
        Some(level) => {
            let mut b = Builder::new();
            b.filter_level(level);
            b
        }
        None => Builder::from_env(Env::default().default_filter_or("info")),
    };
    builder
        .write_style(WriteStyle::Never)
        .target(Target::Stderr)
        .format(move |buf: &mut Formatter, record| match format {
            LogFormat::Compact => writeln!(buf, "{} {}", level_tag(record.level()), record.args()),
            LogFormat::Pretty => writeln!(
                buf,
                "{} [{}] {}",
                level_tag(record.level()),
                record.target(),
                record.args()
            ),
        });

    builder.try_init().map_err(io::Error::other)
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
