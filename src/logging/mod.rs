use std::io;

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter};

pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Error => "ERR".bold().red(),
        Level::Warn => "WRN".bold().yellow(),
        Level::Info => "INF".bold().green(),
        Level::Debug => "DBG".bold().blue(),
        Level::Trace => "TRC".bold().white(),
    }
}

/// Routes `log` records to stderr so they never interleave with the grid on
/// stdout. Dependencies stay at warn regardless of verbosity.
pub fn init(verbose: u8) -> Result<(), String> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}{}{} {}",
                "[".bold().white(),
                level_tag(record.level()),
                "]".bold().white(),
                message
            ))
        })
        .level(LevelFilter::Warn)
        .level_for("pokegrid", level_for_verbosity(verbose))
        .chain(io::stderr())
        .apply()
        .map_err(|e| format!("failed to initialize logging: {e}"))
}
