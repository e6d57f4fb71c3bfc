use std::path::Path;

use fern::Dispatch;
use log::LevelFilter;

/// # parse a logging level
/// unknown levels default to info
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_uppercase().as_str() {
        "OFF" => LevelFilter::Off,
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// # setup logging
/// log to stdout and to a log file
///
/// ## Arguments
/// * `level` - the most verbose level that is logged
/// * `log_file` - file the log is appended to
pub fn setup_logging(level: LevelFilter, log_file: &Path) -> Result<(), fern::InitError> {
    let stdout_config = Dispatch::new().format(format_record).chain(std::io::stdout());
    let file_logger_config = Dispatch::new()
        .format(format_record)
        .chain(fern::log_file(log_file)?);

    Dispatch::new()
        .level(level)
        // rocket logs every request on info
        .level_for("rocket", LevelFilter::Warn)
        .level_for("_", LevelFilter::Warn)
        .chain(stdout_config)
        .chain(file_logger_config)
        .apply()?;

    Ok(())
}

fn format_record(out: fern::FormatCallback, message: &std::fmt::Arguments, record: &log::Record) {
    out.finish(format_args!(
        "{} [{}][{}] {}",
        chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
        record.target(),
        record.level(),
        message
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_parsed() {
        assert_eq!(parse_level("OFF"), LevelFilter::Off);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_level(" TRACE "), LevelFilter::Trace);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
        assert_eq!(parse_level(""), LevelFilter::Info);
    }
}
