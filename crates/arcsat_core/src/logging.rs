use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::Path,
};

use env_logger::{Builder, Target, WriteStyle};
use log::Level;

use crate::{AppOptions, Error, LogFormat, Result};

const CRATE_PREFIX: &str = "arcsat_core::";

/// Installs the global logger described by `options`.
///
/// With `--log-output` the file is appended to, so consecutive runs share one log.
pub fn init_logger(options: &AppOptions) -> Result<()> {
    let format = options.log_format;
    let timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .format(move |buf, record| {
            if timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            let level = level_tag(record.level());
            match format {
                LogFormat::Compact => writeln!(buf, "{level} {}", record.args()),
                LogFormat::Pretty => writeln!(
                    buf,
                    "{level:<5} {:<10} {}",
                    component(record.target()),
                    record.args()
                ),
            }
        });

    let target = match options.log_output.as_deref() {
        Some(path) => Target::Pipe(Box::new(open_log_file(path)?)),
        None => Target::Stderr,
    };
    builder.target(target);

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::other(format!("failed to open log output {}: {e}", path.display())))
}

/// Module path relative to the core crate, e.g. `geocode` for `arcsat_core::geocode`.
fn component(target: &str) -> &str {
    target.strip_prefix(CRATE_PREFIX).unwrap_or(target)
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

#[cfg(test)]
mod tests {
    use std::{fs, io::Write};

    use log::Level;

    use super::{component, level_tag, open_log_file};

    #[test]
    fn component_strips_core_crate_prefix() {
        assert_eq!(component("arcsat_core::analysis::route"), "analysis::route");
        assert_eq!(component("arcsat"), "arcsat");
    }

    #[test]
    fn level_tags_are_upper_case() {
        assert_eq!(level_tag(Level::Warn), "WARN");
        assert_eq!(level_tag(Level::Trace), "TRACE");
    }

    #[test]
    fn log_file_is_created_with_parents_and_appended() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("logs").join("arcsat.log");

        for line in ["first\n", "second\n"] {
            let mut file = open_log_file(&path).expect("open log file");
            file.write_all(line.as_bytes()).expect("write line");
        }

        let text = fs::read_to_string(&path).expect("read log");
        assert_eq!(text, "first\nsecond\n");
    }
}
