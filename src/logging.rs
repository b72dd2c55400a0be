//! One-time installation of the `env_logger` backend behind the `log` facade.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::sync::Once;

use crate::error::MarshalError;

static INIT_LOGGER: Once = Once::new();

/// Installs an info-level logger printing `[LEVEL] message` lines, appending
/// to `log_file` when given. Only the first call has any effect; a logger
/// installed elsewhere in the process is left in place.
pub fn enable_verbose_logging(log_file: Option<&str>) -> Result<(), MarshalError> {
    // Open the file before entering `call_once` so the error can be returned.
    let target = match log_file {
        Some(path) if !INIT_LOGGER.is_completed() => {
            Some(OpenOptions::new().append(true).create(true).open(path)?)
        }
        _ => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Info);

        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = target {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unopenable_log_file_is_an_io_error() {
        match enable_verbose_logging(Some("/nonexistent-dir/for/sure/sg.log")) {
            Err(err) => assert!(matches!(err, MarshalError::Io(_))),
            // Another test installed the logger first, so the file was never opened.
            Ok(()) => assert!(INIT_LOGGER.is_completed()),
        }
    }

    #[test]
    fn test_repeated_calls_are_harmless() {
        assert!(enable_verbose_logging(None).is_ok());
        assert!(enable_verbose_logging(None).is_ok());
    }
}
