//! Logger setup for the visualization binaries

use log::LevelFilter;
use thiserror::Error;

/// Errors associated with initialising the logger
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(#[from] log::SetLoggerError),
}

/// Initialise the global logger, writing to stdout.
///
/// Debug and trace records include their target so per-module output can be
/// told apart. Must only be called once per process.
pub fn logger_init(min_level: LevelFilter) -> Result<(), LoggerInitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
            if record.level() > log::Level::Info {
                out.finish(format_args!(
                    "[{} {:5}] {}: {}",
                    stamp,
                    record.level(),
                    record.target(),
                    message
                ))
            } else {
                out.finish(format_args!("[{} {:5}] {}", stamp, record.level(), message))
            }
        })
        .level(min_level)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}
