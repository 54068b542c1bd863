use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};

// Define where to store logs
const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "circuit_sim.log";

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Overrides `RUST_LOG` when set.
    pub level: Option<LevelFilter>,

    /// Log file; `None` disables file logging.
    pub log_file: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { level: None, log_file: Some(Path::new(LOG_DIR).join(LOG_FILE)) }
    }
}

impl LoggerConfig {
    /// Level from the config, else from `RUST_LOG` (RUST_LOG=debug or RUST_LOG=warn), else `info`.
    pub fn effective_level(&self) -> LevelFilter {
        self.level.unwrap_or_else(|| std::env::var("RUST_LOG").ok().and_then(|level| level.parse::<LevelFilter>().ok()).unwrap_or(LevelFilter::Info))
    }
}

/// Initializes the global logger.
///
/// This function should be called once at the very beginning of the
/// application's `main` function. Logs go to stderr (colored) and, if configured,
/// to a plain-text log file. Failing to open the log file only disables file logging.
pub fn init(config: &LoggerConfig) {
    let base_config = Dispatch::new().level(config.effective_level()).level_for("serde", LevelFilter::Warn);

    let console_config = Dispatch::new()
        .format(|out, message, record| {
            let colors = ColoredLevelConfig::new()
                .error(Color::Red)
                .warn(Color::Yellow)
                .info(Color::Green)
                .debug(Color::Blue)
                .trace(Color::BrightBlack);

            out.finish(format_args!("[{} {} {}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), colors.color(record.level()), record.target(), message))
        })
        .chain(std::io::stderr());

    let mut dispatch = base_config.chain(console_config);

    if let Some(log_file_path) = &config.log_file {
        match open_log_file(log_file_path) {
            Ok(file) => {
                let file_config = Dispatch::new()
                    .format(|out, message, record| {
                        out.finish(format_args!("[{} {} {}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), record.level(), record.target(), message))
                    })
                    .chain(file);
                dispatch = dispatch.chain(file_config);
            }
            Err(e) => eprintln!("Failed to open log file '{}': {}", log_file_path.display(), e),
        }
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("Failed to apply logger configuration: {}", e);
        return;
    }

    match &config.log_file {
        Some(path) => log::info!("Logger initialized. Logging to console and '{}'.", path.display()),
        None => log::info!("Logger initialized. Logging to console."),
    }
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    fern::log_file(path)
}
