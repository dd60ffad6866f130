use chrono::Local;
use std::io;
use std::path::Path;

/// Initializes the global logger.
///
/// `RUST_LOG` still wins over the defaults below. When `log_dir` is given the
/// output is piped into `app-<timestamp>.log` inside it instead of stderr.
pub fn init_logging(log_dir: Option<&Path>) -> io::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Warn)
        .filter_module("researchify", log::LevelFilter::Info)
        .filter_module("sqlx", log::LevelFilter::Error)
        .filter_module("sea_orm", log::LevelFilter::Error)
        .parse_default_env();

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;
        let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
        let log_file = std::fs::File::create(dir.join(format!("app-{}.log", ts)))?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    // a second init (e.g. several tests in one binary) is harmless
    let _ = builder.try_init();
    Ok(())
}
