use std::{fs::OpenOptions, path::Path, sync::Mutex};

use tracing_subscriber::{fmt, EnvFilter};

use crate::{errors::Error, Result};

/// Initialize tracing for the bot.
///
/// Default: info for our crates, warn for everything else. Can be overridden
/// with `RUST_LOG`. With `log_file` set, lines are appended there instead of
/// stderr.
pub fn init(service_name: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,stb=info,stb_core=info,stb_telegram=info,{service_name}=info"
        ))
    });

    let builder = fmt().with_env_filter(filter).with_target(false);

    let res = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_ansi(true).try_init(),
    };

    res.map_err(|e| Error::Config(format!("failed to initialize logging: {e}")))
}
