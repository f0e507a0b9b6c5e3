use std::sync::Arc;

use stb_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), stb_core::Error> {
    let cfg = Arc::new(Config::load()?);
    stb_core::logging::init("stb", cfg.log_file.as_deref())?;

    stb_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| stb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
