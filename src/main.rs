use anyhow::{Context, Result};

use tumbler::{
    config::{AppConfig, Config},
    TumblerApp,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => AppConfig::load_from_file(&path)
            .with_context(|| format!("loading config {}", path.to_string_lossy()))?,
        None => AppConfig::default(),
    }
    .with_env_overrides();

    log::info!("Starting tumbler");
    log::debug!("{config:?}");

    let app = TumblerApp::new(config).context("creating event loop")?;
    app.run().context("tumbler exited with an error")
}
