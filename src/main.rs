use anyhow::Result;
use lineage::http::HttpServer;
use lineage::store::Store;
use lineage::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    log::info!("Starting lineage v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    log::info!("Configuration loaded successfully");
    log::info!("Data directory: {}", config.storage.data_dir.display());
    log::info!("Upload directory: {}", config.storage.upload_dir.display());

    let store = Store::new(&config)?;
    let server = HttpServer::new(config, store);
    server.run().await?;

    Ok(())
}
