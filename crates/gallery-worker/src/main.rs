use gallery_core::WorkerConfig;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = WorkerConfig::from_env()?;

    let (_state, router) = gallery_worker::setup::initialize_worker(config.clone()).await?;

    gallery_worker::setup::server::start_server(&config, router).await?;

    Ok(())
}
