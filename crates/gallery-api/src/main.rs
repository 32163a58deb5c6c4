use gallery_core::ApiConfig;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = ApiConfig::from_env()?;

    let (_state, router) = gallery_api::setup::initialize_app(config.clone()).await?;

    gallery_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
