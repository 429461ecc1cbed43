use reshape_core::Config;

// Use mimalloc as the global allocator; image buffers churn through large allocations.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, engines, routes)
    let (_state, router) = reshape_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    reshape_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
