use interview_relay::{
    config::{self, Config},
    relay,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    let directives = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(config::log_filter(directives.as_deref()))
        .init();

    let config = Config::from_env()?;
    relay::serve(config).await
}
