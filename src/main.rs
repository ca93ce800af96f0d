use golinks::{config, init_tracing, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;

    init_tracing(&config.log_format, &config.log_level);
    config.print_summary();

    server::run(config).await
}
