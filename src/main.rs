use researchify::config::Config;
use researchify::logging::init_logging;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // a missing .env is fine, the environment may already be set
    dotenv::dotenv().ok();
    init_logging(Config::log_dir_from_env().as_deref())?;

    let config = Config::from_env()?;
    researchify::start_server(config).await
}
