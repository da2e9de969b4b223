use gainsreport::{AppConfig, Cli, commands};
use gains_sqlite::Db;
use std::io;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Everything logs through `tracing`; RUST_LOG picks what reaches stderr.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::import()?;

    let AppConfig { database, analyzer } = AppConfig::load(&cli)?;

    let db = Db::open(&database).await?;
    commands::run(db, analyzer, cli.command, cli.pretty, &mut io::stdout().lock()).await
}
