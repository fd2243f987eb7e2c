use rust_gcis_api::config::Config;
use rust_gcis_api::lookup::GcisLookup;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line lookup of one or more unified business numbers.
///
/// Usage: `rust-gcis-api <uni> [<uni>...]`
///
/// Each record is printed to stdout as pretty JSON. Numbers that are not
/// registered are reported on stderr and skipped; any other failure aborts.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_gcis_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let unis: Vec<String> = std::env::args().skip(1).collect();
    if unis.is_empty() {
        anyhow::bail!("usage: rust-gcis-api <uni> [<uni>...]");
    }

    let config = Config::from_env()?;
    let gcis = GcisLookup::new(&config)?;

    for uni in &unis {
        match gcis.lookup(uni).await {
            Ok(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            Err(e) if e.is_not_found() => tracing::warn!("{}: not registered ({})", uni, e),
            Err(e) => {
                return Err(anyhow::Error::new(e).context(format!("lookup of {} failed", uni)));
            }
        }
    }

    Ok(())
}
