use map_relayer::cli::RelayerCli;
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> eyre::Result<()> {
    let cli = RelayerCli::parse();

    // Logs go to stderr so stdout carries only the JSON report.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    cli.validate()?;
    debug!(target: "map_relayer::cli", command = ?cli.command, chain = %cli.chain, "Running command");

    let report = match cli.run() {
        Ok(report) => report,
        Err(err) => {
            error!(target: "map_relayer::cli", %err, "Command failed");
            return Err(err);
        }
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
