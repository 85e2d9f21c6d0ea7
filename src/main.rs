use clap::Parser;
use laserburn::{init_logging, run, Args, BUILD_DATE, VERSION};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(args.log_format)?;

    info!("laserburn {} (built {})", VERSION, BUILD_DATE);
    let summary = run(&args)?;
    info!("Done: {} motion commands", summary.command_count);

    Ok(())
}
