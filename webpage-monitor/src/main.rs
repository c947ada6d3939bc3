use std::process::ExitCode;

use anyhow::Context;
use webpage_monitor::cli::Args;
use webpage_monitor::observability::init_logging;
use webpage_monitor::pipeline::run_once;

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse_normalized();
    if let Err(err) = init_logging(args.verbosity(), args.log_json) {
        eprintln!("failed to set up logging: {err:#}");
    }
    let config = args.into_config();

    // One thread: the steps run strictly one after another.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    Ok(ExitCode::from(runtime.block_on(run_once(config))))
}
