mod cli;
mod logging;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use todo_core::Sequence;
use todo_engine::Orchestrator;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    let config = args.run_config();
    logging::initialize(
        engine_logging::level_for(config.debug),
        args.log_destination(),
    );

    let orchestrator = Orchestrator::with_reqwest(config).context("building http client")?;
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;

    let mut generator = Sequence::from(args.sequence).generator(args.endpoint.as_str());
    let report = runtime.block_on(orchestrator.run(&mut generator));

    // Run errors and the deadline are already logged; the exit code stays 0.
    std::io::stdout()
        .lock()
        .write_all(report.render().as_bytes())
        .context("writing results")?;
    Ok(())
}
