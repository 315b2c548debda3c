// src/main.rs

use dynbuild::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    let verbose = args.verbose;

    if let Err(err) = run_main(args).await {
        if verbose {
            eprintln!("dynbuild error: {err:?}");
        } else {
            eprintln!("dynbuild error: {err}");
        }
        std::process::exit(1);
    }
}

async fn run_main(args: cli::CliArgs) -> anyhow::Result<()> {
    logging::init_logging(args.log_level, args.verbose)?;
    run(args).await?;
    Ok(())
}
