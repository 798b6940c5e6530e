use std::process::ExitCode;

use clap::Parser;

use plum_match::config::HarnessConfig;
use plum_match::errors::HarnessResult;
use plum_match::harness::control::{spawn_console_reader, SharedStatus};
use plum_match::harness::report::render_report;
use plum_match::harness::scheduler::{load_corpus, run_matches};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = HarnessConfig::parse();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &HarnessConfig) -> HarnessResult<()> {
    config.validate()?;
    let corpus = load_corpus(&config.fen_file)?;

    let status = SharedStatus::new();
    // The reader blocks on stdin for the life of the process; never joined.
    let _console = spawn_console_reader(status.clone())?;
    println!("Commands: pause | go | stop | quit");

    let summary = run_matches(config, &corpus, &status)?;
    print!("{}", render_report(&summary));
    Ok(())
}
