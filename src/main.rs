use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rps_author::cli::{Command, RootArgs};
use rps_author::workflow;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: RootArgs) -> Result<()> {
    match args.command {
        Command::Login(args) => workflow::run_login(
            args.workdir,
            args.api_url,
            args.token,
            args.refresh_token,
            args.user,
        ),
        Command::Logout(args) => workflow::run_logout(args.workdir),
        Command::Pull(args) => workflow::run_pull(args.workdir, args.rps, args.force),
        Command::Status(args) => workflow::run_status(args.workdir, args.json),
        Command::Validate(args) => workflow::run_validate(args.workdir, args.step, args.json),
        Command::Push(args) => workflow::run_push(args.workdir, args.step),
        Command::Next(args) => workflow::run_next(args.workdir),
        Command::Prev(args) => workflow::run_prev(args.workdir),
        Command::Goto(args) => workflow::run_goto(args.workdir, args.step),
        Command::Finalize(args) => workflow::run_finalize(args.workdir, args.force),
        Command::Show(args) => workflow::run_show(args.workdir, args.rps, args.json),
    }
}
