use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use talawa_init::{
    BootstrapOptions, EnvDefaults, TcpProbe, TermPrompt, run_bootstrap,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "talawa-init", about = "Talawa API configuration bootstrapper")]
struct Cli {
    /// Configuration file to create or update
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
    /// Template the configuration file is reconciled against
    #[arg(long, default_value = ".env.template")]
    template_file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let options = BootstrapOptions {
        env_path: cli.env_file,
        template_path: cli.template_file,
    };
    let env = EnvDefaults::from_process_env();
    let mut prompt = TermPrompt;
    let probe = TcpProbe::default();

    println!("Welcome to the Talawa API installer! 🚀");

    match run_bootstrap(&options, &env, &mut prompt, &probe).await {
        Ok(()) => {
            println!(
                "Congratulations! Talawa API has been successfully configured! 🥂🎉"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            if let Some(hint) = err.hint() {
                eprintln!("{hint}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}
