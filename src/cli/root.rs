use anyhow::Result;
use clap::Parser;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

use entex_groq::Credential;

use crate::cli::args::{validate_analyze_args, AnalyzeArgs, Args, CliOverrides, Commands};
use crate::cli::commands::{run_analyze_command, run_serve_command};
use crate::config::EntexConfig;

pub struct RootCommand;

impl RootCommand {
    pub async fn execute() -> Result<()> {
        let args = Args::parse();
        init_tracing(args.verbosity);

        if args.generate_config {
            println!("{}", EntexConfig::generate_default_config());
            return Ok(());
        }

        // No page or command runs without a credential.
        let credential = Credential::from_env()?;

        let env_vars: HashMap<String, String> = std::env::vars().collect();
        let config = EntexConfig::load_with_precedence(
            args.config.clone(),
            &CliOverrides::from(&args),
            &env_vars,
        )?;

        match args.command {
            Some(Commands::Analyze {
                text,
                variant,
                output,
            }) => {
                let analyze_args = AnalyzeArgs {
                    variant,
                    text,
                    output,
                };
                validate_analyze_args(&analyze_args)?;
                run_analyze_command(analyze_args, config, credential).await
            }
            // Serving is the default
            Some(Commands::Serve { .. }) | None => run_serve_command(config, credential).await,
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises entex's own level.
fn init_tracing(verbosity: u8) {
    let default_directive = match verbosity {
        0 => "entex=info",
        1 => "entex=debug,entex_groq=debug",
        _ => "entex=trace,entex_groq=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity > 0)
        .try_init();
}
