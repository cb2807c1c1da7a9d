use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use entex_core::Variant;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model for both variants (overrides config)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// OpenAI-compatible API base URL
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print a default config file and exit
    #[arg(long)]
    pub generate_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the extraction pages (default)
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8501
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Run one extraction and print the markdown table
    Analyze {
        /// Text to analyze; read from stdin when omitted
        text: Option<String>,

        #[arg(long, default_value = "medical")]
        variant: Variant,

        /// Save the result; a directory gets the variant's download file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Settings from the command line that override config files and environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub api_base_url: Option<String>,
    pub bind: Option<String>,
}

impl From<&Args> for CliOverrides {
    fn from(args: &Args) -> Self {
        let bind = match &args.command {
            Some(Commands::Serve { bind }) => bind.clone(),
            _ => None,
        };
        CliOverrides {
            model: args.model.clone(),
            api_base_url: args.api_base_url.clone(),
            bind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    pub variant: Variant,
    pub text: Option<String>,
    pub output: Option<PathBuf>,
}

pub fn validate_analyze_args(args: &AnalyzeArgs) -> Result<()> {
    if let Some(output) = &args.output {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(anyhow::anyhow!(
                    "Output directory does not exist: {}",
                    parent.display()
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_no_subcommand() {
        let args = Args::try_parse_from(["entex"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(CliOverrides::from(&args), CliOverrides::default());
    }

    #[test]
    fn test_serve_bind_override() {
        let args =
            Args::try_parse_from(["entex", "serve", "--bind", "0.0.0.0:9000", "-m", "llama3"])
                .unwrap();
        let overrides = CliOverrides::from(&args);
        assert_eq!(overrides.bind.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(overrides.model.as_deref(), Some("llama3"));
    }

    #[test]
    fn test_analyze_variant_parsing() {
        let args = Args::try_parse_from(["entex", "analyze", "--variant", "ner", "Tim Cook"]).unwrap();
        match args.command {
            Some(Commands::Analyze { text, variant, .. }) => {
                assert_eq!(variant, Variant::Entities);
                assert_eq!(text.as_deref(), Some("Tim Cook"));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Args::try_parse_from(["entex", "analyze", "--variant", "legal"]).is_err());
    }

    #[test]
    fn test_validate_analyze_args() {
        let missing_dir = AnalyzeArgs {
            variant: Variant::Medical,
            text: Some("fever".to_string()),
            output: Some(PathBuf::from("/definitely/not/here/out.txt")),
        };
        assert!(validate_analyze_args(&missing_dir).is_err());

        let stdin = AnalyzeArgs {
            variant: Variant::Medical,
            text: None,
            output: None,
        };
        assert!(validate_analyze_args(&stdin).is_ok());
    }
}
