use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use entex_groq::Credential;

use crate::analyzer::{Outcome, Slot, Workbench};
use crate::cli::args::AnalyzeArgs;
use crate::cli::ui::{progress, truncate_text, StatusPrinter};
use crate::config::EntexConfig;

pub async fn run_analyze_command(
    args: AnalyzeArgs,
    config: EntexConfig,
    credential: Credential,
) -> Result<()> {
    let printer = StatusPrinter::new();

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };

    let workbench = Workbench::build(&config, &credential)?;
    let extractor = match workbench.slot(args.variant) {
        Slot::Ready(extractor) => extractor,
        Slot::Unavailable { reason, .. } => return Err(anyhow!("{}", reason)),
    };
    let spec = &extractor.profile().presentation;

    printer.status("Analyzing", &format!("{} \"{}\"", args.variant, truncate_text(&text, 50)));

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let spinner = progress::create_spinner("Analyzing text...");
    let outcome = extractor.analyze(&text, &cancel).await;
    spinner.finish_and_clear();
    watcher.abort();

    if cancel.is_cancelled() {
        printer.warning("Cancelled", "Interrupted by user");
        return Err(anyhow!("Interrupted by user"));
    }

    match outcome {
        Outcome::Warning { message } => {
            printer.warning("Warning", &message);
            Err(anyhow!(message))
        }
        Outcome::Failure { message, hint } => {
            printer.error("Error", &message);
            printer.info("Hint", hint);
            Err(anyhow!(message))
        }
        Outcome::Success {
            presentation,
            elapsed,
        } => {
            printer.section(spec.result_heading);
            println!("{}", presentation.markdown());

            if spec.show_timing {
                printer.success(
                    "Finished",
                    &format!("Processing completed in {:.2} seconds", elapsed.as_secs_f64()),
                );
            }

            if let Some(output) = args.output {
                let download = presentation.download(spec);
                let path = resolve_output_path(output, download.filename);
                std::fs::write(&path, download.body)?;
                printer.success("Saved", &path.display().to_string());
            }

            printer.kv(
                "finished at",
                &chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            );
            Ok(())
        }
    }
}

/// A directory gets the variant's download file name appended.
fn resolve_output_path(output: PathBuf, filename: &str) -> PathBuf {
    if output.is_dir() {
        output.join(filename)
    } else {
        output
    }
}
