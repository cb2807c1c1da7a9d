use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use entex_groq::Credential;

use crate::analyzer::{Slot, Workbench};
use crate::cli::ui::StatusPrinter;
use crate::config::EntexConfig;
use crate::web::{self, AppState};

pub async fn run_serve_command(config: EntexConfig, credential: Credential) -> Result<()> {
    let printer = StatusPrinter::new();
    let workbench = Workbench::build(&config, &credential)?;

    for slot in workbench.slots() {
        let profile = slot.profile();
        match slot {
            Slot::Ready(_) => printer.kv(profile.variant.slug(), &profile.model.model),
            Slot::Unavailable { reason, .. } => {
                printer.warning("Disabled", &format!("{}: {}", profile.variant, reason))
            }
        }
    }

    let bind = config.server.bind();
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    let addr = listener.local_addr()?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            signal.cancel();
        }
    });

    printer.status("Serving", &format!("http://{}", addr));
    web::serve(listener, AppState::new(workbench, shutdown)).await?;
    printer.status("Stopped", &format!("http://{}", addr));
    Ok(())
}
