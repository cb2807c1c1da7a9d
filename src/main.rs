use anyhow::Result;
use dotenvy::dotenv;

use entex::cli::RootCommand;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    RootCommand::execute().await
}
