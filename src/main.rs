use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    locator_replay::cli::app::run().await
}
