use anyhow::Result;

use placechat::run_cli;

#[tokio::main]
async fn main() -> Result<()> {
    run_cli().await
}
