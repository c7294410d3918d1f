//! Auto-responder binary.

use telegram_autoreply::commands::autoanswer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    autoanswer::run(None, None).await?;
    Ok(())
}
