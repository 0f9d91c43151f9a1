use crate::bot::{App, Reply};
use anyhow::{Context, Result};
use std::path::Path;

/// Runs a single command locally and prints the reply. Charts are written
/// to `chart_out` instead.
pub async fn ask(app: &App, text: &str, chart_out: &Path) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    match app.handle(text, now).await {
        Reply::Text(reply) => println!("{reply}"),
        Reply::Photo(image) => {
            std::fs::write(chart_out, &image.png)
                .with_context(|| format!("Failed to write chart to {}", chart_out.display()))?;
            println!("Chart written to {}", chart_out.display());
        }
    }
    Ok(())
}
