//! `roster`: interactive terminal for the student-record service.

use roster_client::{execute, render, Command, HttpStudentsApi, Outcome, StudentListView};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

const DEFAULT_API_URL: &str = "http://localhost:5000";

fn resolve_api_url() -> String {
    if let Some(url) = std::env::args().nth(1).filter(|v| !v.trim().is_empty()) {
        return url;
    }

    match std::env::var("ROSTER_API_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_API_URL.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let api = HttpStudentsApi::new(resolve_api_url())?;
    tracing::info!(base_url = api.base_url(), "connecting");

    let mut view = StudentListView::new(api);
    view.load().await;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut screen = render(&view);
    loop {
        view.dismiss_notice();
        stdout.write_all(screen.as_bytes()).await?;
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            screen = render(&view);
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                screen = format!("{e}\n");
                continue;
            }
        };

        screen = match execute(&mut view, command).await {
            Outcome::Render => render(&view),
            Outcome::Print(text) => format!("{text}\n"),
            Outcome::Quit => break,
        };
    }

    Ok(())
}
