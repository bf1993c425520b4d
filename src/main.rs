use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use inbox_assist::backend::{Backend, HttpBackend};
use inbox_assist::config::AssistConfig;
use inbox_assist::session::Session;
use inbox_assist::transcript::{Payload, Source, TranscriptEntry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AssistConfig::from_env().context("invalid configuration")?;
    let filter_date = config
        .filter_date
        .clone()
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());

    eprintln!("📬 Inbox Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", config.backend_url);
    eprintln!("   Filter date: {filter_date}");
    eprintln!("   Commands: /emails, /date YYYY-MM-DD, /quit\n");

    let backend: Arc<dyn Backend> =
        Arc::new(HttpBackend::new(&config).context("failed to build backend client")?);
    let session = Session::new(backend, filter_date.clone());

    session
        .announce("Welcome to Inbox Assist. How can I help you today?")
        .await;

    // Initial context load; a failure here only logs, the session still works.
    if let Err(e) = session.refresh_emails(&filter_date).await {
        tracing::warn!(error = %e, "Initial email fetch failed");
    } else {
        eprintln!(
            "   Loaded {} emails for {filter_date}\n",
            session.emails().await.len()
        );
    }

    let mut rendered = 0;
    rendered = render_transcript(&session, rendered).await;

    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    eprint!("> ");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            eprint!("> ");
            continue;
        }

        if line == "/quit" {
            break;
        } else if line == "/emails" {
            print_emails(&session).await;
        } else if let Some(date) = line.strip_prefix("/date ") {
            match session.refresh_emails(date.trim()).await {
                Ok(emails) => eprintln!("Loaded {} emails for {}", emails.len(), date.trim()),
                Err(e) => eprintln!("Refresh failed: {e}"),
            }
        } else {
            if let Err(e) = session.submit(&line).await {
                eprintln!("{e}");
            }
            rendered = render_transcript(&session, rendered).await;
            eprintln!("[{}]", session.status().await);
        }
        eprint!("> ");
    }

    Ok(())
}

/// Print transcript entries not yet shown; returns the new rendered count.
async fn render_transcript(session: &Session, already_rendered: usize) -> usize {
    let entries = session.transcript().await;
    for entry in entries.iter().skip(already_rendered) {
        print_entry(entry);
    }
    entries.len()
}

fn print_entry(entry: &TranscriptEntry) {
    let who = match entry.source {
        Source::User => "You",
        Source::Assistant => "Assistant",
        Source::System => "System",
    };
    println!(
        "[{}] {who}: {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.text
    );

    match &entry.payload {
        Payload::Plain => {}
        Payload::Events(events) => {
            for event in events {
                let when = event.datetime.as_deref().unwrap_or("time unknown");
                println!("    event: {} — {} (email {})", event.event, when, event.email_id);
            }
        }
        Payload::Summaries(summaries) => {
            for summary in summaries {
                println!("    {}: {}", summary.email_id, summary.response);
            }
        }
        Payload::Labels(labels) => {
            for set in labels {
                println!("    {}: [{}]", set.email_id, set.labels.join(", "));
            }
        }
    }
}

async fn print_emails(session: &Session) {
    let emails = session.emails().await;
    if emails.is_empty() {
        println!("No emails loaded for {}", session.filter_date().await);
        return;
    }
    for email in emails {
        let date = chrono::DateTime::from_timestamp_millis(email.internal_date)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown date".into());
        println!("  {} | {} | {}", email.id, date, email.snippet);
    }
}
