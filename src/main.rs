extern crate tokio;

use anyhow::Context;
use clap::Parser;
use corpora::{
    cli::{Cli, Command, Run},
    config,
    read::RequestReader,
    service::Corpora,
    tool,
};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries responses only.
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run(run) => serve(run).await,
    }
}

async fn serve(run: Run) -> anyhow::Result<()> {
    let settings = run.settings();
    config::validate(&settings.bm25)
        .map_err(anyhow::Error::msg)
        .context("invalid bm25 defaults")?;

    let mut reader = match &run.script {
        Some(path) => RequestReader::open(path)
            .await
            .with_context(|| format!("opening {}", path.display()))?,
        None => RequestReader::stdin(),
    };

    tracing::info!(
        script = ?reader.path(),
        tokenizer = ?settings.engine.tokenizer,
        "serving requests"
    );

    let corpora = Corpora::from_settings(settings);
    let mut stdout = BufWriter::new(tokio::io::stdout());
    let mut handled = 0usize;

    while let Some(line) = reader.next_request().await? {
        let response = tool::handle_line(&corpora, &line).await;
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');

        stdout.write_all(&encoded).await?;
        stdout.flush().await?;
        handled += 1;
    }

    tracing::info!(handled, "input exhausted");
    Ok(())
}
