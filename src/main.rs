use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gradewise::cli::{Cli, Commands};
use gradewise::{
    build_http_client, ClientConfig, FileReference, GenerateFeedbackUseCase,
    ImageCrateManipulator, LocalFileReader, PrepareImageUseCase, ProgressSink, SpinnerProgress,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Feedback {
            file,
            student,
            assignment,
            mime_type,
        } => {
            let config = load_config(cli.base_url, cli.timeout_ms)?;
            info!("Using chat API at {}", config.base_url());
            let use_case = GenerateFeedbackUseCase::new(build_http_client(config)?);

            let mut reference = FileReference::from_path(&file);
            if let Some(mime_type) = mime_type {
                reference = reference.with_mime_type(mime_type);
            }

            let progress = SpinnerProgress::new();
            let result = use_case
                .execute(&reference, &student, &assignment, Some(&progress as &dyn ProgressSink))
                .await;
            progress.finish();

            println!("{}", result?);
        }

        Commands::Compress { image, output } => {
            let manipulator = match cli.cache_dir {
                Some(dir) => ImageCrateManipulator::new(dir),
                None => ImageCrateManipulator::in_temp_dir(),
            };
            let use_case =
                PrepareImageUseCase::new(Arc::new(manipulator), Arc::new(LocalFileReader::new()));

            let progress = SpinnerProgress::new();
            let result = use_case
                .execute(&image, Some(&progress as &dyn ProgressSink))
                .await;
            progress.finish();
            let encoded = result?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &encoded).await?;
                    println!(
                        "Wrote {} base64 characters to {}",
                        encoded.len(),
                        path.display()
                    );
                }
                None => println!("{encoded}"),
            }
        }

        Commands::Mime {
            file,
            mime_type,
            kind,
        } => {
            let mut reference = FileReference::from_path(&file);
            if let Some(mime_type) = mime_type {
                reference = reference.with_mime_type(mime_type);
            }
            if let Some(kind) = kind {
                reference = reference.with_kind(kind);
            }
            println!("{}", reference.content_type());
        }
    }

    Ok(())
}

/// Environment configuration with command-line overrides applied.
fn load_config(base_url: Option<String>, timeout_ms: Option<u64>) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(millis) = timeout_ms {
        config = config.with_timeout(Duration::from_millis(millis));
    }
    Ok(config)
}
