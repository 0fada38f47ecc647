use {
    crate::{
        auth::OAuth2Provider,
        batch::{BatchConfig, BatchProcessor},
        cli::Cli,
        client::FolderClient,
        config::Settings,
        ui::{ConsolePrompt, Prompt, navigate::Navigator},
    },
    clap::Parser,
    color_eyre::eyre::Result,
    tracing::{error, info},
    tracing_subscriber::EnvFilter,
};

mod auth;
mod batch;
mod cli;
mod client;
mod config;
mod error;
mod locate;
mod models;
mod report;
mod ui;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    if let Err(report) = run().await {
        error!("run failed: {report:?}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let argv = Cli::parse();
    let mut settings = Settings::load()?;
    argv.apply_to(&mut settings);

    let site_base = argv.site_base();
    let http = client::build_http_client(&settings.http, argv.skip_verify)?;
    let auth = OAuth2Provider::new(
        http.clone(),
        &site_base,
        &argv.client_id,
        &argv.client_secret,
    );
    let api = FolderClient::new(http, &site_base, auth);
    let mut prompt = ConsolePrompt;

    println!("-------------");
    println!(
        "Welcome to the Panopto folder renaming/moving tool. Folders to process \
         are read from {} and results are written to {}.",
        settings.input_csv.display(),
        settings.results_csv.display()
    );
    println!("You are logged into {site_base}");
    println!("-------------");

    let destination = Navigator::new(&api, &mut prompt).select_destination().await?;

    println!("-------------");
    println!(
        "Once confirmed, every row of {} will be renamed and moved into \"{}\".",
        settings.input_csv.display(),
        destination.name
    );
    if !prompt.confirm("Are these settings correct?", false)? {
        info!("aborted before the batch run, nothing was changed");
        return Ok(());
    }

    let config = BatchConfig {
        input_csv: settings.input_csv,
        results_csv: settings.results_csv.clone(),
        double_verify: settings.double_verify,
        retry: batch::RetryPolicy {
            max_attempts: settings.conflict_retries,
        },
        site_base,
    };
    let summary = BatchProcessor::new(&api, &mut prompt, config, destination)
        .run()
        .await?;

    info!(
        rows = summary.rows,
        moved = summary.moved,
        report = %settings.results_csv.display(),
        "run complete"
    );
    Ok(())
}
