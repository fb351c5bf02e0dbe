use clap::Parser;
use sitewarden::{cli, config, errors::SiteWardenError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    // Logs go to stderr so the report on stdout stays machine-readable
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr);
    if cli.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let result = match cli.command {
        cli::Commands::Assess(args) => cli::assess::handle_assess(args).await,
        cli::Commands::Validate(args) => handle_validate(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(error: &SiteWardenError) -> i32 {
    match error {
        SiteWardenError::Config(_) | SiteWardenError::Yaml(_) => 2,
        SiteWardenError::InvalidTarget(_) => 5,
        SiteWardenError::OriginUnreachable { .. } => 6,
        SiteWardenError::Cancelled => 130,
        _ => 1,
    }
}

async fn handle_validate(args: cli::commands::ValidateArgs) -> Result<(), SiteWardenError> {
    let path = std::path::PathBuf::from(&args.config);
    let config = config::parse_config(&path).await?;
    let settings = config::AssessmentSettings::from_config(&config);
    println!("Configuration is valid: {}", args.config);
    println!(
        "  max_pages={} dynamic_threshold={} dynamic={} workers={} knowledge_index={}",
        settings.max_pages,
        settings.dynamic_threshold,
        settings.enable_dynamic,
        settings.workers,
        settings.knowledge_endpoint.as_deref().unwrap_or("none"),
    );
    Ok(())
}
