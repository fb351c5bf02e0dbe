use clap::{Parser, Subcommand, Args};

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_TIMESTAMP"), ")");

#[derive(Parser)]
#[command(name = "sitewarden", version, long_version = LONG_VERSION, about = "Crawl a website and assess its HTTP security posture")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl a site, scan every page and print the assessment report
    Assess(AssessArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct AssessArgs {
    /// Origin URL to assess
    #[arg(short, long)]
    pub target: String,

    /// Maximum pages to crawl (overrides config)
    #[arg(short, long)]
    pub max_pages: Option<usize>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Never fall back to headless browser rendering
    #[arg(long)]
    pub no_dynamic: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assess() {
        let cli = Cli::try_parse_from([
            "sitewarden", "-vv", "assess", "--target", "https://example.test", "--max-pages", "4", "--no-dynamic",
        ]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Assess(args) => {
                assert_eq!(args.target, "https://example.test");
                assert_eq!(args.max_pages, Some(4));
                assert!(args.no_dynamic);
                assert!(args.output.is_none());
            }
            _ => panic!("expected assess"),
        }
    }

    #[test]
    fn test_assess_requires_target() {
        assert!(Cli::try_parse_from(["sitewarden", "assess"]).is_err());
    }

    #[test]
    fn test_parse_validate_with_global_flags() {
        let cli = Cli::try_parse_from(["sitewarden", "validate", "--config", "a.yaml", "--json", "--no-color"]).unwrap();
        assert!(cli.json);
        assert!(cli.no_color);
        assert!(matches!(cli.command, Commands::Validate(ref a) if a.config == "a.yaml"));
    }
}
