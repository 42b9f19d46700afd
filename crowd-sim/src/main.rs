//! crowd-sim - Replay a visitor script against the crowdfunding page store

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crowd_sim::{parse_script, OutputFormat, Simulator};
use libcrowdfund::animation::Viewport;
use libcrowdfund::config::Config;
use libcrowdfund::logging::{LogFormat, LoggingConfig};
use libcrowdfund::CrowdfundError;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "crowd-sim")]
#[command(version, about = "Replay scripted visitor interactions against the crowdfunding page")]
#[command(long_about = r#"Replay scripted visitor interactions against the crowdfunding page.

Every widget of the page subscribes to one shared store. Each script line
dispatches an action (or prints something) and the widgets re-render.

SCRIPT COMMANDS:
    bookmark [on|off]            Toggle or set the bookmark
    select <pledge-id>|none      Open the back-project modal on a tier, or close it
    pledge <pledge-id> <amount>  Enter a pledge
    close-feedback               Dismiss the thank-you modal
    animate                      Run the stats counters (first time only)
    scroll <y>                   Scroll to <y> px and report pledge cards revealed
    show                         Print the current screen

EXAMPLES:
    # Read the script from a file
    crowd-sim visit.txt

    # Or from stdin
    printf 'select bamboo-stand\npledge bamboo-stand 25\n' | crowd-sim

    # JSON output for scripting
    crowd-sim visit.txt --format json | jq '.screen.stats'

EXIT CODES:
    0 - Success (refused pledges are reported but do not fail the run)
    1 - Error (unreadable script, bad config, etc.)
    3 - Invalid input (malformed script line)
"#)]
struct Cli {
    /// Script file (reads from stdin if not provided)
    script: Option<PathBuf>,

    /// Config file (defaults to CROWDFUND_CONFIG or the XDG config dir)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1440, value_name = "PX")]
    viewport: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 900, value_name = "PX")]
    viewport_height: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log output format (text, json, pretty); defaults to CROWDFUND_LOG_FORMAT
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

fn main() {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if let Some(format) = cli.log_format {
        logging.format = format;
    }
    logging.verbose |= cli.verbose;
    logging.init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<CrowdfundError>()
            .map(CrowdfundError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };
    let state = config.initial_state()?;

    let text = read_script(cli.script.as_ref())?;
    let commands = parse_script(&text)?;
    debug!(commands = commands.len(), "Script parsed");

    let format: OutputFormat = cli
        .format
        .parse()
        .map_err(CrowdfundError::InvalidInput)?;

    let viewport = Viewport {
        width: f64::from(cli.viewport),
        height: f64::from(cli.viewport_height),
    };
    let mut simulator = Simulator::new(state, config.animation, viewport, format);
    let report = simulator
        .run(&commands, &mut io::stdout().lock(), &mut io::stderr().lock())
        .context("Failed to write output")?;

    debug!(
        dispatched = report.dispatched,
        rejected = report.rejected,
        "Script finished"
    );
    Ok(())
}

fn read_script(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read script from stdin")?;
            Ok(text)
        }
    }
}
