use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use coach_metrics::{
    analyze, analyze_json, init_logging, profile_summary, wellness_report, Activity,
    ActivitySummary, CoachError, Config, IntervalsClient, Result,
};

#[derive(Parser)]
#[command(name = "coach-cli")]
#[command(about = "Fetch and analyze cycling training data from intervals.icu")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get athlete profile and training zones
    Profile,

    /// List recent activities
    Activities {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Get single activity with streams
    Activity { id: String },

    /// Get CTL/ATL/TSB data
    Wellness {
        #[arg(long, default_value_t = 90)]
        days: u32,
    },

    /// Analyze activity with calculations
    Analyze { id: String },

    /// Analyze an activity JSON file without contacting the API
    AnalyzeFile {
        activity: PathBuf,

        /// Profile JSON used for FTP and zones
        #[arg(long)]
        profile: Option<PathBuf>,
    },
}

/// `{"success": true, "data": ...}` envelope.
fn success<T: Serialize>(data: &T) -> Result<Value> {
    Ok(json!({ "success": true, "data": serde_json::to_value(data)? }))
}

fn client() -> Result<IntervalsClient> {
    IntervalsClient::from_config(&Config::load()?)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| CoachError::InvalidInput {
        message: format!("could not read {}: {}", path.display(), e),
    })
}

async fn run(command: Commands) -> Result<Value> {
    match command {
        Commands::Profile => {
            let profile = client()?.get_profile().await?;
            success(&profile_summary(&profile))
        }
        Commands::Activities { limit } => {
            let activities = client()?.get_activities(limit).await?;
            let listed: Vec<ActivitySummary> = activities.iter().map(ActivitySummary::from).collect();
            success(&listed)
        }
        Commands::Activity { id } => {
            let activity: Activity = client()?.get_activity(&id).await?;
            success(&activity)
        }
        Commands::Wellness { days } => {
            let records = client()?.get_wellness(days).await?;
            success(&wellness_report(&records, days as usize))
        }
        Commands::Analyze { id } => {
            let client = client()?;
            let activity = client.get_activity(&id).await?;
            let profile = client.get_profile().await?;
            success(&analyze(&activity, Some(&profile)))
        }
        Commands::AnalyzeFile { activity, profile } => {
            let activity_json = read_file(&activity)?;
            let profile_json = profile.as_deref().map(read_file).transpose()?;
            success(&analyze_json(&activity_json, profile_json.as_deref())?)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let (output, code) = match run(cli.command).await {
        Ok(value) => (value, ExitCode::SUCCESS),
        Err(e) => {
            debug!("[Cli] Command failed: {:?}", e);
            (json!({ "success": false, "error": e.to_string() }), ExitCode::FAILURE)
        }
    };

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            println!("{{\"success\": false, \"error\": \"{}\"}}", e);
            return ExitCode::FAILURE;
        }
    }
    code
}
