use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gymlog_client::Gateway;
use gymlog_client::config::load_config;
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gymlog")]
#[command(about = "Workout tracker client for a spreadsheet web-app backend", long_about = None)]
struct Cli {
    /// Path to the configuration file
    /// (defaults to <config dir>/gymlog/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with username and password
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Register a new user
    Register {
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// End the current session
    Logout,
    /// Show the current authentication state
    Status,
    /// Exercise catalog
    Exercises {
        #[command(subcommand)]
        action: ExerciseAction,
    },
    /// Workout records
    Workouts {
        #[command(subcommand)]
        action: WorkoutAction,
    },
    /// Per-exercise statistics
    Stats { exercise_id: String },
    /// Body measurements
    Body {
        #[command(subcommand)]
        action: BodyAction,
    },
}

#[derive(Subcommand)]
enum ExerciseAction {
    /// List all exercises
    List,
    /// Add a user-defined exercise (JSON payload)
    Add { json: String },
}

#[derive(Subcommand)]
enum WorkoutAction {
    /// Show workout history, optionally bounded by dates (YYYY-MM-DD)
    History {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Record a single set (JSON payload)
    Add { json: String },
    /// Record a whole training session of sets (JSON array payload)
    AddMany { json: String },
    /// Delete a workout record
    Delete { id: String },
}

#[derive(Subcommand)]
enum BodyAction {
    /// Show measurement history, optionally bounded by dates (YYYY-MM-DD)
    List {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Record a measurement (JSON payload)
    Add { json: String },
    /// Delete a measurement
    Delete { id: String },
}

fn parse_payload(json: &str) -> Result<Value> {
    serde_json::from_str(json).context("payload is not valid JSON")
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let gateway = Gateway::from_config(&config)?;

    match cli.command {
        Commands::Login { username, password } => {
            let login = gateway.login(&username, &password).await?;
            println!("logged in, token valid for {} s", gateway.session().time_left());
            if let Some(user) = &login.user {
                print_json(user)?;
            }
        }
        Commands::Register {
            username,
            password,
            name,
        } => {
            let login = gateway.register(&username, &password, &name).await?;
            println!("registered");
            if let Some(user) = &login.user {
                print_json(user)?;
            }
        }
        Commands::Logout => {
            gateway.logout().await;
            println!("logged out");
        }
        Commands::Status => {
            let session = gateway.session();
            if session.is_authenticated() {
                println!("authenticated, {} s left", session.time_left());
                if let Some(user) = session.current_user() {
                    print_json(&user)?;
                }
            } else {
                println!("not authenticated");
            }
        }
        Commands::Exercises { action } => match action {
            ExerciseAction::List => print_json(&gateway.list_exercises().await?)?,
            ExerciseAction::Add { json } => {
                print_json(&gateway.add_exercise(parse_payload(&json)?).await?)?
            }
        },
        Commands::Workouts { action } => match action {
            WorkoutAction::History { start, end } => print_json(
                &gateway
                    .workout_history(start.as_deref(), end.as_deref())
                    .await?,
            )?,
            WorkoutAction::Add { json } => {
                print_json(&gateway.record_workout(parse_payload(&json)?).await?)?
            }
            WorkoutAction::AddMany { json } => {
                print_json(&gateway.record_workouts(parse_payload(&json)?).await?)?
            }
            WorkoutAction::Delete { id } => print_json(&gateway.delete_workout(&id).await?)?,
        },
        Commands::Stats { exercise_id } => {
            print_json(&gateway.exercise_stats(&exercise_id).await?)?
        }
        Commands::Body { action } => match action {
            BodyAction::List { start, end } => print_json(
                &gateway
                    .body_metric_history(start.as_deref(), end.as_deref())
                    .await?,
            )?,
            BodyAction::Add { json } => {
                print_json(&gateway.add_body_metric(parse_payload(&json)?).await?)?
            }
            BodyAction::Delete { id } => print_json(&gateway.delete_body_metric(&id).await?)?,
        },
    }

    Ok(())
}
