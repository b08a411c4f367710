//! labrat CLI - end-to-end suite runner for the LIMS UI
//!
//! Usage:
//!   labrat run                   Run the whole suite
//!   labrat run --tag smoke       Run only specs tagged `smoke`
//!   labrat order                 Print the computed spec execution order
//!   labrat bootstrap             Log in once and persist the session state
//!   labrat fixtures load         Load seed fixtures
//!   labrat fixtures check        Probe whether seed fixtures exist
//!   labrat fixtures clean        Delete test-created rows
//!
//! Behavior is controlled by environment variables (`BASE_URL`, `TEST_USER`,
//! `TEST_PASS`, `CI`, `LABRAT_*_FIXTURES`); flags override where noted.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use labrat_core::{Isolation, SuiteConfig};
use labrat_fixtures::{DockerPsqlExecutor, FailurePolicy, FixtureConfig, FixtureTasks};
use labrat_orchestrator::{compute_order, AuthBootstrap, OrderConfig, SuiteRunner};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "labrat")]
#[command(author, version, about = "End-to-end suite runner for the LIMS UI")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the suite
    Run {
        /// Spec root directory
        #[arg(long, default_value = "specs")]
        spec_root: PathBuf,

        /// Run only specs carrying this tag
        #[arg(long)]
        tag: Option<String>,

        /// Cross-spec isolation mode
        #[arg(long, value_enum)]
        isolation: Option<CliIsolation>,

        /// Worker count for per-spec isolation (CI always forces 1)
        #[arg(long)]
        workers: Option<usize>,

        /// Run with a visible browser window
        #[arg(long)]
        headed: bool,

        /// Project root the fixture tasks run from
        #[arg(long, default_value = ".")]
        project_root: PathBuf,
    },

    /// Print the computed spec execution order
    Order {
        /// Spec root directory
        #[arg(long, default_value = "specs")]
        spec_root: PathBuf,
    },

    /// Log in once and persist the session storage state
    Bootstrap,

    /// Fixture lifecycle operations
    Fixtures {
        #[command(subcommand)]
        action: FixtureCommands,

        /// Project root the fixture tasks run from
        #[arg(long, default_value = ".")]
        project_root: PathBuf,
    },
}

#[derive(Subcommand)]
enum FixtureCommands {
    /// Load seed fixtures via the loader script
    Load,
    /// Probe whether seed fixtures are present
    Check,
    /// Delete test-created rows (children before parents)
    Clean,
}

/// CLI-friendly isolation enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliIsolation {
    Shared,
    PerSpec,
}

impl From<CliIsolation> for Isolation {
    fn from(i: CliIsolation) -> Self {
        match i {
            CliIsolation::Shared => Isolation::Shared,
            CliIsolation::PerSpec => Isolation::PerSpec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run {
            spec_root,
            tag,
            isolation,
            workers,
            headed,
            project_root,
        } => cmd_run(spec_root, tag, isolation, workers, headed, project_root).await,
        Commands::Order { spec_root } => cmd_order(spec_root),
        Commands::Bootstrap => cmd_bootstrap().await,
        Commands::Fixtures {
            action,
            project_root,
        } => cmd_fixtures(action, project_root).await,
    }
}

fn fixture_tasks(project_root: PathBuf, config: &SuiteConfig) -> FixtureTasks {
    let executor = Arc::new(DockerPsqlExecutor::local_default(project_root.clone()));
    let fixture_config = FixtureConfig {
        loader_script: project_root.join("src/test/resources/load-test-fixtures.sh"),
        policy: FailurePolicy::from_toggles(&config.fixtures),
        ..FixtureConfig::default()
    };
    FixtureTasks::new(executor, fixture_config)
}

async fn cmd_run(
    spec_root: PathBuf,
    tag: Option<String>,
    isolation: Option<CliIsolation>,
    workers: Option<usize>,
    headed: bool,
    project_root: PathBuf,
) -> Result<()> {
    let mut config = SuiteConfig::from_env();
    if let Some(isolation) = isolation {
        config.isolation = isolation.into();
    }
    if let Some(workers) = workers {
        if !config.ci {
            config.workers = workers;
        }
    }
    if headed {
        config.headless = false;
    }

    let fixtures = fixture_tasks(project_root, &config);
    let runner = SuiteRunner::new(config)
        .with_spec_root(spec_root)
        .with_fixtures(fixtures);

    let result = runner.run(tag.as_deref()).await?;
    if !result.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_order(spec_root: PathBuf) -> Result<()> {
    let order = compute_order(&spec_root, &OrderConfig::default());
    for (index, spec) in order.iter().enumerate() {
        println!("{:3}. {}", index + 1, spec);
    }
    Ok(())
}

async fn cmd_bootstrap() -> Result<()> {
    let config = SuiteConfig::from_env();
    let bootstrap = AuthBootstrap::from_env(&config)?;
    let path = bootstrap.run().await?;
    info!("Session state at {}", path.display());
    Ok(())
}

async fn cmd_fixtures(action: FixtureCommands, project_root: PathBuf) -> Result<()> {
    let config = SuiteConfig::from_env();
    let tasks = fixture_tasks(project_root, &config);

    match action {
        FixtureCommands::Load => {
            tasks.load().await?;
            info!("Fixture load complete");
        }
        FixtureCommands::Check => {
            let present = tasks.check_exists().await;
            println!("{}", if present { "present" } else { "absent" });
        }
        FixtureCommands::Clean => {
            tasks.clean().await?;
            info!("Fixture clean complete");
        }
    }
    Ok(())
}
