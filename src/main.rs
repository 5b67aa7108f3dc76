use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nexus_planner::allocator::targets::aggregate_policy_targets;
use nexus_planner::catalog::loader::load_interventions;
use nexus_planner::catalog::CatalogSnapshot;
use nexus_planner::config::{Config, ConfigOverrides};
use nexus_planner::output::csv::{catalog_to_csv, simulation_to_csv};
use nexus_planner::output::render_json;
use nexus_planner::policy::loader::{
    infer_policy_pillar, load_policies, policies_by_title, policy_categories,
};
use nexus_planner::policy::Policy;
use nexus_planner::session::Session;
use nexus_planner::simulation::run_policy_simulation;
use nexus_planner::wefe::labs::{find_lab, load_living_labs, load_pillar_definitions, region_names};
use nexus_planner::wefe::score::{overall_score, pillar_score, projected_score_after_policies, ScoreBreakdown};
use nexus_planner::wefe::PillarKey;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "nexus-planner",
    about = "Policy-to-intervention planning for WEFE Living Labs"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    lab: Option<String>,
    /// Comma-separated policy titles; overrides the config selection.
    #[arg(short = 'p', long)]
    policies: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full policy-to-intervention simulation.
    Simulate,
    /// Aggregate the selected policies' indicator targets only.
    Targets,
    /// Load and print the intervention catalog.
    Catalog,
    /// List available policies.
    Policies {
        #[arg(long)]
        category: Option<String>,
    },
    /// Pillar scores for the selected living lab.
    Score {
        #[arg(long)]
        projected: bool,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[derive(Debug, Serialize)]
struct PolicyListing {
    title: String,
    policy_type: Option<String>,
    pillar: PillarKey,
    synergy_count: usize,
    trade_off_count: usize,
}

#[derive(Debug, Serialize)]
struct ScoreReport {
    lab: String,
    pillar_scores: BTreeMap<String, Option<f64>>,
    breakdown: ScoreBreakdown,
    projected_score: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        lab: cli.lab.clone(),
        interventions_dir: None,
        policies_path: None,
        selected_policies: cli
            .policies
            .as_deref()
            .map(parse_title_list)
            .transpose()?,
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }

    match &cli.command {
        Commands::Simulate => {
            let policies = load_policies(&config.resolved_policies_path())?;
            let selected = resolve_selected_policies(&config, &policies);
            let result =
                run_policy_simulation(&config.resolved_interventions_dir(), &selected);

            let mut session = Session::new();
            session.select_lab(config.lab.name.clone());
            for policy in &selected {
                session.select_policy(policy.title.clone());
            }
            session.record_run(result);

            if let Some(result) = session.last_run() {
                match cli.output {
                    OutputFormat::Json => println!("{}", render_json(result)?),
                    OutputFormat::Csv => println!("{}", simulation_to_csv(result)?),
                }
            }
        }
        Commands::Targets => {
            let policies = load_policies(&config.resolved_policies_path())?;
            let selected = resolve_selected_policies(&config, &policies);
            let targets = aggregate_policy_targets(&selected);
            print_json_or_fallback(&targets, cli.output)?;
        }
        Commands::Catalog => {
            let dir = config.resolved_interventions_dir();
            let snapshot = CatalogSnapshot::from_interventions(
                dir.display().to_string(),
                load_interventions(&dir),
            );
            match cli.output {
                OutputFormat::Json => println!("{}", render_json(&snapshot)?),
                OutputFormat::Csv => println!("{}", catalog_to_csv(&snapshot.interventions)?),
            }
        }
        Commands::Policies { category } => {
            let policies = load_policies(&config.resolved_policies_path())?;
            let listings: Vec<PolicyListing> = policies
                .iter()
                .filter(|p| match category {
                    Some(category) => p.policy_type.as_deref() == Some(category.as_str()),
                    None => true,
                })
                .map(|p| PolicyListing {
                    title: p.title.clone(),
                    policy_type: p.policy_type.clone(),
                    pillar: infer_policy_pillar(p),
                    synergy_count: p.synergies.len(),
                    trade_off_count: p.trade_offs.len(),
                })
                .collect();
            if let Some(category) = category {
                if !policy_categories(&policies).iter().any(|c| c == category) {
                    warn!("unknown policy category: {category}");
                }
            }
            print_json_or_fallback(&listings, cli.output)?;
        }
        Commands::Score { projected } => {
            let labs = load_living_labs(&config.resolved_labs_path())?;
            let definitions = load_pillar_definitions(&config.resolved_pillars_path())?;
            let lab = find_lab(&labs, &config.lab.name).ok_or_else(|| {
                anyhow!(
                    "living lab not found: {} (known: {})",
                    config.lab.name,
                    region_names(&labs).join(", ")
                )
            })?;

            let weights = config.weights;
            let pillar_scores = PillarKey::ALL
                .iter()
                .map(|p| (p.as_slug().to_string(), pillar_score(*p, lab, &definitions)))
                .collect();
            let projected_score = if *projected {
                let policies = load_policies(&config.resolved_policies_path())?;
                let selected = resolve_selected_policies(&config, &policies);
                projected_score_after_policies(lab, &definitions, &selected, &weights)
            } else {
                None
            };

            let report = ScoreReport {
                lab: lab.name.clone(),
                pillar_scores,
                breakdown: overall_score(lab, &definitions, &weights),
                projected_score,
            };
            print_json_or_fallback(&report, cli.output)?;
        }
        Commands::Config { .. } => unreachable!("config command handled before dispatch"),
    }

    Ok(())
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &PathBuf) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn parse_title_list(raw: &str) -> Result<Vec<String>> {
    let titles: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if titles.is_empty() {
        return Err(anyhow!("policy selection is empty"));
    }
    Ok(titles)
}

/// Resolves the configured titles against the loaded catalog. Unknown
/// titles are logged and skipped; the simulation runs with whatever
/// remains.
fn resolve_selected_policies(config: &Config, policies: &[Policy]) -> Vec<Policy> {
    let by_title = policies_by_title(policies);
    let mut selected = Vec::new();
    for title in &config.policies.selected {
        match by_title.get(title) {
            Some(policy) => selected.push(policy.clone()),
            None => warn!("policy not found in catalog: {title}"),
        }
    }
    selected
}

fn print_json_or_fallback<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render_json(value)?),
        OutputFormat::Csv => {
            warn!("CSV output not implemented for this command, using JSON");
            println!("{}", render_json(value)?);
        }
    }
    Ok(())
}
