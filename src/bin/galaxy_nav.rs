//! Galaxy Navigator CLI
//!
//! Drives a headless galaxy against the paper API:
//! 1. Loads a field's root layer
//! 2. Drills through a sequence of paper ids by clicking their projected stars
//! 3. Backs out N times
//! 4. Prints the final status and breadcrumbs
//!
//! Usage:
//!   cargo run --bin galaxy_nav -- \
//!     --field machine-learning \
//!     --drill W2741809807 --drill W1522301498 \
//!     --back 1
//!
//!   # JSON status, custom API
//!   cargo run --bin galaxy_nav -- --base-url http://papers:8080 --field ml --json

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use galaxy_core::{BackOutcome, DrillOutcome, HeadlessScene, LoadOutcome, NavStatus, Navigator};
use galaxy_nav::{ApiClient, GalaxySession, GalaxySettings};

/// Headless galaxy navigator
#[derive(Parser, Debug)]
#[command(name = "galaxy_nav")]
#[command(about = "Load a field, drill into references and back out")]
struct Args {
    /// Field whose root papers form layer 0
    #[arg(long, short = 'f')]
    field: String,

    /// Paper id to drill into (repeatable, applied in order)
    #[arg(long, short = 'd')]
    drill: Vec<String>,

    /// Number of back steps after drilling
    #[arg(long, short = 'b', default_value_t = 0)]
    back: usize,

    /// Paper API base URL (overrides the settings file)
    #[arg(long, env = "GALAXY_API_URL")]
    base_url: Option<String>,

    /// Settings file
    #[arg(long, short = 'c', env = "GALAXY_NAV_CONFIG")]
    config: Option<PathBuf>,

    /// Print the final status as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => GalaxySettings::load_from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => GalaxySettings::from_env().context("loading settings")?,
    };
    if let Some(base_url) = &args.base_url {
        settings.api.base_url = base_url.clone();
    }
    settings.validate().context("validating settings")?;

    let client = ApiClient::new(&settings.api.base_url, settings.api.timeout())
        .context("building API client")?;
    let settle = Duration::from_millis(
        settings
            .navigation
            .transition_ms
            .max(settings.navigation.fade_ms)
            + settings.render.frame_interval_ms,
    );

    let mut session = GalaxySession::new(
        Arc::new(client),
        settings.navigation.clone(),
        HeadlessScene::new,
    )
    .with_render_loop(settings.render.frame_interval());

    let outcome = session.select_field(&args.field).await;
    report_load(&args.field, &outcome);
    if !matches!(outcome, LoadOutcome::Loaded { .. }) {
        print_status(session.status().as_ref(), &[], args.json)?;
        return Ok(());
    }
    tokio::time::sleep(settle).await;

    if let Some(navigator) = session.navigator().cloned() {
        for paper_id in &args.drill {
            let outcome = drill_by_click(&navigator, paper_id).await;
            report_drill(paper_id, &outcome);
            tokio::time::sleep(settle).await;
            if !matches!(outcome, DrillOutcome::Entered { .. }) {
                break;
            }
        }
    }

    for _ in 0..args.back {
        let outcome = session.request_back().await;
        report_back(&outcome);
        tokio::time::sleep(settle).await;
        if !matches!(outcome, BackOutcome::Returned { .. }) {
            break;
        }
    }

    let breadcrumbs: Vec<String> = session
        .breadcrumbs()
        .iter()
        .map(ToString::to_string)
        .collect();
    print_status(session.status().as_ref(), &breadcrumbs, args.json)?;

    session.close();
    Ok(())
}

/// Click the star carrying `paper_id` where it appears on screen, then drill.
/// Falls back to selecting by id when the star is hidden behind another.
async fn drill_by_click(navigator: &Navigator<HeadlessScene>, paper_id: &str) -> DrillOutcome {
    let point = navigator.with_state(|s| {
        s.layers()
            .find_paper(paper_id)
            .and_then(|e| s.scene().project(e.id))
    });
    if let Some(point) = point {
        navigator.click_at(point);
    }

    let selected = navigator
        .status()
        .selected_paper
        .is_some_and(|p| p.id == paper_id);
    if selected {
        navigator.drill_in().await
    } else {
        navigator.drill_into(paper_id).await
    }
}

fn report_load(field: &str, outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Loaded { papers, broadened } => {
            let note = if *broadened { " (broadened)" } else { "" };
            println!("{} {field}: {papers} papers{note}", "LOADED".green().bold());
        }
        LoadOutcome::Empty => println!("{} {field}: no papers", "EMPTY".yellow().bold()),
        LoadOutcome::Failed(err) => eprintln!("{} {field}: {err}", "ERROR:".red().bold()),
        LoadOutcome::Rejected(why) => eprintln!("{} {field}: {why}", "SKIPPED".yellow()),
    }
}

fn report_drill(paper_id: &str, outcome: &DrillOutcome) {
    match outcome {
        DrillOutcome::Entered {
            depth, references, ..
        } => println!(
            "{} {paper_id}: {references} references at depth {depth}",
            "DRILL".green().bold()
        ),
        DrillOutcome::NoReferences { cached, .. } => println!(
            "{} {paper_id}: no references{}",
            "DRILL".yellow().bold(),
            if *cached { " (cached)" } else { "" }
        ),
        DrillOutcome::Failed(err) => eprintln!("{} {paper_id}: {err}", "ERROR:".red().bold()),
        DrillOutcome::Rejected(why) => eprintln!("{} {paper_id}: {why}", "SKIPPED".yellow()),
    }
}

fn report_back(outcome: &BackOutcome) {
    match outcome {
        BackOutcome::Returned { depth } => {
            println!("{} to depth {depth}", "BACK".green().bold())
        }
        BackOutcome::Failed(err) => eprintln!("{} {err}", "ERROR:".red().bold()),
        BackOutcome::Rejected(why) => eprintln!("{} {why}", "SKIPPED".yellow()),
    }
}

fn print_status(status: Option<&NavStatus>, breadcrumbs: &[String], json: bool) -> Result<()> {
    let Some(status) = status else {
        println!("no field loaded");
        return Ok(());
    };

    if json {
        let doc = serde_json::json!({
            "status": status,
            "breadcrumbs": breadcrumbs,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!();
    println!("{}", "Status".bold());
    println!("  depth:        {}", status.current_depth);
    println!("  stack size:   {}", status.navigation_stack_size);
    println!("  layers:       {}", status.layer_count);
    if let Some(paper) = &status.selected_paper {
        println!("  selected:     {}", paper.label());
    }
    if let Some(banner) = status.banner() {
        println!("  banner:       {banner}");
    }
    if !breadcrumbs.is_empty() {
        println!("  breadcrumbs:  {}", breadcrumbs.join(" > "));
    }
    Ok(())
}
