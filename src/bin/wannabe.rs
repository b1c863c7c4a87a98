//! Wannabe command line wizard
//!
//! Drives the three wizard screens against a running pathfinding service.
//! Every subcommand is a fresh page load; screens share data only through
//! the session directory.
//!
//! # Usage
//!
//! ```bash
//! # Look up canonical roles for free text
//! wannabe search --side current "sofware enginer"
//! wannabe search --side target "product" --pick 2
//!
//! # Compute a path and show the summary
//! wannabe find --current "software engineer" --target "product manager" --resolve
//!
//! # Show the stored path again, then the breakdown
//! wannabe path
//! wannabe steps --expand 2 --skill 1:sql
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wannabe::detail_view::{DetailScreen, DetailView, SkillModal, StepCard};
use wannabe::path_view::{NodeCategory, PathItem, PathScreen, PathView, RenderedPath};
use wannabe::resolver::{RoleResolver, RoleSide, SearchPanel};
use wannabe::selection::RoleSelectionScreen;
use wannabe::{CareerApi, SessionStore, WizardConfig};

#[derive(Parser)]
#[command(name = "wannabe")]
#[command(version)]
#[command(about = "Career-transition wizard: find a realistic path between two roles")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: pretty (default) or json
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Pathfinding service origin
    #[arg(long, global = true, env = "WANNABE_API_URL")]
    api_url: Option<String>,

    /// Session id; each id keeps its own results
    #[arg(long, global = true, env = "WANNABE_SESSION")]
    session: Option<String>,

    /// Directory holding session data
    #[arg(long, global = true, env = "WANNABE_SESSION_DIR")]
    session_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Current,
    Target,
}

impl From<SideArg> for RoleSide {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Current => RoleSide::Current,
            SideArg::Target => RoleSide::Target,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search canonical roles similar to free text
    Search {
        /// Which role box the text is typed into
        #[arg(long, value_enum, default_value = "current")]
        side: SideArg,

        /// Free text to match
        text: String,

        /// Select candidate N (1-based) from the results
        #[arg(long)]
        pick: Option<usize>,
    },

    /// Compute a path between two roles and show the summary
    Find {
        #[arg(long)]
        current: String,

        #[arg(long)]
        target: String,

        /// Resolve each role through similarity search first
        #[arg(long)]
        resolve: bool,
    },

    /// Show the stored path summary
    Path,

    /// Show the step-by-step breakdown of the stored path
    Steps {
        /// Toggle card N (1-based); repeatable
        #[arg(long = "expand", value_name = "N")]
        expand: Vec<usize>,

        /// Open the skill modal for CARD:SKILL (card is 1-based)
        #[arg(long, value_name = "CARD:SKILL", value_parser = parse_skill_ref)]
        skill: Option<SkillRef>,
    },

    /// Forget the stored path and input
    Reset,
}

#[derive(Clone, Debug)]
struct SkillRef {
    card: usize,
    skill: String,
}

fn parse_skill_ref(s: &str) -> Result<SkillRef, String> {
    let (card, skill) = s
        .split_once(':')
        .ok_or_else(|| format!("expected CARD:SKILL, got '{}'", s))?;
    let card = card
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("card must be a number, got '{}'", card))?;
    if card == 0 || skill.trim().is_empty() {
        return Err("card numbers start at 1 and the skill must not be empty".to_string());
    }
    Ok(SkillRef {
        card,
        skill: skill.trim().to_string(),
    })
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wannabe=info,wannabe_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

struct Wizard {
    api: Arc<dyn CareerApi>,
    store: SessionStore,
    format: OutputFormat,
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = WizardConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(session) = cli.session {
        config = config.with_session(session);
    }
    if let Some(dir) = cli.session_dir {
        config = config.with_session_dir(dir);
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Some(Duration::from_secs(secs)));
    }

    let api: Arc<dyn CareerApi> = Arc::new(config.api_client()?);
    let store = config
        .session_store()
        .with_context(|| format!("opening session '{}'", config.session_id))?;
    let wizard = Wizard {
        api,
        store,
        format: cli.format,
    };

    match cli.command {
        Commands::Search { side, text, pick } => cmd_search(&wizard, side.into(), &text, pick).await,
        Commands::Find {
            current,
            target,
            resolve,
        } => cmd_find(&wizard, &current, &target, resolve).await,
        Commands::Path => cmd_path(&wizard),
        Commands::Steps { expand, skill } => cmd_steps(&wizard, &expand, skill).await,
        Commands::Reset => cmd_reset(&wizard),
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

async fn cmd_search(
    wizard: &Wizard,
    side: RoleSide,
    text: &str,
    pick: Option<usize>,
) -> Result<ExitCode> {
    let mut resolver = RoleResolver::new(Arc::clone(&wizard.api));
    resolver.search_similar(side, text).await;

    if let Some(n) = pick {
        let index = n.checked_sub(1).ok_or_else(|| anyhow!("--pick starts at 1"))?;
        if resolver.select_candidate(side, index).is_none() {
            let available = resolver.field(side).panel.candidates().len();
            return Err(anyhow!(
                "no candidate {} to pick ({} available)",
                n,
                available
            ));
        }
    }

    let field = resolver.field(side);
    match wizard.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "side": side,
            "panel": field.panel,
            "selected": field.dropdown.value(),
        }))?,
        OutputFormat::Pretty => print_panel(&field.panel),
    }

    Ok(match field.panel {
        SearchPanel::ConnectionError => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

async fn cmd_find(wizard: &Wizard, current: &str, target: &str, resolve: bool) -> Result<ExitCode> {
    let mut screen = RoleSelectionScreen::new(Arc::clone(&wizard.api), wizard.store.clone());

    for (side, text) in [(RoleSide::Current, current), (RoleSide::Target, target)] {
        if resolve {
            screen.search_similar(side, text).await;
            if wizard.format == OutputFormat::Pretty {
                let label = match side {
                    RoleSide::Current => "Current role",
                    RoleSide::Target => "Target role",
                };
                println!("{}", label.bold());
                print_panel(&screen.field(side).panel);
            }
        } else {
            screen.choose(side, text);
        }
    }

    if wizard.format == OutputFormat::Pretty {
        println!("{}", format!("[{}]", screen.button().label).dimmed());
    }

    match screen.find_path().await {
        Some(next) => {
            if wizard.format == OutputFormat::Pretty {
                println!("{} {}", "→".green(), next.route());
            }
            cmd_path(wizard)
        }
        None => {
            let message = screen.error().unwrap_or_default();
            match wizard.format {
                OutputFormat::Json => print_json(&serde_json::json!({ "error": message }))?,
                OutputFormat::Pretty => println!("{}", message.red()),
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_path(wizard: &Wizard) -> Result<ExitCode> {
    let screen = PathScreen::load(&wizard.store);

    match wizard.format {
        OutputFormat::Json => print_json(screen.view())?,
        OutputFormat::Pretty => match screen.view() {
            PathView::Rendered(path) => print_path(path),
            other => println!("{}", other.message().unwrap_or_default().red()),
        },
    }

    Ok(match screen.view() {
        PathView::Rendered(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

async fn cmd_steps(wizard: &Wizard, expand: &[usize], skill: Option<SkillRef>) -> Result<ExitCode> {
    let mut screen = DetailScreen::open(Arc::clone(&wizard.api), &wizard.store).await;

    // Cards only exist once the breakdown loaded; otherwise show why it didn't
    if matches!(screen.view(), DetailView::Cards(_)) {
        for &n in expand {
            if n == 0 || !screen.toggle(n - 1) {
                return Err(anyhow!("no card {} to expand", n));
            }
        }

        if let Some(SkillRef { card, skill }) = &skill {
            let index = skill_index(&screen, *card, skill)
                .ok_or_else(|| anyhow!("no skill '{}' on card {}", skill, card))?;
            screen.open_skill(card - 1, index);
        }
    }

    match wizard.format {
        OutputFormat::Json => {
            let body = match screen.view() {
                DetailView::Prompt | DetailView::Loading => serde_json::json!({
                    "message": wannabe::detail_view::PROMPT_MESSAGE,
                }),
                DetailView::Cards(cards) => serde_json::json!({
                    "target_goal": screen.target_goal(),
                    "cards": cards,
                    "modal": screen.modal(),
                }),
                DetailView::Failed(message) => serde_json::json!({ "error": message }),
            };
            print_json(&body)?;
        }
        OutputFormat::Pretty => {
            match screen.view() {
                DetailView::Prompt => {
                    println!("{}", wannabe::detail_view::PROMPT_MESSAGE.yellow())
                }
                DetailView::Loading => println!("{}", wannabe::detail_view::LOADING_MESSAGE),
                DetailView::Cards(cards) => {
                    if let Some(goal) = screen.target_goal() {
                        println!("{} {}\n", "Roadmap to".dimmed(), goal.green().bold());
                    }
                    cards.iter().for_each(print_card);
                }
                DetailView::Failed(message) => println!("{}", message.red()),
            }
            println!(
                "{}",
                format!("Edit roles: {}", screen.edit_roles().route()).dimmed()
            );
            if let Some(modal) = screen.modal() {
                print_modal(modal);
            }
        }
    }

    Ok(match screen.view() {
        DetailView::Cards(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn cmd_reset(wizard: &Wizard) -> Result<ExitCode> {
    wizard.store.clear()?;
    match wizard.format {
        OutputFormat::Json => print_json(&serde_json::json!({ "cleared": true }))?,
        OutputFormat::Pretty => println!("{} Session cleared", "OK".green()),
    }
    Ok(ExitCode::SUCCESS)
}

/// Index of the skill named `name` on 1-based `card`, ignoring case
fn skill_index(screen: &DetailScreen, card: usize, name: &str) -> Option<usize> {
    let DetailView::Cards(cards) = screen.view() else {
        return None;
    };
    cards
        .get(card.checked_sub(1)?)?
        .tags()
        .position(|tag| tag.eq_ignore_ascii_case(name))
}

// =============================================================================
// RENDERING
// =============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}

fn print_panel(panel: &SearchPanel) {
    let Some(message) = panel.message() else {
        return;
    };
    match panel {
        SearchPanel::ExactMatch(_) | SearchPanel::Selected(_) => println!("  {}", message.green()),
        SearchPanel::ConnectionError => println!("  {}", message.red()),
        SearchPanel::NoMatches => println!("  {}", message.yellow()),
        _ => println!("  {}", message),
    }
    for (i, candidate) in panel.candidates().iter().enumerate() {
        println!(
            "  [{}] {} {}",
            i + 1,
            candidate.role,
            format!("({}%)", candidate.percent).dimmed()
        );
    }
}

fn print_path(path: &RenderedPath) {
    println!("{}", path.summary);
    if let Some(confidence) = path.confidence {
        println!("{}", format!("Overall likelihood: {}%", confidence).dimmed());
    }
    println!();

    for item in &path.items {
        match item {
            PathItem::Node { category, label } => {
                let label = match category {
                    NodeCategory::Current => label.cyan().bold(),
                    NodeCategory::Milestone => label.normal(),
                    NodeCategory::Target => label.green().bold(),
                };
                println!("  {}  {}", label, category.caption().dimmed());
            }
            PathItem::Arrow { percent, count } => {
                let moves = count
                    .map(|c| format!(" ({} moves)", c))
                    .unwrap_or_default();
                println!("    │ {}%{}", percent, moves.dimmed());
                println!("    ▼");
            }
        }
    }
}

fn print_card(card: &StepCard) {
    println!(
        "{} {}  {}",
        card.toggle_glyph(),
        card.badge().dimmed(),
        card.title().bold()
    );
    if !card.expanded {
        return;
    }
    println!("    {}", card.why);
    println!("    {}", card.skills_heading().underline());
    let tags: Vec<&str> = card.tags().collect();
    println!("    {}", tags.join(" · ").cyan());
    println!();
}

fn print_modal(modal: &SkillModal) {
    println!();
    println!("{}", modal.title.bold().underline());
    println!("{} {}", "What:".bold(), modal.what);
    println!("{} {}", "Why:".bold(), modal.why);
    println!("{}", "Resources:".bold());
    for resource in &modal.resources {
        println!("  [{}] {}", resource.category.label(), resource.text);
    }
}
