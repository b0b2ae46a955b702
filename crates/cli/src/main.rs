//! Route optimizer command line.
//!
//! Reads `<SAVE_DIR>/world.ron` (and `<SAVE_DIR>/game.toml` when present),
//! searches for the fastest routes through the game and prints them to
//! stdout. Diagnostics go to stderr through `tracing`; set `RUST_LOG` (or a
//! `.env` file) to change the filter.
//!
//! ```bash
//! mim-router saves/demo --routes 3 --heuristic underestimating
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use mim_content::{ConfigLoader, WorldLoader};
use mim_core::Route;
use mim_router::{GeneratorKind, HeuristicKind, OptimizerConfig, RouteOptimizer};

const WORLD_FILE: &str = "world.ron";
const CONFIG_FILE: &str = "game.toml";

/// Find time-optimal routes through Mario is Missing
#[derive(Parser)]
#[command(name = "mim-router")]
#[command(about = "Time-optimal route search for Mario is Missing", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding world.ron and an optional game.toml
    #[arg(value_name = "SAVE_DIR")]
    save_dir: PathBuf,

    /// Number of routes to find
    #[arg(short, long, value_name = "N", default_value_t = OptimizerConfig::DEFAULT_MAX_ROUTES)]
    routes: usize,

    /// Cost estimate guiding the search
    #[arg(long, value_enum, default_value = "slightly-better")]
    heuristic: HeuristicArg,

    /// Strategy proposing candidate actions
    #[arg(long, value_enum, default_value = "default")]
    generator: GeneratorArg,

    /// Maximum frontier pops per search tier
    #[arg(long, value_name = "N")]
    node_budget: Option<u64>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum HeuristicArg {
    /// Admissible estimate with per-koopa stomp penalties
    SlightlyBetter,
    /// Baseline estimate that ignores travel
    Underestimating,
}

impl From<HeuristicArg> for HeuristicKind {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::SlightlyBetter => HeuristicKind::SlightlyBetter,
            HeuristicArg::Underestimating => HeuristicKind::Underestimating,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum GeneratorArg {
    /// Every level entrance in the hub
    Default,
    /// Levels taken inward from both ends of the floor
    NaturalOrder,
}

impl From<GeneratorArg> for GeneratorKind {
    fn from(arg: GeneratorArg) -> Self {
        match arg {
            GeneratorArg::Default => GeneratorKind::Default,
            GeneratorArg::NaturalOrder => GeneratorKind::NaturalOrder,
        }
    }
}

impl Cli {
    fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig::default()
            .with_max_routes(self.routes)
            .with_node_budget(self.node_budget)
            .with_heuristic(self.heuristic.into())
            .with_generator(self.generator.into())
    }

    fn execute(self, out: &mut impl Write) -> Result<()> {
        if !self.save_dir.is_dir() {
            bail!("Save directory {} does not exist", self.save_dir.display());
        }

        let game_config = ConfigLoader::load_or_default(&self.save_dir.join(CONFIG_FILE))?;
        let world = WorldLoader::load(&self.save_dir.join(WORLD_FILE), &game_config)
            .with_context(|| format!("Failed to load save {}", self.save_dir.display()))?;

        let config = self.optimizer_config();
        tracing::info!(
            save = %self.save_dir.display(),
            routes = config.max_routes,
            heuristic = %config.heuristic,
            generator = %config.generator,
            "Starting route search"
        );
        let outcome = RouteOptimizer::new(config).search(world)?;
        tracing::debug!(stats = ?outcome.stats, "Search statistics");

        out.write_all(render_routes(&outcome.routes).as_bytes())?;
        Ok(())
    }
}

fn render_routes(routes: &[Route]) -> String {
    if routes.is_empty() {
        return "Oh, man, this game is impossible!\n".to_string();
    }
    routes
        .iter()
        .enumerate()
        .map(|(i, route)| format!("Route #{i}:\n{route}\n"))
        .collect()
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.execute(&mut std::io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../saves/demo")
    }

    #[test]
    fn defaults_match_optimizer_defaults() {
        let cli = Cli::try_parse_from(["mim-router", "saves/demo"]).unwrap();
        let config = cli.optimizer_config();
        assert_eq!(config, OptimizerConfig::default());
    }

    #[test]
    fn parses_strategy_flags() {
        let cli = Cli::try_parse_from([
            "mim-router",
            "saves/demo",
            "--routes",
            "3",
            "--heuristic",
            "underestimating",
            "--generator",
            "natural-order",
            "--node-budget",
            "500",
        ])
        .unwrap();
        let config = cli.optimizer_config();
        assert_eq!(config.max_routes, 3);
        assert_eq!(config.node_budget, Some(500));
        assert_eq!(config.heuristic, HeuristicKind::Underestimating);
        assert_eq!(config.generator, GeneratorKind::NaturalOrder);
    }

    #[test]
    fn save_dir_is_required() {
        assert!(Cli::try_parse_from(["mim-router"]).is_err());
    }

    #[test]
    fn missing_save_dir_is_an_error() {
        let cli = Cli::try_parse_from(["mim-router", "/nonexistent/mim-save"]).unwrap();
        let err = cli.execute(&mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("does not exist"), "{err}");
    }

    #[test]
    fn no_routes_prints_the_give_up_line() {
        assert_eq!(render_routes(&[]), "Oh, man, this game is impossible!\n");
    }

    #[test]
    fn prints_routes_for_demo_save() {
        let dir = demo_dir();
        let cli =
            Cli::try_parse_from(["mim-router", dir.to_str().unwrap(), "--routes", "1"]).unwrap();

        let mut out = Vec::new();
        cli.execute(&mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Route #0:\nRoute ("), "{printed}");
        assert!(printed.contains("Return artifact 0"), "{printed}");
        assert!(printed.ends_with("\n\n"), "{printed}");
    }
}
