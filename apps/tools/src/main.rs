use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use registration::{
    list_colleges, list_games, StaticCatalog, WizardAction, WizardState, DEFAULT_HANDOFF_ROUTE,
    GAME_ADVANCE_DELAY,
};
use tournament_counts::{
    source::{DEFAULT_COLLECTION, DEFAULT_STORE_URL},
    CountBoard, DocumentStoreConfig, DocumentStoreSource, GameRuleTable, RecordListSource,
    TournamentSource,
};

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum CatalogKind {
    Colleges,
    Games,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a catalog in display order.
    Catalog { kind: CatalogKind },
    /// Drive the registration wizard from landing to confirmation.
    Walk {
        #[arg(long)]
        college: String,
        #[arg(long)]
        game: String,
        #[arg(long, default_value = DEFAULT_HANDOFF_ROUTE)]
        handoff_route: String,
        /// Skip the pause shown after picking a game.
        #[arg(long)]
        no_delay: bool,
    },
    /// Fetch per-game tournament counts.
    Counts {
        #[arg(long, default_value = DEFAULT_STORE_URL)]
        store_url: String,
        #[arg(long, required_unless_present = "fixture")]
        project: Option<String>,
        #[arg(long, default_value = DEFAULT_COLLECTION)]
        collection: String,
        #[arg(long)]
        api_key: Option<String>,
        /// Read records from a JSON array file instead of the store.
        #[arg(long, conflicts_with = "project")]
        fixture: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();
    let cli = Cli::parse();

    match cli.command {
        Command::Catalog { kind } => {
            let entries = match kind {
                CatalogKind::Colleges => list_colleges(),
                CatalogKind::Games => list_games(),
            };
            for entry in entries {
                println!("{:<10} {:<32} {}", entry.id, entry.display_name, entry.logo_asset);
            }
        }
        Command::Walk {
            college,
            game,
            handoff_route,
            no_delay,
        } => {
            let catalog = StaticCatalog;
            let mut state = WizardState::new();
            println!("step: {:?}", state.step());

            for action in [
                WizardAction::ContinueFromLanding,
                WizardAction::SelectCollege { id: college },
                WizardAction::SelectGame { id: game },
            ] {
                let is_game = matches!(action, WizardAction::SelectGame { .. });
                state = state
                    .apply(&catalog, &action)
                    .with_context(|| format!("wizard rejected {action:?}"))?;
                if is_game && !no_delay {
                    tokio::time::sleep(GAME_ADVANCE_DELAY).await;
                }
                println!("step: {:?}", state.step());
            }

            let selection = state
                .submission(&handoff_route)
                .context("wizard did not reach confirmation")?;
            println!("{}", serde_json::to_string_pretty(&selection)?);
        }
        Command::Counts {
            store_url,
            project,
            collection,
            api_key,
            fixture,
        } => {
            let source: Arc<dyn TournamentSource> = match (fixture, project) {
                (Some(path), _) => {
                    let raw = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    Arc::new(RecordListSource::from_json(&raw)?)
                }
                (None, Some(project)) => {
                    let mut config = DocumentStoreConfig::new(store_url, project);
                    config.collection = collection;
                    config.api_key = api_key;
                    Arc::new(
                        DocumentStoreSource::new(config)
                            .context("failed to build document store client")?,
                    )
                }
                (None, None) => anyhow::bail!("either --project or --fixture is required"),
            };

            let board = CountBoard::new(GameRuleTable::standard());
            board.refresh(source.as_ref()).await;
            for (game, count) in board.counts().await.iter() {
                println!("{game:<10} {count}");
            }
        }
    }

    Ok(())
}
