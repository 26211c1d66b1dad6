//! Extract a transition catalog from annotated sample maps
//!
//! ```text
//! extract_transitions --groups groups.json --output transitions.json maps/*.json
//! ```

use bevy_map_transition::{
    export_transitions, extract_files, TransitionError, TransitionSettings, TransitiveGroup,
};
use clap::Parser;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "extract_transitions")]
#[command(author, version, about = "Learn tile transitions from annotated sample maps")]
struct Cli {
    /// Sample map files (JSON)
    #[arg(value_name = "MAPS", required = true)]
    maps: Vec<PathBuf>,

    /// Tile group table (JSON)
    #[arg(short, long)]
    groups: PathBuf,

    /// Where to write the transition catalog (JSON)
    #[arg(short, long, default_value = "transitions.json")]
    output: PathBuf,

    /// Resolver settings (TOML), used for the transitive chain report
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Distinct transitions two groups need to be drawn directly
    #[arg(long)]
    valid_transitions: Option<usize>,
}

fn main() -> Result<(), TransitionError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => TransitionSettings::load(path)?,
        None => TransitionSettings::default(),
    };
    if let Some(valid_transitions) = cli.valid_transitions {
        settings.valid_transitions = valid_transitions;
    }

    let catalog = extract_files(&cli.groups, &cli.maps)?;
    export_transitions(&catalog, &cli.output)?;

    let links = catalog.group_links();
    let pairs: BTreeSet<(&str, &str)> = links
        .iter()
        .filter(|link| link.group_in < link.group_out)
        .map(|link| (link.group_in.as_str(), link.group_out.as_str()))
        .collect();
    for (a, b) in pairs {
        let missing = catalog.missing_types(a, b);
        if missing.is_empty() {
            info!("{} / {}: complete", a, b);
        } else {
            let names: Vec<&str> = missing.iter().map(|kind| kind.name()).collect();
            warn!("{} / {}: no tile for {}", a, b, names.join(", "));
        }
    }

    let transitive = TransitiveGroup::new(&catalog, settings.valid_transitions);
    let mut chains: Vec<_> = transitive.chains().collect();
    chains.sort_by(|a, b| a.0.cmp(b.0));
    for (pair, chain) in chains {
        let hops: Vec<String> = chain.iter().map(|hop| hop.to_string()).collect();
        info!("{} goes through {}", pair, hops.join(", "));
    }

    Ok(())
}
