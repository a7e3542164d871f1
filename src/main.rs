use std::path::PathBuf;

use clap::Parser;
use heatmap_packer::config::PackerConfig;
use heatmap_packer::input::read_items;
use heatmap_packer::render::{self, Shade};
use heatmap_packer::types::{Item, Mode};
use heatmap_packer::Packer;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "heatmap_packer",
    about = "Lay out heatmap tiles on a twelve-column grid"
)]
struct Cli {
    /// JSON array of items ({"id", "size", "marketCap", ...}), or - for stdin
    items: PathBuf,

    /// Pack for the expanded view instead of the compact one
    #[arg(long)]
    expanded: bool,

    /// TOML file overriding the default grid settings
    #[arg(long, env = "PACKER_CONFIG")]
    config: Option<PathBuf>,

    /// Show ASCII layout of the grid
    #[arg(long)]
    layout: bool,

    /// Print the packing as JSON
    #[arg(long)]
    json: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PackerConfig::load(path).unwrap_or_else(|e| fail(e)),
        None => PackerConfig::default(),
    };
    let items: Vec<Item> = read_items(&cli.items).unwrap_or_else(|e| fail(e));

    let mode = if cli.expanded {
        Mode::Expanded
    } else {
        Mode::Compact
    };
    let packing = Packer::new(config, mode).pack(&items);

    if cli.json {
        match serde_json::to_string_pretty(&packing) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(e),
        }
        return;
    }

    println!("{} grid {}x{}:", mode, packing.columns, packing.rows);
    for p in &packing.placements {
        let shade = items
            .iter()
            .find(|it| it.id == p.id)
            .map(|it| Shade::from_change(it.change_24h))
            .unwrap_or(Shade::Neutral);
        let shrunk = if p.size < p.requested {
            format!(" [shrunk from {}]", p.requested)
        } else {
            String::new()
        };
        println!("  {}{} {:?}", p, shrunk, shade);
    }
    for id in &packing.dropped {
        println!("  {} [dropped]", id);
    }
    if cli.layout {
        print!("{}", render::render_packing(&packing, &items));
    }
    println!();

    let visible = packing.visible().len();
    println!(
        "Summary: {} of {} tile{} arranged, {} visible, {} more behind expand, {:.1}% filled",
        packing.arranged_count(),
        items.len(),
        if items.len() == 1 { "" } else { "s" },
        visible,
        packing.hidden_count(items.len()),
        packing.fill_percent(),
    );
}
