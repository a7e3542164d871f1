use std::collections::HashSet;
use std::ops::Range;

use crate::config::PackerConfig;
use crate::grid::OccupancyGrid;
use crate::strategy::{Request, Strategy};
use crate::types::{Item, Mode, Packing, Placement, clamp_weight};

/// An item after clamping, waiting for a spot.
#[derive(Debug, Clone)]
struct Tile<'a> {
    id: &'a str,
    size: u32,
    rank: f64,
}

/// State of one packing run. Dropped as soon as the `Packing` is built.
struct Run<'a> {
    grid: OccupancyGrid,
    placements: Vec<Placement>,
    placed: HashSet<&'a str>,
}

impl<'a> Run<'a> {
    fn try_place(&mut self, tile: &Tile<'a>, request: &Request, strategies: &[Strategy]) -> bool {
        let Some((strategy, spot)) = Strategy::first_hit(strategies, &self.grid, request) else {
            return false;
        };
        tracing::debug!(
            id = tile.id,
            %strategy,
            row = spot.row,
            col = spot.col,
            size = spot.size,
            "placed tile"
        );
        self.grid.occupy(spot);
        self.placements.push(Placement {
            id: tile.id.to_string(),
            row: spot.row,
            col: spot.col,
            size: spot.size,
            requested: tile.size,
        });
        self.placed.insert(tile.id);
        true
    }
}

pub struct Packer {
    config: PackerConfig,
    mode: Mode,
}

impl Packer {
    pub fn new(config: PackerConfig, mode: Mode) -> Self {
        Self { config, mode }
    }

    pub fn pack(&self, items: &[Item]) -> Packing {
        let rows = self.config.rows(self.mode);
        let tiles = self.prepare(items);

        if let Err(e) = self.config.validate() {
            tracing::warn!(error = %e, "unusable packer config, dropping all tiles");
            return Packing {
                mode: self.mode,
                columns: self.config.columns,
                rows,
                visible_rows: self.config.visible_rows,
                placements: Vec::new(),
                dropped: tiles.iter().map(|t| t.id.to_string()).collect(),
            };
        }

        let mut run = Run {
            grid: OccupancyGrid::new(self.config.columns, rows),
            placements: Vec::with_capacity(tiles.len()),
            placed: HashSet::with_capacity(tiles.len()),
        };

        let (large, small): (Vec<&Tile>, Vec<&Tile>) = tiles
            .iter()
            .partition(|t| t.size >= self.config.large_threshold);

        // Large tiles claim the top-left before small ones fragment it.
        for tile in &large {
            run.try_place(tile, &Request::new(tile.size, 0..rows), &Strategy::CHAIN);
        }

        match self.mode {
            Mode::Compact => {
                for tile in &small {
                    run.try_place(tile, &Request::new(tile.size, 0..rows), &Strategy::CHAIN);
                }
            }
            Mode::Expanded => self.place_small_expanded(&mut run, &small),
        }

        let mut dropped = Vec::new();
        if run.placements.len() < tiles.len() {
            tracing::warn!(
                unplaced = tiles.len() - run.placements.len(),
                free_cells = run.grid.free_cells(),
                "some tiles could not be placed, using fallback placement"
            );
            let unplaced: Vec<&Tile> = tiles
                .iter()
                .filter(|t| !run.placed.contains(t.id))
                .collect();
            for tile in unplaced {
                let request = Request::new(1, 0..rows);
                if !run.try_place(tile, &request, &[Strategy::Fallback]) {
                    tracing::warn!(id = tile.id, "grid is full, dropping tile");
                    dropped.push(tile.id.to_string());
                }
            }
        }

        tracing::info!(
            mode = %self.mode,
            arranged = run.placements.len(),
            total = tiles.len(),
            "arranged tiles"
        );

        Packing {
            mode: self.mode,
            columns: self.config.columns,
            rows,
            visible_rows: self.config.visible_rows,
            placements: run.placements,
            dropped,
        }
    }

    /// Clamps, de-duplicates and orders the input: size descending, then rank
    /// descending. The sort is stable, so exact ties keep input order.
    fn prepare<'a>(&self, items: &'a [Item]) -> Vec<Tile<'a>> {
        let max_size = self.config.max_size(self.mode);
        let mut seen = HashSet::with_capacity(items.len());
        let mut tiles: Vec<Tile> = items
            .iter()
            .filter(|item| {
                let fresh = seen.insert(item.id.as_str());
                if !fresh {
                    tracing::warn!(id = %item.id, "duplicate tile id, keeping the first");
                }
                fresh
            })
            .map(|item| Tile {
                id: &item.id,
                size: clamp_weight(item.weight, max_size),
                rank: item.rank,
            })
            .collect();
        tiles.sort_by(|a, b| {
            b.size
                .cmp(&a.size)
                .then_with(|| b.rank.total_cmp(&a.rank))
        });
        tiles
    }

    /// In expanded mode the first batch of small tiles fills whatever the
    /// collapsed rows have left, keeping the default view dense. The rest,
    /// plus anything from that batch that did not fit, go below the fold.
    fn place_small_expanded<'a>(&self, run: &mut Run<'a>, small: &[&Tile<'a>]) {
        let rows = run.grid.rows();
        let collapsed: Range<usize> = 0..self.config.collapsed_rows.min(rows);
        let below = collapsed.end..rows;

        let fill = run.grid.fill_ratio(collapsed.clone());
        let cap = if fill < self.config.collapsed_fill_threshold {
            self.config.collapsed_soft_cap
        } else {
            tracing::debug!(fill, "collapsed rows already dense, skipping top pass");
            0
        };

        let mut deferred = Vec::new();
        for (i, tile) in small.iter().enumerate() {
            let request = Request::new(tile.size, collapsed.clone());
            if i < cap && run.try_place(tile, &request, &Strategy::CHAIN) {
                continue;
            }
            deferred.push(*tile);
        }

        for tile in deferred {
            let request = Request::new(tile.size, below.clone()).with_overflow(collapsed.clone());
            run.try_place(tile, &request, &Strategy::CHAIN);
        }
    }
}

/// Packs `items` with the default twelve-column configuration.
pub fn pack(items: &[Item], mode: Mode) -> Packing {
    Packer::new(PackerConfig::default(), mode).pack(items)
}
