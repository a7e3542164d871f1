use std::ops::Range;

use crate::grid::{OccupancyGrid, Spot};

/// Where and how large a single item wants to be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub size: u32,
    /// Anchor rows scanned first.
    pub preferred: Range<usize>,
    /// Anchor rows retried when the preferred rows have no room.
    pub overflow: Option<Range<usize>>,
}

impl Request {
    pub fn new(size: u32, preferred: Range<usize>) -> Self {
        Self {
            size,
            preferred,
            overflow: None,
        }
    }

    pub fn with_overflow(mut self, overflow: Range<usize>) -> Self {
        self.overflow = Some(overflow);
        self
    }

    fn scan(&self, grid: &OccupancyGrid, size: u32) -> Option<Spot> {
        grid.first_fit(size, self.preferred.clone())
    }

    fn scan_overflow(&self, grid: &OccupancyGrid, size: u32) -> Option<Spot> {
        self.overflow
            .as_ref()
            .and_then(|rows| grid.first_fit(size, rows.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Requested size, preferred rows.
    PreferredRegion,
    /// Requested size, overflow rows.
    Overflow,
    /// Each smaller size down to 1, preferred rows then overflow rows.
    Downgrade,
    /// A single cell anywhere in the grid.
    Fallback,
}

impl Strategy {
    /// Chain used for every item during the structured phases.
    pub const CHAIN: [Strategy; 3] = [
        Strategy::PreferredRegion,
        Strategy::Overflow,
        Strategy::Downgrade,
    ];

    pub fn find(self, grid: &OccupancyGrid, request: &Request) -> Option<Spot> {
        match self {
            Strategy::PreferredRegion => request.scan(grid, request.size),
            Strategy::Overflow => request.scan_overflow(grid, request.size),
            Strategy::Downgrade => (1..request.size)
                .rev()
                .find_map(|s| request.scan(grid, s).or_else(|| request.scan_overflow(grid, s))),
            Strategy::Fallback => grid.first_fit(1, 0..grid.rows()),
        }
    }

    /// Runs `strategies` in order and returns the first spot found.
    pub fn first_hit(
        strategies: &[Strategy],
        grid: &OccupancyGrid,
        request: &Request,
    ) -> Option<(Strategy, Spot)> {
        strategies
            .iter()
            .find_map(|&s| s.find(grid, request).map(|spot| (s, spot)))
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::PreferredRegion => "preferred-region",
            Strategy::Overflow => "overflow",
            Strategy::Downgrade => "downgrade",
            Strategy::Fallback => "fallback",
        };
        f.write_str(name)
    }
}
