use std::ops::Range;

/// Top-left anchor of a free `size × size` square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spot {
    pub row: usize,
    pub col: usize,
    pub size: u32,
}

/// Row-major occupancy bitmap for a single packing run.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    columns: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![false; columns * rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_available(&self, row: usize, col: usize, size: u32) -> bool {
        let size = size as usize;
        if size == 0 || row + size > self.rows || col + size > self.columns {
            return false;
        }
        (row..row + size).all(|r| {
            let start = r * self.columns + col;
            self.cells[start..start + size].iter().all(|&c| !c)
        })
    }

    /// First anchor in raster order whose row lies in `rows`.
    pub fn first_fit(&self, size: u32, rows: Range<usize>) -> Option<Spot> {
        let end = rows.end.min(self.rows);
        for row in rows.start..end {
            for col in 0..self.columns {
                if self.is_available(row, col, size) {
                    return Some(Spot { row, col, size });
                }
            }
        }
        None
    }

    /// Marks a spot as taken. Occupied cells stay occupied for the rest of the run.
    pub fn occupy(&mut self, spot: Spot) {
        let size = spot.size as usize;
        for r in spot.row..spot.row + size {
            let start = r * self.columns + spot.col;
            self.cells[start..start + size].fill(true);
        }
    }

    pub fn free_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| !c).count()
    }

    pub fn occupied_in(&self, rows: Range<usize>) -> usize {
        let end = rows.end.min(self.rows);
        if rows.start >= end {
            return 0;
        }
        self.cells[rows.start * self.columns..end * self.columns]
            .iter()
            .filter(|&&c| c)
            .count()
    }

    /// Share of occupied cells within `rows`, in `[0, 1]`.
    pub fn fill_ratio(&self, rows: Range<usize>) -> f64 {
        let end = rows.end.min(self.rows);
        let total = end.saturating_sub(rows.start) * self.columns;
        if total == 0 {
            return 1.0;
        }
        self.occupied_in(rows) as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_single_tile() {
        let mut grid = OccupancyGrid::new(12, 12);
        let spot = grid.first_fit(3, 0..12).unwrap();
        assert_eq!(spot, Spot { row: 0, col: 0, size: 3 });
        grid.occupy(spot);
        assert_eq!(grid.free_cells(), 144 - 9);
        assert!(!grid.is_available(2, 2, 1));
        assert!(grid.is_available(3, 3, 1));
    }

    #[test]
    fn test_tile_too_large() {
        let grid = OccupancyGrid::new(12, 12);
        assert!(grid.first_fit(13, 0..12).is_none());
        assert!(!grid.is_available(0, 6, 7));
        assert!(!grid.is_available(0, 0, 0));
    }

    #[test]
    fn test_raster_order() {
        let mut grid = OccupancyGrid::new(12, 12);
        grid.occupy(Spot { row: 0, col: 0, size: 4 });
        // Row 0 still has room to the right of the first tile.
        assert_eq!(
            grid.first_fit(4, 0..12),
            Some(Spot { row: 0, col: 4, size: 4 })
        );
        grid.occupy(Spot { row: 0, col: 4, size: 4 });
        grid.occupy(Spot { row: 0, col: 8, size: 4 });
        assert_eq!(
            grid.first_fit(4, 0..12),
            Some(Spot { row: 4, col: 0, size: 4 })
        );
    }

    #[test]
    fn test_row_range_restricts_anchor() {
        let grid = OccupancyGrid::new(12, 36);
        assert_eq!(
            grid.first_fit(2, 12..36),
            Some(Spot { row: 12, col: 0, size: 2 })
        );
        // A 5x5 square anchored at row 10 would cross row 12, but the range only
        // restricts where the anchor sits.
        assert_eq!(
            grid.first_fit(5, 10..11),
            Some(Spot { row: 10, col: 0, size: 5 })
        );
        assert!(grid.first_fit(1, 36..40).is_none());
    }

    #[test]
    fn test_fill_ratio() {
        let mut grid = OccupancyGrid::new(12, 36);
        grid.occupy(Spot { row: 0, col: 0, size: 6 });
        assert_eq!(grid.occupied_in(0..12), 36);
        assert!((grid.fill_ratio(0..12) - 0.25).abs() < 1e-9);
        assert_eq!(grid.fill_ratio(12..36), 0.0);
        assert_eq!(grid.fill_ratio(40..50), 1.0);
    }
}
