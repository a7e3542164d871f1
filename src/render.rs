use std::collections::HashMap;

use serde::Serialize;

use crate::types::{Item, Packing, Placement};

const CELL_WIDTH: usize = 6;
const CELL_HEIGHT: usize = 2;

/// Colour bucket of a tile, from its 24h change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shade {
    StrongLoss,
    Loss,
    MildLoss,
    SlightLoss,
    Neutral,
    SlightGain,
    MildGain,
    Gain,
    StrongGain,
}

impl Shade {
    pub fn from_change(change: f64) -> Self {
        if change < -10.0 {
            Shade::StrongLoss
        } else if change < -5.0 {
            Shade::Loss
        } else if change < -2.0 {
            Shade::MildLoss
        } else if change < 0.0 {
            Shade::SlightLoss
        } else if change > 10.0 {
            Shade::StrongGain
        } else if change > 5.0 {
            Shade::Gain
        } else if change > 2.0 {
            Shade::MildGain
        } else if change > 0.0 {
            Shade::SlightGain
        } else {
            Shade::Neutral
        }
    }

    /// One-character marker used in the ASCII layout.
    pub fn glyph(self) -> char {
        match self {
            Shade::StrongLoss | Shade::Loss => '-',
            Shade::MildLoss | Shade::SlightLoss => '.',
            Shade::Neutral => ' ',
            Shade::SlightGain | Shade::MildGain => ':',
            Shade::Gain | Shade::StrongGain => '+',
        }
    }
}

/// Draws the packed grid as ASCII art, one box per tile with its label and
/// 24h change.
pub fn render_packing(packing: &Packing, items: &[Item]) -> String {
    let by_id: HashMap<&str, &Item> = items.iter().map(|it| (it.id.as_str(), it)).collect();
    let used_rows = packing
        .placements
        .iter()
        .map(Placement::bottom)
        .max()
        .unwrap_or(0);

    let grid_w = packing.columns * CELL_WIDTH;
    let grid_h = used_rows * CELL_HEIGHT;
    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];
    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for p in &packing.placements {
        let sx = p.col * CELL_WIDTH;
        let sy = p.row * CELL_HEIGHT;
        let sw = p.size as usize * CELL_WIDTH;
        let sh = p.size as usize * CELL_HEIGHT;
        draw_rect(&mut grid, sx, sy, sw, sh);

        let (label, change) = match by_id.get(p.id.as_str()) {
            Some(item) => (item.label().to_string(), item.change_24h),
            None => (p.id.clone(), 0.0),
        };
        write_centered(&mut grid, sx, sy, sw, sh, sy + sh / 2, &label);
        if sh > 2 {
            let text = format!("{}{:+.1}%", Shade::from_change(change).glyph(), change);
            write_centered(&mut grid, sx, sy, sw, sh, sy + sh / 2 + 1, text.trim_start());
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

/// Writes `text` centred on line `y`, clipped to the inside of the box.
fn write_centered(grid: &mut [Vec<char>], sx: usize, sy: usize, sw: usize, sh: usize, y: usize, text: &str) {
    if y <= sy || y >= sy + sh || sw < 2 {
        return;
    }
    let room = sw - 1;
    let chars: Vec<char> = text.chars().take(room).collect();
    let start_x = sx + 1 + (room - chars.len()) / 2;
    for (i, &ch) in chars.iter().enumerate() {
        grid[y][start_x + i] = ch;
    }
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = if rows > 0 { grid[0].len() } else { return };

    // Horizontal edges
    for j in [y, y + h] {
        if let Some(line) = grid.get_mut(j) {
            for cell in line.iter_mut().skip(x).take(w + 1) {
                *cell = if matches!(*cell, '|' | '+') { '+' } else { '-' };
            }
        }
    }

    // Vertical edges
    for line in grid.iter_mut().skip(y).take(h + 1) {
        for i in [x, x + w] {
            if let Some(cell) = line.get_mut(i) {
                *cell = if matches!(*cell, '-' | '+') { '+' } else { '|' };
            }
        }
    }

    // Corners
    for &cx in &[x, x + w] {
        for &cy in &[y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;

    fn packing(placements: Vec<Placement>) -> Packing {
        Packing {
            mode: Mode::Compact,
            columns: 12,
            rows: 12,
            visible_rows: 12,
            placements,
            dropped: vec![],
        }
    }

    fn placement(id: &str, row: usize, col: usize, size: u32) -> Placement {
        Placement {
            id: id.to_string(),
            row,
            col,
            size,
            requested: size,
        }
    }

    #[test]
    fn test_shade_buckets() {
        assert_eq!(Shade::from_change(-12.0), Shade::StrongLoss);
        assert_eq!(Shade::from_change(-10.0), Shade::Loss);
        assert_eq!(Shade::from_change(-3.0), Shade::MildLoss);
        assert_eq!(Shade::from_change(-0.5), Shade::SlightLoss);
        assert_eq!(Shade::from_change(0.0), Shade::Neutral);
        assert_eq!(Shade::from_change(1.0), Shade::SlightGain);
        assert_eq!(Shade::from_change(2.5), Shade::MildGain);
        assert_eq!(Shade::from_change(10.0), Shade::Gain);
        assert_eq!(Shade::from_change(10.1), Shade::StrongGain);
    }

    #[test]
    fn test_render_single_tile() {
        let mut item = Item::new("defi", 3.0, 1.0);
        item.name = Some("DeFi".to_string());
        item.change_24h = 4.3;
        let output = render_packing(&packing(vec![placement("defi", 0, 0, 3)]), &[item]);
        assert!(output.contains('+'));
        assert!(output.contains('-'));
        assert!(output.contains('|'));
        assert!(output.contains("DeFi"));
        assert!(output.contains(":+4.3%"));
        // Border spans the full width, tile occupies three rows.
        assert_eq!(output.lines().count(), 3 * CELL_HEIGHT + 1);
        assert_eq!(output.lines().next().unwrap().len(), 12 * CELL_WIDTH + 1);
    }

    #[test]
    fn test_render_unit_tile_truncates_label() {
        let output = render_packing(
            &packing(vec![placement("artificial-intelligence", 0, 0, 1)]),
            &[],
        );
        assert!(output.contains("artif"));
        assert!(!output.contains("artificial"));
    }

    #[test]
    fn test_render_shared_edges_join() {
        let output = render_packing(
            &packing(vec![placement("a", 0, 0, 1), placement("b", 0, 1, 1)]),
            &[],
        );
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("+-----+-----+-----"));
        assert!(lines[1].starts_with("|  a  |  b  |"));
        assert!(lines[2].starts_with("+-----+-----+-----"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_packing(&packing(vec![]), &[]), "");
    }
}
