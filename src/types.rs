use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Compact,
    Expanded,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Compact => write!(f, "compact"),
            Mode::Expanded => write!(f, "expanded"),
        }
    }
}

/// A tile asking for a square of `weight × weight` cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default, alias = "size", deserialize_with = "deserialize_weight")]
    pub weight: f64,
    #[serde(default, alias = "marketCap")]
    pub rank: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "change24h")]
    pub change_24h: f64,
}

impl Item {
    pub fn new(id: impl Into<String>, weight: f64, rank: f64) -> Self {
        Self {
            id: id.into(),
            weight,
            rank,
            name: None,
            change_24h: 0.0,
        }
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Floors `weight` and clamps it into `[1, max]`. NaN maps to 1.
pub fn clamp_weight(weight: f64, max: u32) -> u32 {
    if weight.is_nan() {
        return 1;
    }
    weight.floor().clamp(1.0, max.max(1) as f64) as u32
}

/// Accepts any JSON value for a weight; anything that is not a number becomes NaN
/// and is later clamped to the smallest size.
pub fn deserialize_weight<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or(f64::NAN))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub id: String,
    pub row: usize,
    pub col: usize,
    /// Size actually granted; may be below `requested` after a downgrade.
    pub size: u32,
    pub requested: u32,
}

impl Placement {
    pub fn bottom(&self) -> usize {
        self.row + self.size as usize
    }

    pub fn right(&self) -> usize {
        self.col + self.size as usize
    }

    pub fn area(&self) -> u64 {
        self.size as u64 * self.size as u64
    }

    pub fn overlaps(&self, other: &Placement) -> bool {
        self.row < other.bottom()
            && other.row < self.bottom()
            && self.col < other.right()
            && other.col < self.right()
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}x{} @ ({}, {})",
            self.id, self.size, self.size, self.row, self.col
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packing {
    pub mode: Mode,
    pub columns: usize,
    pub rows: usize,
    pub visible_rows: usize,
    pub placements: Vec<Placement>,
    pub dropped: Vec<String>,
}

impl Packing {
    pub fn arranged_count(&self) -> usize {
        self.placements.len()
    }

    /// Placements shown before the user expands the view. Compact mode keeps
    /// only tiles lying entirely within the visible rows.
    pub fn visible(&self) -> Vec<&Placement> {
        match self.mode {
            Mode::Expanded => self.placements.iter().collect(),
            Mode::Compact => self
                .placements
                .iter()
                .filter(|p| p.bottom() <= self.visible_rows)
                .collect(),
        }
    }

    /// How many items an expand control should advertise.
    pub fn hidden_count(&self, total_items: usize) -> usize {
        total_items.saturating_sub(self.visible().len())
    }

    pub fn used_cells(&self) -> u64 {
        self.placements.iter().map(|p| p.area()).sum()
    }

    pub fn fill_percent(&self) -> f64 {
        let total = self.columns as u64 * self.rows as u64;
        if total == 0 {
            return 0.0;
        }
        self.used_cells() as f64 / total as f64 * 100.0
    }
}
