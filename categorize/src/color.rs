//! Group colors and random color selection.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::CategorizeError;

/// Colors a tab group can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

impl GroupColor {
    /// The palette, in its fixed order.
    pub const ALL: [GroupColor; 9] = [
        GroupColor::Grey,
        GroupColor::Blue,
        GroupColor::Red,
        GroupColor::Yellow,
        GroupColor::Green,
        GroupColor::Pink,
        GroupColor::Purple,
        GroupColor::Cyan,
        GroupColor::Orange,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GroupColor::Grey => "grey",
            GroupColor::Blue => "blue",
            GroupColor::Red => "red",
            GroupColor::Yellow => "yellow",
            GroupColor::Green => "green",
            GroupColor::Pink => "pink",
            GroupColor::Purple => "purple",
            GroupColor::Cyan => "cyan",
            GroupColor::Orange => "orange",
        }
    }
}

impl fmt::Display for GroupColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupColor {
    type Err = CategorizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupColor::ALL
            .into_iter()
            .find(|color| color.as_str() == s)
            .ok_or_else(|| CategorizeError::UnknownColor(s.to_string()))
    }
}

/// Picks group colors, preferring ones not handed out yet.
#[derive(Debug)]
pub struct ColorPicker {
    used: HashSet<GroupColor>,
    rng: StdRng,
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPicker {
    /// Create a picker seeded from the operating system.
    pub fn new() -> Self {
        Self {
            used: HashSet::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a picker with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            used: HashSet::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Record a color as taken.
    pub fn mark_used(&mut self, color: GroupColor) {
        self.used.insert(color);
    }

    pub fn is_used(&self, color: GroupColor) -> bool {
        self.used.contains(&color)
    }

    /// Pick a color uniformly among unused ones, or among the whole palette
    /// once every color is taken. The pick is marked as used.
    pub fn pick(&mut self) -> GroupColor {
        let available: Vec<GroupColor> = GroupColor::ALL
            .into_iter()
            .filter(|color| !self.used.contains(color))
            .collect();

        let color = if available.is_empty() {
            GroupColor::ALL[self.rng.random_range(0..GroupColor::ALL.len())]
        } else {
            available[self.rng.random_range(0..available.len())]
        };

        self.used.insert(color);
        color
    }
}
