#![cfg_attr(not(feature = "std"), no_std)]

use serde::{Deserialize, Serialize};

/// Tag partitioning agents into flocking groups and predator/prey roles.
///
/// `Red` is reserved for predators. `Yellow` is never hunted; nothing spawns
/// it by default, it exists so a non-prey flock can be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Blue,
    Green,
    Red,
    Yellow,
}

impl Species {
    pub const ALL: [Species; 4] = [Species::Blue, Species::Green, Species::Red, Species::Yellow];

    pub fn is_predator(self) -> bool {
        matches!(self, Species::Red)
    }

    /// Whether a predator may hunt agents of this species.
    pub fn is_prey(self) -> bool {
        match self {
            Species::Blue | Species::Green => true,
            Species::Red | Species::Yellow => false,
        }
    }

    /// Stable slot used for per-species counters.
    pub fn index(self) -> usize {
        match self {
            Species::Blue => 0,
            Species::Green => 1,
            Species::Red => 2,
            Species::Yellow => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Blue => "blue",
            Species::Green => "green",
            Species::Red => "red",
            Species::Yellow => "yellow",
        }
    }
}

/// Tuning for a flocking (non-predator) species
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeciesSettings {
    pub max_speed: f32,
    pub separation_distance: f32,
    pub detection_distance: f32,
    pub separation_strength: f32,
    pub cohesion_strength: f32,
    pub alignment_strength: f32,
    pub avoid_predator_strength: f32,
}

impl SpeciesSettings {
    pub fn blue() -> Self {
        Self {
            max_speed: 4.0,
            separation_distance: 30.0,
            detection_distance: 90.0,
            separation_strength: 1.5,
            cohesion_strength: 0.6,
            alignment_strength: 1.0,
            avoid_predator_strength: 5.0,
        }
    }

    pub fn green() -> Self {
        Self {
            max_speed: 3.0,
            separation_distance: 20.0,
            detection_distance: 50.0,
            separation_strength: 1.5,
            cohesion_strength: 1.0,
            alignment_strength: 1.1,
            avoid_predator_strength: 5.0,
        }
    }

    pub fn yellow() -> Self {
        Self {
            alignment_strength: 1.0,
            ..Self::green()
        }
    }
}

impl Default for SpeciesSettings {
    fn default() -> Self {
        Self::blue()
    }
}

/// Tuning shared by every predator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredatorSettings {
    pub max_speed: f32,
    pub separation_distance: f32,
    pub detection_distance: f32,
    /// Number of prey a predator eats before it is removed.
    pub hunger: i32,
}

impl Default for PredatorSettings {
    fn default() -> Self {
        Self {
            max_speed: 5.0,
            separation_distance: 50.0,
            detection_distance: 200.0,
            hunger: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObstacleSettings {
    pub radius: f32,
}

impl Default for ObstacleSettings {
    fn default() -> Self {
        Self { radius: 5.0 }
    }
}

/// Population spawned by a reset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InitialCounts {
    pub blue: usize,
    pub green: usize,
    pub predators: usize,
    pub obstacles: usize,
}

impl Default for InitialCounts {
    fn default() -> Self {
        Self {
            blue: 50,
            green: 50,
            predators: 0,
            obstacles: 0,
        }
    }
}

/// Complete settings document for a simulation run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub blue: SpeciesSettings,
    pub green: SpeciesSettings,
    pub yellow: SpeciesSettings,
    pub predator: PredatorSettings,
    pub obstacle: ObstacleSettings,
    pub initial: InitialCounts,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            blue: SpeciesSettings::blue(),
            green: SpeciesSettings::green(),
            yellow: SpeciesSettings::yellow(),
            predator: PredatorSettings::default(),
            obstacle: ObstacleSettings::default(),
            initial: InitialCounts::default(),
        }
    }
}

impl FlockSettings {
    /// Settings for a flocking species. Predators are tuned through `predator`,
    /// so `Red` yields `None`.
    pub fn species(&self, species: Species) -> Option<&SpeciesSettings> {
        match species {
            Species::Blue => Some(&self.blue),
            Species::Green => Some(&self.green),
            Species::Yellow => Some(&self.yellow),
            Species::Red => None,
        }
    }

    pub fn species_mut(&mut self, species: Species) -> Option<&mut SpeciesSettings> {
        match species {
            Species::Blue => Some(&mut self.blue),
            Species::Green => Some(&mut self.green),
            Species::Yellow => Some(&mut self.yellow),
            Species::Red => None,
        }
    }

    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[cfg(feature = "std")]
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Per-frame counters reported to a driver
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FlockStatus {
    pub frame: u64,
    pub blue: usize,
    pub green: usize,
    pub predators: usize,
    pub yellow: usize,
    pub obstacles: usize,
    pub paused: bool,
}

impl FlockStatus {
    pub fn agent_total(&self) -> usize {
        self.blue + self.green + self.predators + self.yellow
    }
}

/// What a renderer needs to draw one agent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgentSnapshot {
    pub species: Species,
    pub x: f32,
    pub y: f32,
    /// Radians
    pub heading: f32,
    pub hunger: Option<i32>,
}
