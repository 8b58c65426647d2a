//! Steering-behavior flock simulation.
//!
//! Agents ("birds") steer by a weighted sum of cohesion, separation,
//! alignment, wall, obstacle and predator avoidance. Predators hunt and eat
//! prey instead of flocking. A [`Flock`] owns every entity and advances them
//! one frame per [`Flock::simulate`] call; [`FlockController`] adds the
//! population and tuning controls a driver needs.

pub mod agent;
pub mod behavior;
pub mod controller;
pub mod entity;
pub mod flock;
pub mod vector;

pub use agent::{Agent, Profile, Steering, Strengths};
pub use controller::FlockController;
pub use entity::{Bounds, Entity, Obstacle};
pub use flock::Flock;
pub use flock_shared::{
    AgentSnapshot, FlockSettings, FlockStatus, PredatorSettings, Species, SpeciesSettings,
};
pub use vector::Vector2;
