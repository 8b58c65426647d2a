use flock_shared::{AgentSnapshot, PredatorSettings, Species, SpeciesSettings};

use crate::behavior;
use crate::entity::{Bounds, Entity, Obstacle};
use crate::vector::Vector2;

/// Largest magnitude any single capped behavior may return.
pub const DEFAULT_MAX_FORCE: f32 = 0.07;
/// Velocity multiplier applied on frames with no steering force at all.
pub const IDLE_DRIFT: f32 = 1.01;

pub const WALL_WEIGHT: f32 = 5.0;
pub const OBSTACLE_WEIGHT: f32 = 1.5;
pub const PREDATOR_WALL_WEIGHT: f32 = 4.0;
pub const HUNT_WEIGHT: f32 = 3.0;
pub const PREDATOR_OBSTACLE_WEIGHT: f32 = 4.0;

/// Which update routine an agent runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Flocks with its own species and flees predators.
    Standard,
    /// Hunts prey; removed once `hunger` reaches zero.
    Predator { hunger: i32 },
}

/// Relative weights of the strength-scaled behaviors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strengths {
    pub separation: f32,
    pub cohesion: f32,
    pub alignment: f32,
    pub avoid_predator: f32,
}

impl From<&SpeciesSettings> for Strengths {
    fn from(settings: &SpeciesSettings) -> Self {
        Self {
            separation: settings.separation_strength,
            cohesion: settings.cohesion_strength,
            alignment: settings.alignment_strength,
            avoid_predator: settings.avoid_predator_strength,
        }
    }
}

/// Everything an agent decided during the read-only half of its update
#[derive(Debug, Clone, PartialEq)]
pub struct Steering {
    pub force: Vector2,
    pub collided: bool,
    pub out_of_bounds: bool,
    /// Indices, into the slice passed to [`Agent::steering`], of prey caught this frame.
    pub eaten: Vec<usize>,
}

/// A single bird, or a predator when its profile says so
#[derive(Debug, Clone)]
pub struct Agent {
    position: Vector2,
    velocity: Vector2,
    heading: f32,
    max_speed: f32,
    max_force: f32,
    species: Species,
    separation_distance: f32,
    detection_distance: f32,
    strengths: Strengths,
    profile: Profile,
    alive: bool,
}

impl Agent {
    /// A flocking agent moving at full speed along `heading_degrees`.
    /// Red hunters come from [`Agent::predator`].
    pub fn new(
        species: Species,
        position: Vector2,
        heading_degrees: f32,
        settings: &SpeciesSettings,
    ) -> Self {
        Self::with_profile(
            species,
            Profile::Standard,
            position,
            heading_degrees,
            settings.max_speed,
            settings.separation_distance,
            settings.detection_distance,
            Strengths::from(settings),
        )
    }

    /// A red predator. Only its separation strength is kept, and the
    /// predator update never reads it.
    pub fn predator(position: Vector2, heading_degrees: f32, settings: &PredatorSettings) -> Self {
        Self::with_profile(
            Species::Red,
            Profile::Predator {
                hunger: settings.hunger,
            },
            position,
            heading_degrees,
            settings.max_speed,
            settings.separation_distance,
            settings.detection_distance,
            Strengths {
                separation: 1.0,
                cohesion: 0.0,
                alignment: 0.0,
                avoid_predator: 0.0,
            },
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn with_profile(
        species: Species,
        profile: Profile,
        position: Vector2,
        heading_degrees: f32,
        max_speed: f32,
        separation_distance: f32,
        detection_distance: f32,
        strengths: Strengths,
    ) -> Self {
        let heading = heading_degrees.to_radians();
        Self {
            position,
            velocity: Vector2::new(heading.cos(), heading.sin()) * max_speed,
            heading,
            max_speed,
            max_force: DEFAULT_MAX_FORCE,
            species,
            separation_distance,
            detection_distance,
            strengths,
            profile,
            alive: true,
        }
    }

    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Direction of travel in radians, in `(-PI, PI]`.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn is_predator(&self) -> bool {
        matches!(self.profile, Profile::Predator { .. })
    }

    pub fn hunger(&self) -> Option<i32> {
        match self.profile {
            Profile::Predator { hunger } => Some(hunger),
            Profile::Standard => None,
        }
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn max_force(&self) -> f32 {
        self.max_force
    }

    pub fn separation_distance(&self) -> f32 {
        self.separation_distance
    }

    pub fn detection_distance(&self) -> f32 {
        self.detection_distance
    }

    pub fn strengths(&self) -> Strengths {
        self.strengths
    }

    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed;
    }

    pub fn set_separation_distance(&mut self, distance: f32) {
        self.separation_distance = distance;
    }

    pub fn set_detection_distance(&mut self, distance: f32) {
        self.detection_distance = distance;
    }

    pub fn set_separation_strength(&mut self, strength: f32) {
        self.strengths.separation = strength;
    }

    pub fn set_cohesion_strength(&mut self, strength: f32) {
        self.strengths.cohesion = strength;
    }

    pub fn set_alignment_strength(&mut self, strength: f32) {
        self.strengths.alignment = strength;
    }

    pub fn set_avoid_predator_strength(&mut self, strength: f32) {
        self.strengths.avoid_predator = strength;
    }

    /// No-op for standard agents.
    pub fn set_hunger(&mut self, hunger: i32) {
        if let Profile::Predator { hunger: current } = &mut self.profile {
            *current = hunger;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_velocity(&mut self, velocity: Vector2) {
        self.velocity = velocity;
        self.change_heading();
    }

    /// Only the upper edges count: negative coordinates are still in bounds.
    pub fn out_of_bounds(&self, bounds: Bounds) -> bool {
        self.position.x > bounds.width || self.position.y > bounds.height
    }

    /// Computes this frame's combined force without mutating anything.
    ///
    /// `agents` may contain this agent; it is skipped by the zero-distance test.
    pub fn steering(&self, agents: &[Agent], obstacles: &[Obstacle], bounds: Bounds) -> Steering {
        let walls = behavior::avoid_walls(self, bounds);
        let avoidance = behavior::avoid_obstacles(self, obstacles);
        let out_of_bounds = self.out_of_bounds(bounds);

        let (force, eaten) = match self.profile {
            Profile::Standard => {
                let s = self.strengths;
                let force = behavior::cohesion(self, agents) * s.cohesion
                    + behavior::separation(self, agents) * s.separation
                    + behavior::alignment(self, agents) * s.alignment
                    + behavior::avoid_predators(self, agents) * s.avoid_predator
                    + walls * WALL_WEIGHT
                    + avoidance.force * (OBSTACLE_WEIGHT * self.max_speed);
                (force, Vec::new())
            }
            Profile::Predator { .. } => {
                let hunt = behavior::hunt(self, agents);
                let force = behavior::separation(self, agents)
                    + walls * PREDATOR_WALL_WEIGHT
                    + hunt.force * HUNT_WEIGHT
                    + avoidance.force * (PREDATOR_OBSTACLE_WEIGHT * self.max_speed);
                (force, hunt.eaten)
            }
        };

        Steering {
            force,
            collided: avoidance.collided,
            out_of_bounds,
            eaten,
        }
    }

    /// Applies a [`Steering`]: meals, deaths, then the force.
    pub fn resolve(&mut self, steering: &Steering) {
        for _ in &steering.eaten {
            self.digest();
        }
        if steering.collided || steering.out_of_bounds {
            self.kill();
        }
        self.apply_force(steering.force);
    }

    /// Full update against neighbours that do not include this agent.
    ///
    /// Returns the indices into `others` of prey this agent caught; the caller
    /// is responsible for killing them.
    pub fn update(&mut self, others: &[Agent], obstacles: &[Obstacle], bounds: Bounds) -> Vec<usize> {
        let steering = self.steering(others, obstacles, bounds);
        self.resolve(&steering);
        steering.eaten
    }

    pub fn eat(&mut self, prey: &mut Agent) {
        prey.kill();
        self.digest();
    }

    fn digest(&mut self) {
        if let Profile::Predator { hunger } = &mut self.profile {
            *hunger -= 1;
            if *hunger <= 0 {
                log::debug!("predator at {:?} is full", self.position);
                self.alive = false;
            }
        }
    }

    /// Adds `force` to velocity (or drifts forward when it is exactly zero),
    /// clamps to `max_speed` and refreshes the heading.
    pub fn apply_force(&mut self, force: Vector2) {
        if force.is_zero() {
            self.velocity = self.velocity * IDLE_DRIFT;
        } else {
            self.velocity += force;
        }
        self.velocity = self.velocity.limit(self.max_speed);
        self.change_heading();
    }

    fn change_heading(&mut self) {
        if !self.velocity.is_zero() {
            self.heading = self.velocity.y.atan2(self.velocity.x);
        }
    }

    /// Integrates position by one frame of velocity.
    pub fn advance(&mut self) {
        self.position += self.velocity;
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            species: self.species,
            x: self.position.x,
            y: self.position.y,
            heading: self.heading,
            hunger: self.hunger(),
        }
    }
}

impl Entity for Agent {
    fn position(&self) -> Vector2 {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kill(&mut self) {
        self.alive = false;
    }
}
