//! Steering behaviors.
//!
//! Every function reads its neighbourhood and returns a force without
//! touching any agent. Neighbours that are dead, or at distance zero (the
//! agent itself), are skipped.

use crate::agent::Agent;
use crate::entity::{Bounds, Entity, Obstacle};
use crate::vector::Vector2;

/// Fraction of the bounds treated as the wall zone.
pub const WALL_MARGIN: f32 = 0.1;
/// Obstacles are avoided once the heading passes within this many radii.
pub const OBSTACLE_REACTION_MARGIN: f32 = 1.5;
/// Floor for every `1 / distance` repulsion, so it saturates instead of diverging.
pub const MIN_REPULSION_DISTANCE: f32 = 1.0e-3;
/// A predator catches prey closer than this.
pub const EAT_RANGE: f32 = 3.0;

/// Outcome of [`avoid_obstacles`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleAvoidance {
    pub force: Vector2,
    /// The agent is inside at least one obstacle.
    pub collided: bool,
}

/// Outcome of [`hunt`]
#[derive(Debug, Clone, PartialEq)]
pub struct Hunt {
    pub force: Vector2,
    /// Indices into the scanned slice of prey caught this frame, in scan order.
    pub eaten: Vec<usize>,
}

/// Reynolds steering: full speed along `direction`, minus current velocity, capped.
pub fn steer_towards(agent: &Agent, direction: Vector2) -> Vector2 {
    let desired = direction.unit() * agent.max_speed();
    (desired - agent.velocity()).limit(agent.max_force())
}

fn repulsion(displacement: Vector2, distance: f32) -> Vector2 {
    -displacement.unit() * (1.0 / distance.max(MIN_REPULSION_DISTANCE))
}

pub fn cohesion<'a, I>(agent: &Agent, others: I) -> Vector2
where
    I: IntoIterator<Item = &'a Agent>,
{
    let mut sum = Vector2::zero();
    let mut count = 0;

    for other in others.into_iter().filter(|o| o.is_alive()) {
        let distance = agent.position().distance(&other.position());
        if distance > 0.0
            && distance < agent.detection_distance()
            && other.species() == agent.species()
        {
            sum += other.position();
            count += 1;
        }
    }

    if count > 0 {
        let center = sum / count as f32;
        steer_towards(agent, center - agent.position())
    } else {
        Vector2::zero()
    }
}

pub fn separation<'a, I>(agent: &Agent, others: I) -> Vector2
where
    I: IntoIterator<Item = &'a Agent>,
{
    let mut sum = Vector2::zero();
    let mut count = 0;

    for other in others.into_iter().filter(|o| o.is_alive()) {
        let displacement = other.position() - agent.position();
        let distance = displacement.magnitude();
        if distance > 0.0 && distance < agent.separation_distance() {
            sum += repulsion(displacement, distance);
            count += 1;
        }
    }

    if count > 0 {
        steer_towards(agent, sum)
    } else {
        Vector2::zero()
    }
}

/// Matches velocity with same-species neighbours inside the separation radius.
pub fn alignment<'a, I>(agent: &Agent, others: I) -> Vector2
where
    I: IntoIterator<Item = &'a Agent>,
{
    let mut sum = Vector2::zero();
    let mut count = 0;

    for other in others.into_iter().filter(|o| o.is_alive()) {
        let distance = agent.position().distance(&other.position());
        if distance > 0.0
            && distance < agent.separation_distance()
            && other.species() == agent.species()
        {
            sum += other.velocity();
            count += 1;
        }
    }

    if count > 0 {
        steer_towards(agent, sum / count as f32)
    } else {
        Vector2::zero()
    }
}

/// Pushes away from any edge closer than [`WALL_MARGIN`] of the bounds. Uncapped.
pub fn avoid_walls(agent: &Agent, bounds: Bounds) -> Vector2 {
    let position = agent.position();
    let mut force = Vector2::zero();

    if position.y < bounds.height * WALL_MARGIN {
        force.y = 1.0 / position.y.max(MIN_REPULSION_DISTANCE);
    } else if position.y > bounds.height * (1.0 - WALL_MARGIN) {
        force.y = -1.0 / (bounds.height - position.y).max(MIN_REPULSION_DISTANCE);
    }

    if position.x < bounds.width * WALL_MARGIN {
        force.x = 1.0 / position.x.max(MIN_REPULSION_DISTANCE);
    } else if position.x > bounds.width * (1.0 - WALL_MARGIN) {
        force.x = -1.0 / (bounds.width - position.x).max(MIN_REPULSION_DISTANCE);
    }

    force
}

/// Flees predators inside the detection radius.
pub fn avoid_predators<'a, I>(agent: &Agent, others: I) -> Vector2
where
    I: IntoIterator<Item = &'a Agent>,
{
    let mut sum = Vector2::zero();
    let mut count = 0;

    for other in others.into_iter().filter(|o| o.is_alive()) {
        if !other.species().is_predator() {
            continue;
        }
        let displacement = other.position() - agent.position();
        let distance = displacement.magnitude();
        if distance > 0.0 && distance < agent.detection_distance() {
            sum += repulsion(displacement, distance);
            count += 1;
        }
    }

    if count > 0 {
        steer_towards(agent, sum)
    } else {
        Vector2::zero()
    }
}

/// Veers away from obstacles ahead and reports collisions. Uncapped.
///
/// An obstacle the agent is already inside contributes no force.
pub fn avoid_obstacles<'a, I>(agent: &Agent, obstacles: I) -> ObstacleAvoidance
where
    I: IntoIterator<Item = &'a Obstacle>,
{
    let heading = agent.velocity().unit();
    let mut force = Vector2::zero();
    let mut collided = false;

    for obstacle in obstacles.into_iter().filter(|o| o.is_alive()) {
        let radius = obstacle.radius();
        let displacement = obstacle.position() - agent.position();
        let distance = displacement.magnitude();

        if distance < radius {
            collided = true;
            continue;
        }

        // Where the agent would be at this distance if it kept its heading,
        // relative to the obstacle centre.
        let facing = heading * distance - displacement;
        if facing.magnitude() <= OBSTACLE_REACTION_MARGIN * radius {
            force += facing.unit() * (1.0 / (distance - radius).max(MIN_REPULSION_DISTANCE));
        }
    }

    ObstacleAvoidance { force, collided }
}

/// Chases the nearest prey in range, catching every prey that becomes the
/// nearest candidate while closer than [`EAT_RANGE`].
///
/// Equal distances keep the first candidate.
pub fn hunt(agent: &Agent, others: &[Agent]) -> Hunt {
    let mut nearest: Option<(f32, Vector2)> = None;
    let mut eaten = Vec::new();

    for (index, other) in others.iter().enumerate() {
        if !other.is_alive() || !other.species().is_prey() {
            continue;
        }
        let displacement = other.position() - agent.position();
        let distance = displacement.magnitude();
        if distance <= 0.0 || distance >= agent.detection_distance() {
            continue;
        }
        if nearest.map_or(true, |(best, _)| distance < best) {
            nearest = Some((distance, displacement));
            if distance < EAT_RANGE {
                eaten.push(index);
            }
        }
    }

    let force = match nearest {
        Some((_, displacement)) => steer_towards(agent, displacement),
        None => Vector2::zero(),
    };

    Hunt { force, eaten }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flock_shared::{PredatorSettings, Species, SpeciesSettings};

    fn bird(species: Species, x: f32, y: f32) -> Agent {
        Agent::new(species, Vector2::new(x, y), 0.0, &SpeciesSettings::blue())
    }

    fn predator(x: f32, y: f32) -> Agent {
        Agent::predator(Vector2::new(x, y), 0.0, &PredatorSettings::default())
    }

    #[test]
    fn test_cohesion_ignores_other_species() {
        let me = bird(Species::Blue, 100.0, 100.0);
        let others = [me.clone(), bird(Species::Green, 120.0, 100.0)];
        assert_eq!(cohesion(&me, &others), Vector2::zero());

        let others = [me.clone(), bird(Species::Blue, 100.0, 140.0)];
        let steer = cohesion(&me, &others);
        assert!(steer.y > 0.0);
        assert!(steer.magnitude() <= me.max_force() + 1e-6);
    }

    #[test]
    fn test_separation_is_species_agnostic() {
        let me = bird(Species::Blue, 100.0, 100.0);
        let others = [bird(Species::Green, 110.0, 100.0)];
        let steer = separation(&me, &others);
        assert!(steer.x < 0.0);
        assert!((steer.magnitude() - me.max_force()).abs() < 1e-5);
    }

    #[test]
    fn test_alignment_uses_separation_radius() {
        let me = bird(Species::Blue, 100.0, 100.0);
        // Inside detection (90) but outside separation (30).
        let mut far = bird(Species::Blue, 150.0, 100.0);
        far.set_velocity(Vector2::new(0.0, 4.0));
        assert_eq!(alignment(&me, [&far]), Vector2::zero());

        let mut near = bird(Species::Blue, 120.0, 100.0);
        near.set_velocity(Vector2::new(0.0, 4.0));
        let steer = alignment(&me, [&near]);
        assert!(steer.y > 0.0);
        assert!(steer.x < 0.0);
    }

    #[test]
    fn test_no_neighbours_gives_zero() {
        let me = bird(Species::Blue, 100.0, 100.0);
        let alone = [me.clone()];
        assert_eq!(cohesion(&me, &alone), Vector2::zero());
        assert_eq!(separation(&me, &alone), Vector2::zero());
        assert_eq!(alignment(&me, &alone), Vector2::zero());
        assert_eq!(avoid_predators(&me, &alone), Vector2::zero());
    }

    #[test]
    fn test_dead_neighbours_are_ignored() {
        let me = bird(Species::Blue, 100.0, 100.0);
        let mut other = bird(Species::Blue, 105.0, 100.0);
        other.kill();
        assert_eq!(separation(&me, [&other]), Vector2::zero());
        assert_eq!(cohesion(&me, [&other]), Vector2::zero());
    }

    #[test]
    fn test_avoid_predators_only_flees_red() {
        let me = bird(Species::Blue, 100.0, 100.0);
        let green = bird(Species::Green, 100.0, 120.0);
        assert_eq!(avoid_predators(&me, [&green]), Vector2::zero());

        let hunter = predator(100.0, 120.0);
        let steer = avoid_predators(&me, [&hunter]);
        assert!(steer.y < 0.0);
        assert!(steer.magnitude() <= me.max_force() + 1e-6);
    }

    #[test]
    fn test_avoid_walls_zones() {
        let bounds = Bounds::new(1000.0, 1000.0);
        assert_eq!(avoid_walls(&bird(Species::Blue, 500.0, 500.0), bounds), Vector2::zero());

        let left = avoid_walls(&bird(Species::Blue, 50.0, 500.0), bounds);
        assert!((left.x - 0.02).abs() < 1e-6);
        assert_eq!(left.y, 0.0);

        let corner = avoid_walls(&bird(Species::Blue, 950.0, 975.0), bounds);
        assert!((corner.x + 0.02).abs() < 1e-6);
        assert!((corner.y + 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_avoid_walls_saturates_on_edge() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let force = avoid_walls(&bird(Species::Blue, 0.0, 1000.0), bounds);
        assert!(force.x.is_finite() && force.x > 0.0);
        assert!(force.y.is_finite() && force.y < 0.0);
        assert_eq!(force.x, 1.0 / MIN_REPULSION_DISTANCE);
    }

    #[test]
    fn test_avoid_obstacles_collision_skips_force() {
        let me = bird(Species::Blue, 100.0, 100.0);
        let obstacle = Obstacle::new(Vector2::new(102.0, 100.0), 5.0);
        let result = avoid_obstacles(&me, [&obstacle]);
        assert!(result.collided);
        assert_eq!(result.force, Vector2::zero());
    }

    #[test]
    fn test_avoid_obstacles_steers_off_axis() {
        // Heading +x, obstacle slightly left of the path.
        let me = bird(Species::Blue, 100.0, 100.0);
        let obstacle = Obstacle::new(Vector2::new(120.0, 102.0), 5.0);
        let result = avoid_obstacles(&me, [&obstacle]);
        assert!(!result.collided);
        assert!(result.force.y < 0.0);
        assert!(result.force.magnitude().is_finite());
    }

    #[test]
    fn test_avoid_obstacles_on_radius_is_finite() {
        let me = bird(Species::Blue, 100.0, 100.0);
        let obstacle = Obstacle::new(Vector2::new(100.0, 105.0), 5.0);
        let result = avoid_obstacles(&me, [&obstacle]);
        assert!(!result.collided);
        assert!(result.force.x.is_finite() && result.force.y.is_finite());
    }

    #[test]
    fn test_hunt_picks_nearest_prey() {
        let hunter = predator(100.0, 100.0);
        let others = [
            hunter.clone(),
            bird(Species::Blue, 100.0, 150.0),
            bird(Species::Green, 100.0, 60.0),
            bird(Species::Yellow, 100.0, 90.0),
            predator(100.0, 95.0),
        ];
        let result = hunt(&hunter, &others);
        assert!(result.eaten.is_empty());
        // Nearest huntable prey is the green one, above.
        assert!(result.force.y < 0.0);
    }

    #[test]
    fn test_hunt_eats_close_prey() {
        let hunter = predator(100.0, 100.0);
        let others = [hunter.clone(), bird(Species::Blue, 102.0, 100.0)];
        let result = hunt(&hunter, &others);
        assert_eq!(result.eaten, vec![1]);
    }

    #[test]
    fn test_hunt_catches_every_closer_candidate() {
        let mut settings = PredatorSettings::default();
        settings.hunger = 1;
        let hunter = Agent::predator(Vector2::new(100.0, 100.0), 0.0, &settings);
        let others = [
            bird(Species::Blue, 102.5, 100.0),
            bird(Species::Blue, 101.0, 100.0),
        ];
        let result = hunt(&hunter, &others);
        assert_eq!(result.eaten, vec![0, 1]);
    }

    #[test]
    fn test_hunt_ignores_hunger_level() {
        let mut settings = PredatorSettings::default();
        settings.hunger = 0;
        let hunter = Agent::predator(Vector2::new(100.0, 100.0), 0.0, &settings);
        let result = hunt(&hunter, &[bird(Species::Green, 102.0, 100.0)]);
        assert_eq!(result.eaten, vec![0]);
    }

    #[test]
    fn test_hunt_nothing_in_range() {
        let hunter = predator(100.0, 100.0);
        let result = hunt(&hunter, &[bird(Species::Blue, 500.0, 500.0)]);
        assert_eq!(result.force, Vector2::zero());
        assert!(result.eaten.is_empty());
    }
}
