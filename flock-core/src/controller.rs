use flock_shared::{FlockSettings, FlockStatus, PredatorSettings, Species, SpeciesSettings};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::agent::Agent;
use crate::entity::{Bounds, Entity, Obstacle};
use crate::flock::Flock;
use crate::vector::Vector2;

/// Random positions tried per agent before a spawn is abandoned.
pub const MAX_SPAWN_ATTEMPTS: usize = 1000;
/// Obstacles only spawn inside this central fraction of the bounds.
pub const OBSTACLE_SPAWN_AREA: f32 = 0.8;

/// The knobs a control panel turns: population targets, live tuning, pause.
pub struct FlockController {
    flock: Flock,
    settings: FlockSettings,
    rng: StdRng,
    frame: u64,
    paused: bool,
}

impl FlockController {
    pub fn new(settings: FlockSettings, seed: u64) -> Self {
        Self {
            flock: Flock::new(),
            settings,
            rng: StdRng::seed_from_u64(seed),
            frame: 0,
            paused: false,
        }
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    pub fn flock_mut(&mut self) -> &mut Flock {
        &mut self.flock
    }

    pub fn settings(&self) -> &FlockSettings {
        &self.settings
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn status(&self) -> FlockStatus {
        self.flock.status(self.frame, self.paused)
    }

    /// Empties the flock and spawns the configured initial population.
    pub fn reset(&mut self, bounds: Bounds) {
        self.flock.clear();
        self.frame = 0;
        let initial = self.settings.initial;
        self.set_species_count(Species::Blue, initial.blue, bounds);
        self.set_species_count(Species::Green, initial.green, bounds);
        self.set_species_count(Species::Red, initial.predators, bounds);
        self.set_obstacle_count(initial.obstacles, bounds);
        log::info!(
            "flock reset: {} blue, {} green, {} predators, {} obstacles",
            self.flock.count(Species::Blue),
            self.flock.count(Species::Green),
            self.flock.count(Species::Red),
            self.flock.obstacle_count()
        );
    }

    /// Grows or shrinks the living population of `species` to `target`.
    ///
    /// Growth spawns at random free positions with the species' current
    /// settings. Shrinking marks agents dead for the next frame to purge.
    /// Returns the living count afterwards.
    pub fn set_species_count(&mut self, species: Species, target: usize, bounds: Bounds) -> usize {
        let alive = self.flock.alive_count(species);
        if alive > target {
            self.flock.kill_agents(species, alive - target);
        } else {
            for _ in alive..target {
                if !self.spawn(species, bounds) {
                    log::warn!(
                        "gave up spawning {} agent after {} attempts",
                        species.name(),
                        MAX_SPAWN_ATTEMPTS
                    );
                    break;
                }
            }
        }
        self.flock.alive_count(species)
    }

    fn spawn(&mut self, species: Species, bounds: Bounds) -> bool {
        if !bounds.has_area() {
            return false;
        }
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let position = Vector2::new(
                self.rng.gen_range(0.0..bounds.width),
                self.rng.gen_range(0.0..bounds.height),
            );
            let heading = self.rng.gen_range(0.0..360.0);
            let agent = match self.settings.species(species) {
                Some(settings) => Agent::new(species, position, heading, settings),
                None => Agent::predator(position, heading, &self.settings.predator),
            };
            if self.flock.add_agent(agent).is_ok() {
                return true;
            }
        }
        false
    }

    /// Grows or shrinks the living obstacles to `target`. New obstacles keep
    /// away from the walls; removal starts from the most recently added.
    pub fn set_obstacle_count(&mut self, target: usize, bounds: Bounds) -> usize {
        let alive = self
            .flock
            .obstacles()
            .iter()
            .filter(|o| o.is_alive())
            .count();
        if alive > target {
            self.flock.kill_obstacles(alive - target);
            return target;
        }
        if !bounds.has_area() {
            return alive;
        }
        let inset = (1.0 - OBSTACLE_SPAWN_AREA) / 2.0;
        for _ in alive..target {
            let position = Vector2::new(
                bounds.width * inset + self.rng.gen_range(0.0..bounds.width * OBSTACLE_SPAWN_AREA),
                bounds.height * inset + self.rng.gen_range(0.0..bounds.height * OBSTACLE_SPAWN_AREA),
            );
            self.flock
                .add_obstacle(Obstacle::new(position, self.settings.obstacle.radius));
        }
        target
    }

    /// Stores new tuning for a flocking species and applies it to every
    /// living member. Use [`apply_predator_settings`](Self::apply_predator_settings) for `Red`.
    pub fn apply_species_settings(&mut self, species: Species, settings: SpeciesSettings) {
        let Some(stored) = self.settings.species_mut(species) else {
            log::warn!("{} is tuned through predator settings", species.name());
            return;
        };
        *stored = settings;
        let flock = &mut self.flock;
        flock.set_max_speed(species, settings.max_speed);
        flock.set_separation_distance(species, settings.separation_distance);
        flock.set_detection_distance(species, settings.detection_distance);
        flock.set_separation_strength(species, settings.separation_strength);
        flock.set_cohesion_strength(species, settings.cohesion_strength);
        flock.set_alignment_strength(species, settings.alignment_strength);
        flock.set_avoid_predator_strength(species, settings.avoid_predator_strength);
    }

    pub fn apply_predator_settings(&mut self, settings: PredatorSettings) {
        self.settings.predator = settings;
        let flock = &mut self.flock;
        flock.set_max_speed(Species::Red, settings.max_speed);
        flock.set_separation_distance(Species::Red, settings.separation_distance);
        flock.set_detection_distance(Species::Red, settings.detection_distance);
        flock.set_hunger(settings.hunger);
    }

    pub fn set_obstacle_radius(&mut self, radius: f32) {
        self.settings.obstacle.radius = radius;
        self.flock.set_obstacle_radius(radius);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Simulates one frame unless paused. Returns whether a frame ran.
    pub fn tick(&mut self, bounds: Bounds) -> bool {
        if self.paused {
            return false;
        }
        self.flock.simulate(bounds);
        self.frame += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        width: 800.0,
        height: 600.0,
    };

    fn controller() -> FlockController {
        FlockController::new(FlockSettings::default(), 7)
    }

    #[test]
    fn test_reset_spawns_initial_population() {
        let mut ctl = controller();
        ctl.reset(BOUNDS);
        assert_eq!(ctl.flock().count(Species::Blue), 50);
        assert_eq!(ctl.flock().count(Species::Green), 50);
        assert_eq!(ctl.flock().count(Species::Red), 0);
        assert_eq!(ctl.frame(), 0);
        for agent in ctl.flock().agents() {
            let p = agent.position();
            assert!(p.x >= 0.0 && p.x < BOUNDS.width);
            assert!(p.y >= 0.0 && p.y < BOUNDS.height);
        }
    }

    #[test]
    fn test_same_seed_same_flock() {
        let mut a = controller();
        let mut b = controller();
        a.reset(BOUNDS);
        b.reset(BOUNDS);
        for _ in 0..5 {
            a.tick(BOUNDS);
            b.tick(BOUNDS);
        }
        assert_eq!(a.flock().snapshot(), b.flock().snapshot());
    }

    #[test]
    fn test_species_count_grows_and_shrinks() {
        let mut ctl = controller();
        assert_eq!(ctl.set_species_count(Species::Red, 3, BOUNDS), 3);
        assert!(ctl.flock().agents().iter().all(|a| a.is_predator()));

        assert_eq!(ctl.set_species_count(Species::Red, 1, BOUNDS), 1);
        assert_eq!(ctl.flock().count(Species::Red), 3);
        ctl.tick(BOUNDS);
        assert_eq!(ctl.flock().count(Species::Red), 1);
    }

    #[test]
    fn test_spawns_avoid_obstacles() {
        let mut ctl = controller();
        ctl.set_obstacle_radius(60.0);
        ctl.set_obstacle_count(10, BOUNDS);
        ctl.set_species_count(Species::Blue, 100, BOUNDS);
        let flock = ctl.flock();
        for agent in flock.agents() {
            assert!(flock.is_position_free(agent.position()));
        }
    }

    #[test]
    fn test_spawn_gives_up_when_everything_is_blocked() {
        let mut ctl = controller();
        ctl.flock_mut()
            .add_obstacle(Obstacle::new(Vector2::new(400.0, 300.0), 10_000.0));
        assert_eq!(ctl.set_species_count(Species::Blue, 2, BOUNDS), 0);
        assert!(ctl.flock().is_empty());
    }

    #[test]
    fn test_obstacles_spawn_in_central_area() {
        let mut ctl = controller();
        assert_eq!(ctl.set_obstacle_count(20, BOUNDS), 20);
        for obstacle in ctl.flock().obstacles() {
            let p = obstacle.position();
            assert!(p.x >= 80.0 && p.x <= 720.0);
            assert!(p.y >= 60.0 && p.y <= 540.0);
            assert_eq!(obstacle.radius(), 5.0);
        }
        assert_eq!(ctl.set_obstacle_count(5, BOUNDS), 5);
        ctl.tick(BOUNDS);
        assert_eq!(ctl.flock().obstacle_count(), 5);
    }

    #[test]
    fn test_apply_settings_updates_live_agents() {
        let mut ctl = controller();
        ctl.set_species_count(Species::Green, 4, BOUNDS);
        ctl.set_species_count(Species::Red, 2, BOUNDS);

        let mut green = SpeciesSettings::green();
        green.max_speed = 6.0;
        ctl.apply_species_settings(Species::Green, green);
        ctl.apply_predator_settings(PredatorSettings {
            hunger: 9,
            ..PredatorSettings::default()
        });

        for agent in ctl.flock().agents() {
            match agent.species() {
                Species::Green => assert_eq!(agent.max_speed(), 6.0),
                Species::Red => assert_eq!(agent.hunger(), Some(9)),
                _ => unreachable!(),
            }
        }
        assert_eq!(ctl.settings().green.max_speed, 6.0);

        // New spawns pick up the stored settings.
        ctl.set_species_count(Species::Green, 5, BOUNDS);
        assert!(ctl
            .flock()
            .agents()
            .iter()
            .filter(|a| a.species() == Species::Green)
            .all(|a| a.max_speed() == 6.0));
    }

    #[test]
    fn test_red_species_settings_are_ignored() {
        let mut ctl = controller();
        let before = *ctl.settings();
        ctl.apply_species_settings(Species::Red, SpeciesSettings::blue());
        assert_eq!(*ctl.settings(), before);
    }

    #[test]
    fn test_unbounded_area_spawns_nothing() {
        let mut ctl = controller();
        let bounds = Bounds::new(f32::INFINITY, 600.0);
        ctl.reset(bounds);
        assert!(ctl.flock().is_empty());
        assert_eq!(ctl.set_obstacle_count(3, bounds), 0);
        assert_eq!(ctl.flock().obstacle_count(), 0);
    }

    #[test]
    fn test_pause_skips_frames() {
        let mut ctl = controller();
        ctl.reset(BOUNDS);
        ctl.pause();
        let before = ctl.flock().snapshot();
        assert!(!ctl.tick(BOUNDS));
        assert_eq!(ctl.flock().snapshot(), before);
        assert!(ctl.status().paused);

        ctl.toggle_pause();
        assert!(!ctl.is_paused());
        assert!(ctl.tick(BOUNDS));
        assert_eq!(ctl.frame(), 1);
    }
}
