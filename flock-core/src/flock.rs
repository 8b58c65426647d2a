use flock_shared::{AgentSnapshot, FlockStatus, Species};

use crate::agent::Agent;
use crate::entity::{Bounds, Entity, Obstacle};
use crate::vector::Vector2;

/// Owns every agent and obstacle and steps them one frame at a time.
///
/// Entities are addressed by index into contiguous storage. Indices are only
/// stable between calls that remove entities, i.e. within a frame.
#[derive(Debug, Clone, Default)]
pub struct Flock {
    agents: Vec<Agent>,
    obstacles: Vec<Obstacle>,
    species_counts: [usize; 4],
    obstacle_count: usize,
}

impl Flock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents of `species` held by the flock, including ones marked dead but
    /// not yet purged.
    pub fn count(&self, species: Species) -> usize {
        self.species_counts[species.index()]
    }

    pub fn alive_count(&self, species: Species) -> usize {
        self.agents
            .iter()
            .filter(|a| a.is_alive() && a.species() == species)
            .count()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacle_count
    }

    pub fn is_position_free(&self, position: Vector2) -> bool {
        !self
            .obstacles
            .iter()
            .any(|o| o.is_alive() && o.contains(position))
    }

    /// Adds an agent unless it would start inside an obstacle, in which case
    /// it is handed back.
    pub fn add_agent(&mut self, agent: Agent) -> Result<(), Agent> {
        if !self.is_position_free(agent.position()) {
            log::debug!(
                "rejected {} agent spawning at {:?}: inside an obstacle",
                agent.species().name(),
                agent.position()
            );
            return Err(agent);
        }
        self.species_counts[agent.species().index()] += 1;
        self.agents.push(agent);
        Ok(())
    }

    /// Removes the agent at `index` if it belongs to `species`.
    pub fn remove_agent(&mut self, species: Species, index: usize) -> Option<Agent> {
        if self.agents.get(index)?.species() != species {
            return None;
        }
        let agent = self.agents.remove(index);
        self.species_counts[species.index()] -= 1;
        Some(agent)
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
        self.obstacle_count += 1;
    }

    pub fn remove_obstacle(&mut self, index: usize) -> Option<Obstacle> {
        if index >= self.obstacles.len() {
            return None;
        }
        self.obstacle_count -= 1;
        Some(self.obstacles.remove(index))
    }

    /// Marks the first `n` living agents of `species` dead. They are removed
    /// by the next [`simulate`](Self::simulate). Returns how many were marked.
    pub fn kill_agents(&mut self, species: Species, n: usize) -> usize {
        let mut killed = 0;
        for agent in self
            .agents
            .iter_mut()
            .filter(|a| a.is_alive() && a.species() == species)
            .take(n)
        {
            agent.kill();
            killed += 1;
        }
        killed
    }

    /// Marks the last `n` living obstacles dead.
    pub fn kill_obstacles(&mut self, n: usize) -> usize {
        let mut killed = 0;
        for obstacle in self
            .obstacles
            .iter_mut()
            .rev()
            .filter(|o| o.is_alive())
            .take(n)
        {
            obstacle.kill();
            killed += 1;
        }
        killed
    }

    /// Runs one agent's update inside the arena and kills whatever it ate.
    ///
    /// Dead agents and out-of-range indices are left alone.
    pub fn update_agent(&mut self, index: usize, bounds: Bounds) {
        let steering = match self.agents.get(index) {
            Some(agent) if agent.is_alive() => {
                agent.steering(&self.agents, &self.obstacles, bounds)
            }
            _ => return,
        };
        for &prey in &steering.eaten {
            self.agents[prey].kill();
        }
        self.agents[index].resolve(&steering);
    }

    /// Advances the whole flock by one frame.
    ///
    /// 1. Every agent is either purged (already dead) or updated, in order.
    ///    Agents that die during this pass are purged before anything moves.
    /// 2. Dead obstacles are purged.
    /// 3. Every survivor moves.
    pub fn simulate(&mut self, bounds: Bounds) {
        let mut index = 0;
        while index < self.agents.len() {
            if self.agents[index].is_alive() {
                self.update_agent(index, bounds);
                index += 1;
            } else {
                // The next agent shifts into `index`; check it next.
                let species = self.agents[index].species();
                self.remove_agent(species, index);
            }
        }
        let purged = self.purge_dead_agents();
        if purged > 0 {
            log::debug!("{} agents died this frame", purged);
        }

        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.is_alive());
        self.obstacle_count -= before - self.obstacles.len();

        for agent in &mut self.agents {
            agent.advance();
        }
    }

    fn purge_dead_agents(&mut self) -> usize {
        let counts = &mut self.species_counts;
        let before = self.agents.len();
        self.agents.retain(|agent| {
            if agent.is_alive() {
                true
            } else {
                counts[agent.species().index()] -= 1;
                false
            }
        });
        before - self.agents.len()
    }

    pub fn set_max_speed(&mut self, species: Species, max_speed: f32) {
        self.for_species(species, |a| a.set_max_speed(max_speed));
    }

    pub fn set_separation_distance(&mut self, species: Species, distance: f32) {
        self.for_species(species, |a| a.set_separation_distance(distance));
    }

    pub fn set_detection_distance(&mut self, species: Species, distance: f32) {
        self.for_species(species, |a| a.set_detection_distance(distance));
    }

    pub fn set_separation_strength(&mut self, species: Species, strength: f32) {
        self.for_species(species, |a| a.set_separation_strength(strength));
    }

    pub fn set_cohesion_strength(&mut self, species: Species, strength: f32) {
        self.for_species(species, |a| a.set_cohesion_strength(strength));
    }

    pub fn set_alignment_strength(&mut self, species: Species, strength: f32) {
        self.for_species(species, |a| a.set_alignment_strength(strength));
    }

    pub fn set_avoid_predator_strength(&mut self, species: Species, strength: f32) {
        self.for_species(species, |a| a.set_avoid_predator_strength(strength));
    }

    /// Sets the hunger of every predator.
    pub fn set_hunger(&mut self, hunger: i32) {
        for agent in self.agents.iter_mut().filter(|a| a.is_predator()) {
            agent.set_hunger(hunger);
        }
    }

    pub fn set_obstacle_radius(&mut self, radius: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.set_radius(radius);
        }
    }

    fn for_species(&mut self, species: Species, mut apply: impl FnMut(&mut Agent)) {
        for agent in self.agents.iter_mut().filter(|a| a.species() == species) {
            apply(agent);
        }
    }

    pub fn clear(&mut self) {
        self.agents.clear();
        self.obstacles.clear();
        self.species_counts = [0; 4];
        self.obstacle_count = 0;
    }

    pub fn status(&self, frame: u64, paused: bool) -> FlockStatus {
        FlockStatus {
            frame,
            blue: self.count(Species::Blue),
            green: self.count(Species::Green),
            predators: self.count(Species::Red),
            yellow: self.count(Species::Yellow),
            obstacles: self.obstacle_count,
            paused,
        }
    }

    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.agents.iter().map(Agent::snapshot).collect()
    }
}
