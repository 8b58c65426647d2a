use crate::vector::Vector2;

/// Anything placed in a flock: it has a position and can be killed.
///
/// Death is one-way. A dead entity stays in its collection only until the
/// owning [`Flock`](crate::Flock) purges it, and is ignored by every
/// behavior in the meantime.
pub trait Entity {
    fn position(&self) -> Vector2;
    fn is_alive(&self) -> bool;
    fn kill(&mut self);
}

/// Simulation area supplied by the driver each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Finite and strictly positive on both axes, so positions can be sampled inside it.
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A static circle agents must steer around. Touching one is fatal.
#[derive(Debug, Clone)]
pub struct Obstacle {
    position: Vector2,
    radius: f32,
    alive: bool,
}

impl Obstacle {
    pub fn new(position: Vector2, radius: f32) -> Self {
        Self {
            position,
            radius,
            alive: true,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    /// True when `point` lies inside or on the edge of the obstacle.
    pub fn contains(&self, point: Vector2) -> bool {
        self.position.distance(&point) <= self.radius
    }
}

impl Entity for Obstacle {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_area() {
        assert!(Bounds::new(800.0, 600.0).has_area());
        assert!(!Bounds::new(0.0, 600.0).has_area());
        assert!(!Bounds::new(800.0, f32::INFINITY).has_area());
        assert!(!Bounds::new(f32::NAN, 600.0).has_area());
    }

    #[test]
    fn test_obstacle_contains_edge() {
        let obstacle = Obstacle::new(Vector2::new(10.0, 10.0), 5.0);
        assert!(obstacle.contains(Vector2::new(10.0, 10.0)));
        assert!(obstacle.contains(Vector2::new(15.0, 10.0)));
        assert!(!obstacle.contains(Vector2::new(15.1, 10.0)));
    }

    #[test]
    fn test_obstacle_death_is_permanent() {
        let mut obstacle = Obstacle::new(Vector2::zero(), 1.0);
        assert!(obstacle.is_alive());
        obstacle.kill();
        obstacle.set_radius(3.0);
        assert!(!obstacle.is_alive());
        assert_eq!(obstacle.radius(), 3.0);
    }
}
