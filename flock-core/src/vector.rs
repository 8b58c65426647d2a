/// A 2D vector used for position, velocity and steering forces
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Both components exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector parallel to this one. The zero vector maps to itself.
    pub fn unit(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            *self * (1.0 / mag)
        } else {
            *self
        }
    }

    /// Caps the magnitude at `max`, keeping the direction.
    pub fn limit(&self, max: f32) -> Self {
        if self.magnitude() > max {
            self.unit() * max
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector2) -> f32 {
        (*other - *self).magnitude()
    }
}

macro_rules! componentwise {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident) => {
        impl core::ops::$op for Vector2 {
            type Output = Self;

            fn $method(self, other: Self) -> Self {
                Self::new(
                    core::ops::$op::$method(self.x, other.x),
                    core::ops::$op::$method(self.y, other.y),
                )
            }
        }

        impl core::ops::$assign for Vector2 {
            fn $assign_method(&mut self, other: Self) {
                *self = core::ops::$op::$method(*self, other);
            }
        }
    };
}

macro_rules! scalar {
    ($op:ident, $method:ident) => {
        impl core::ops::$op<f32> for Vector2 {
            type Output = Self;

            fn $method(self, scalar: f32) -> Self {
                Self::new(
                    core::ops::$op::$method(self.x, scalar),
                    core::ops::$op::$method(self.y, scalar),
                )
            }
        }
    };
}

componentwise!(Add, add, AddAssign, add_assign);
componentwise!(Sub, sub, SubAssign, sub_assign);
scalar!(Mul, mul);
scalar!(Div, div);

impl core::ops::Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}
