use std::ops;

/// 2D point/vector in scene units. Also used for per-axis scale factors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
        }
    }

    pub fn splat(v: f32) -> Self {
        Self::new(v, v)
    }

    pub fn add(self, p: impl Into<Self>) -> Self {
        let p = p.into();
        Self::new(self.x + p.x, self.y + p.y)
    }

    pub fn sub(self, p: impl Into<Self>) -> Self {
        let p = p.into();
        Self::new(self.x - p.x, self.y - p.y)
    }

    pub fn scaled(self, f: f32) -> Self {
        Self::new(self.x * f, self.y * f)
    }

    pub fn tuple(self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl ops::Add for Point {
    type Output = Self;

    fn add(self, o: Self) -> Self {
        Point::add(self, o)
    }
}

impl ops::AddAssign for Point {
    fn add_assign(&mut self, o: Self) {
        *self = Point::add(*self, o);
    }
}

impl ops::Sub for Point {
    type Output = Self;

    fn sub(self, o: Self) -> Self {
        Point::sub(self, o)
    }
}

impl ops::Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl ops::Mul<f32> for Point {
    type Output = Self;

    fn mul(self, f: f32) -> Self {
        self.scaled(f)
    }
}

pub fn lerp(from: f32, delta: f32, ratio: f32) -> f32 {
    from + delta * ratio
}
