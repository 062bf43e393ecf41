//! Minimal rigid-circle physics for the hockey rink.
//!
//! Bodies are discs moving on a plane with no gravity. Walls are static
//! capsules (segments with a thickness). All collisions are perfectly elastic
//! and frictionless.

use std::ops::{Add, AddAssign, Mul, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scales the vector down so its length is at most `max`.
    pub fn clamp_length(self, max: f64) -> Vec2 {
        let len = self.length();
        if len > max && len > 0.0 {
            self * (max / len)
        } else {
            self
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// A moving disc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
    pub mass: f64,
    /// Force accumulated for the current sub-step.
    pub force: Vec2,
}

impl Disc {
    pub fn new(position: Vec2, radius: f64, mass: f64) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius,
            mass,
            force: Vec2::ZERO,
        }
    }

    /// Semi-implicit Euler step with per-second velocity damping.
    pub fn integrate(&mut self, dt: f64, damping: f64) {
        let damp = damping.powf(dt);
        self.velocity = self.velocity * damp + self.force * (dt / self.mass);
        self.position += self.velocity * dt;
        self.force = Vec2::ZERO;
    }

    /// Keeps the disc centre inside `[min, max]` on both axes. Velocity
    /// pointing further out of bounds is dropped.
    pub fn confine(&mut self, min: Vec2, max: Vec2) {
        if self.position.x < min.x {
            self.position.x = min.x;
            self.velocity.x = self.velocity.x.max(0.0);
        } else if self.position.x > max.x {
            self.position.x = max.x;
            self.velocity.x = self.velocity.x.min(0.0);
        }
        if self.position.y < min.y {
            self.position.y = min.y;
            self.velocity.y = self.velocity.y.max(0.0);
        } else if self.position.y > max.y {
            self.position.y = max.y;
            self.velocity.y = self.velocity.y.min(0.0);
        }
    }
}

/// A static wall segment with thickness `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub a: Vec2,
    pub b: Vec2,
    pub radius: f64,
}

impl Wall {
    pub const fn new(a: Vec2, b: Vec2, radius: f64) -> Self {
        Self { a, b, radius }
    }

    fn closest_point(&self, p: Vec2) -> Vec2 {
        let ab = self.b - self.a;
        let len_sq = ab.dot(ab);
        if len_sq <= f64::EPSILON {
            return self.a;
        }
        let t = ((p - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        self.a + ab * t
    }
}

/// Resolves a disc against a static wall. Returns whether they touched.
pub fn collide_wall(disc: &mut Disc, wall: &Wall) -> bool {
    let closest = wall.closest_point(disc.position);
    let delta = disc.position - closest;
    let dist = delta.length();
    let min_dist = disc.radius + wall.radius;
    if dist >= min_dist || dist <= f64::EPSILON {
        return false;
    }

    let normal = delta * (1.0 / dist);
    disc.position += normal * (min_dist - dist);

    let approach = disc.velocity.dot(normal);
    if approach < 0.0 {
        disc.velocity = disc.velocity - normal * (2.0 * approach);
    }
    true
}

/// Resolves an elastic collision between two discs. Returns whether they
/// touched.
pub fn collide_discs(a: &mut Disc, b: &mut Disc) -> bool {
    let delta = b.position - a.position;
    let dist = delta.length();
    let min_dist = a.radius + b.radius;
    if dist >= min_dist || dist <= f64::EPSILON {
        return false;
    }

    let normal = delta * (1.0 / dist);
    let inv_a = 1.0 / a.mass;
    let inv_b = 1.0 / b.mass;
    let inv_sum = inv_a + inv_b;

    // Split the overlap by inverse mass.
    let overlap = min_dist - dist;
    a.position = a.position - normal * (overlap * inv_a / inv_sum);
    b.position += normal * (overlap * inv_b / inv_sum);

    let closing = (b.velocity - a.velocity).dot(normal);
    if closing < 0.0 {
        let impulse = -2.0 * closing / inv_sum;
        a.velocity = a.velocity - normal * (impulse * inv_a);
        b.velocity += normal * (impulse * inv_b);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_wall_reflects_and_preserves_speed() {
        let wall = Wall::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 5.0);
        let mut disc = Disc::new(Vec2::new(50.0, 15.0), 15.0, 1.0);
        disc.velocity = Vec2::new(30.0, -40.0);

        assert!(collide_wall(&mut disc, &wall));
        assert!(approx(disc.velocity.x, 30.0));
        assert!(approx(disc.velocity.y, 40.0));
        assert!(approx(disc.position.y, 20.0));
    }

    #[test]
    fn test_wall_ignores_separated_disc() {
        let wall = Wall::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 5.0);
        let mut disc = Disc::new(Vec2::new(50.0, 40.0), 15.0, 1.0);
        disc.velocity = Vec2::new(0.0, -10.0);
        assert!(!collide_wall(&mut disc, &wall));
        assert!(approx(disc.velocity.y, -10.0));
    }

    #[test]
    fn test_disc_collision_conserves_momentum_and_energy() {
        let mut a = Disc::new(Vec2::new(0.0, 0.0), 15.0, 1.0);
        let mut b = Disc::new(Vec2::new(39.0, 0.0), 25.0, 20.0);
        a.velocity = Vec2::new(100.0, 0.0);

        let p_before = a.velocity.x * a.mass + b.velocity.x * b.mass;
        let e_before = 0.5 * a.mass * a.velocity.dot(a.velocity);

        assert!(collide_discs(&mut a, &mut b));

        let p_after = a.velocity.x * a.mass + b.velocity.x * b.mass;
        let e_after = 0.5 * a.mass * a.velocity.dot(a.velocity)
            + 0.5 * b.mass * b.velocity.dot(b.velocity);
        assert!(approx(p_before, p_after));
        assert!(approx(e_before, e_after));
        assert!(a.velocity.x < 0.0);
        assert!(b.velocity.x > 0.0);
        assert!((b.position - a.position).length() >= 40.0 - 1e-9);
    }

    #[test]
    fn test_integrate_applies_force_then_clears_it() {
        let mut disc = Disc::new(Vec2::ZERO, 25.0, 20.0);
        disc.force = Vec2::new(2000.0, 0.0);
        disc.integrate(0.1, 1.0);
        assert!(approx(disc.velocity.x, 10.0));
        assert!(approx(disc.position.x, 1.0));
        assert_eq!(disc.force, Vec2::ZERO);
    }

    #[test]
    fn test_confine_drops_outward_velocity() {
        let mut disc = Disc::new(Vec2::new(-5.0, 50.0), 25.0, 20.0);
        disc.velocity = Vec2::new(-10.0, 3.0);
        disc.confine(Vec2::new(25.0, 25.0), Vec2::new(475.0, 325.0));
        assert!(approx(disc.position.x, 25.0));
        assert!(approx(disc.velocity.x, 0.0));
        assert!(approx(disc.velocity.y, 3.0));
    }

    #[test]
    fn test_clamp_length() {
        let v = Vec2::new(300.0, 400.0).clamp_length(50.0);
        assert!(approx(v.length(), 50.0));
        let w = Vec2::new(3.0, 4.0).clamp_length(50.0);
        assert!(approx(w.length(), 5.0));
    }
}
