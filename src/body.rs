use crate::config::{SpawnConfig, World};
use crate::graphics::Canvas;
use crate::math::Rgb;
use kurbo::{Point, Vec2};
use rand::Rng;
use std::ops::Range;

/// One circle: its physical state and its colour
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Centre, in viewport coordinates
    pub position: Point,
    /// Units per second
    pub velocity: Vec2,
    pub radius: f64,
    /// Per-frame multiplicative velocity damping
    pub friction: f64,
    /// Fraction of speed kept by a wall bounce
    pub restitution: f64,
    /// Set while the pointer holds this body; integration is suspended
    pub dragged: bool,
    pub color: Rgb,
}

impl Body {
    pub fn new(position: Point, velocity: Vec2, radius: f64, color: Rgb) -> Self {
        Body {
            position,
            velocity,
            radius,
            friction: 1.0,
            restitution: 1.0,
            dragged: false,
            color,
        }
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }

    /// A body at `position` with random per-axis velocity, radius and hue
    pub fn random<R: Rng + ?Sized>(position: Point, spawn: &SpawnConfig, rng: &mut R) -> Self {
        let vx = random_signed(rng, &spawn.speed);
        let vy = random_signed(rng, &spawn.speed);
        let radius = sample(rng, &spawn.radius);
        let color = Rgb::from_hsv(rng.gen::<f64>(), 1.0, 1.0);

        Body::new(position, Vec2::new(vx, vy), radius, color)
            .with_friction(spawn.friction)
            .with_restitution(spawn.restitution)
    }

    /// Advances one frame: Euler step, wall bounce, then damping and gravity.
    ///
    /// Does nothing while the body is dragged.
    pub fn integrate(&mut self, delta_time: f64, world: &World) {
        if self.dragged {
            return;
        }

        self.position.x += self.velocity.x * delta_time;
        self.position.y += self.velocity.y * delta_time;

        let (x, vx) = self.bounce(self.position.x, self.velocity.x, world.width);
        let (y, vy) = self.bounce(self.position.y, self.velocity.y, world.height);
        self.position = Point::new(x, y);

        // Gravity goes in after damping and is not scaled by the frame time
        self.velocity.x = vx * self.friction;
        self.velocity.y = vy * self.friction + world.gravity;
    }

    /// Draws the body as a filled circle
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.draw_circle(self.position, self.radius, self.color);
    }

    /// Inclusive point-in-circle test
    pub fn hit_test(&self, point: Point) -> bool {
        (point - self.position).hypot2() <= self.radius * self.radius
    }

    /// Resolves one axis against the walls at `0` and `max`.
    ///
    /// Only one wall is checked per frame: the far wall wins when a body is wider
    /// than the viewport.
    fn bounce(&self, position: f64, velocity: f64, max: f64) -> (f64, f64) {
        if position + self.radius >= max {
            (max - self.radius, -velocity * self.restitution)
        } else if position - self.radius <= 0.0 {
            (self.radius, -velocity * self.restitution)
        } else {
            (position, velocity)
        }
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, range: &Range<f64>) -> f64 {
    if range.is_empty() {
        range.start
    } else {
        rng.gen_range(range.clone())
    }
}

fn random_signed<R: Rng + ?Sized>(rng: &mut R, magnitude: &Range<f64>) -> f64 {
    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    sign * sample(rng, magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const WORLD: World = World {
        width: 800.0,
        height: 600.0,
        gravity: 50.0,
    };

    fn ball(x: f64, y: f64, vx: f64, vy: f64) -> Body {
        Body::new(Point::new(x, y), Vec2::new(vx, vy), 50.0, Rgb::BLUE)
            .with_friction(0.99)
            .with_restitution(0.9)
    }

    #[test]
    fn free_flight_is_euler_then_damping() {
        let mut b = ball(400.0, 300.0, 200.0, 200.0);
        b.integrate(0.5, &WORLD);

        assert_eq!(b.position, Point::new(500.0, 400.0));
        assert_relative_eq!(b.velocity.x, 198.0);
        assert_relative_eq!(b.velocity.y, 200.0 * 0.99 + 50.0);
    }

    #[test]
    fn right_wall_clamps_and_reflects() {
        let mut b = ball(740.0, 300.0, 100.0, 0.0);
        b.integrate(1.0, &World { gravity: 0.0, ..WORLD });

        assert_eq!(b.position.x, 750.0);
        assert_relative_eq!(b.velocity.x, -100.0 * 0.9 * 0.99);
    }

    #[test]
    fn left_wall_clamps_and_reflects() {
        let mut b = ball(60.0, 300.0, -100.0, 0.0);
        b.integrate(1.0, &World { gravity: 0.0, ..WORLD });

        assert_eq!(b.position.x, 50.0);
        assert_relative_eq!(b.velocity.x, 100.0 * 0.9 * 0.99);
    }

    #[test]
    fn touching_a_wall_counts_as_a_hit() {
        let mut b = ball(750.0, 300.0, 10.0, 0.0);
        b.integrate(0.0, &World { gravity: 0.0, ..WORLD });
        assert!(b.velocity.x < 0.0);
    }

    #[test]
    fn floor_bounce_then_gravity() {
        let mut b = ball(400.0, 540.0, 0.0, 100.0);
        b.integrate(1.0, &WORLD);

        assert_eq!(b.position.y, 550.0);
        assert_relative_eq!(b.velocity.y, -100.0 * 0.9 * 0.99 + 50.0);
    }

    #[test]
    fn oversized_body_only_hits_far_wall() {
        let mut b = ball(410.0, 300.0, -10.0, 0.0);
        b.radius = 500.0;
        b.integrate(1.0, &World { gravity: 0.0, ..WORLD });

        // Both walls overlap; only the far one is resolved this frame
        assert_eq!(b.position.x, 300.0);
        assert_relative_eq!(b.velocity.x, 10.0 * 0.9 * 0.99);
    }

    #[test]
    fn dragged_body_is_frozen() {
        let mut b = ball(400.0, 300.0, 200.0, 200.0);
        b.dragged = true;
        let before = b.clone();
        b.integrate(1.0, &WORLD);
        assert_eq!(b, before);
    }

    #[test]
    fn hit_test_boundary_is_inclusive() {
        let b = Body::new(Point::new(10.0, 20.0), Vec2::ZERO, 5.0, Rgb::BLUE);
        assert!(b.hit_test(Point::new(13.0, 24.0)));
        assert!(b.hit_test(Point::new(10.0, 20.0)));
        assert!(!b.hit_test(Point::new(13.0, 24.0001)));
        assert!(!b.hit_test(Point::new(15.0001, 20.0)));
    }

    #[test]
    fn random_bodies_stay_in_range() {
        let spawn = SpawnConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let b = Body::random(Point::new(1.0, 2.0), &spawn, &mut rng);
            assert_eq!(b.position, Point::new(1.0, 2.0));
            assert!((10.0..70.0).contains(&b.radius), "radius {}", b.radius);
            for v in [b.velocity.x, b.velocity.y] {
                assert!((100.0..=300.0).contains(&v.abs()), "speed {}", v);
            }
            assert_eq!(b.friction, 0.99);
            assert_eq!(b.restitution, 0.9);
            assert!(!b.dragged);
        }
    }

    #[test]
    fn random_bodies_cover_both_signs() {
        let spawn = SpawnConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let bodies: Vec<Body> = (0..100)
            .map(|_| Body::random(Point::ZERO, &spawn, &mut rng))
            .collect();
        assert!(bodies.iter().any(|b| b.velocity.x < 0.0));
        assert!(bodies.iter().any(|b| b.velocity.x > 0.0));
        assert!(bodies.iter().any(|b| b.velocity.y < 0.0));
        assert!(bodies.iter().any(|b| b.velocity.y > 0.0));
    }

    #[test]
    fn empty_spawn_range_uses_its_start() {
        let spawn = SpawnConfig {
            radius: 25.0..25.0,
            ..SpawnConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(Body::random(Point::ZERO, &spawn, &mut rng).radius, 25.0);
    }
}
