use crate::body::Body;
use crate::config::{SimConfig, World};
use crate::graphics::Canvas;
use crate::math::Rgb;
use crate::pointer::{DragState, PointerButton, PointerEvent, PointerEventKind, PointerTracker};
use kurbo::{Point, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;

/// The body list, the pointer state machine and the queue feeding it
pub struct Simulation {
    config: SimConfig,
    world: World,
    bodies: Vec<Body>,
    pointer: PointerTracker,
    events: VecDeque<PointerEvent>,
    rng: StdRng,
}

impl Simulation {
    /// Starts with a single seed body in the middle of the viewport
    pub fn new(config: SimConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let world = World::from(&config);
        let mut sim = Simulation {
            config,
            world,
            bodies: Vec::new(),
            pointer: PointerTracker::new(),
            events: VecDeque::new(),
            rng,
        };
        let seed = sim.seed_body();
        sim.bodies.push(seed);
        sim
    }

    /// Starts with exactly `bodies`, no seed body
    pub fn with_bodies(config: SimConfig, bodies: Vec<Body>) -> Self {
        let mut sim = Simulation::new(config);
        sim.bodies = bodies;
        sim
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// All bodies, in insertion order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// The body the pointer currently holds
    pub fn active_body(&self) -> Option<&Body> {
        self.pointer.active().and_then(|i| self.bodies.get(i))
    }

    pub fn drag_state(&self) -> DragState {
        self.pointer.state()
    }

    /// Queues a pointer event for the next [`advance`](Self::advance)
    pub fn push_event(&mut self, event: PointerEvent) {
        self.events.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Drops queued input without applying it
    pub fn discard_events(&mut self) {
        self.events.clear();
    }

    /// Runs one frame: queued pointer events in arrival order, then the physics step
    pub fn advance(&mut self, delta_time: f64) {
        while let Some(event) = self.events.pop_front() {
            self.handle_event(event, delta_time);
        }
        self.step(delta_time);
    }

    /// Applies a single pointer event. `delta_time` is the current frame time,
    /// used to turn drag motion into velocity.
    pub fn handle_event(&mut self, event: PointerEvent, delta_time: f64) {
        match (event.kind, event.button) {
            (PointerEventKind::Pressed, PointerButton::Primary) => {
                self.pointer.press(&mut self.bodies, event.position);
            }
            (PointerEventKind::Released, PointerButton::Primary) => {
                self.pointer.release(&mut self.bodies);
            }
            (PointerEventKind::Dragged, _) => {
                self.pointer.drag(&mut self.bodies, event.position, delta_time);
            }
            (PointerEventKind::Pressed, PointerButton::Secondary) => {
                self.spawn(event.position);
            }
            (PointerEventKind::Released, PointerButton::Secondary) => {}
        }
    }

    /// Appends a randomly sized, coloured and launched body at `at`
    pub fn spawn(&mut self, at: Point) -> &Body {
        let body = Body::random(at, &self.config.spawn, &mut self.rng);
        log::info!(
            "spawned body {} at ({:.1}, {:.1}) r={:.1} v=({:.1}, {:.1})",
            self.bodies.len(),
            at.x,
            at.y,
            body.radius,
            body.velocity.x,
            body.velocity.y
        );
        self.bodies.push(body);
        &self.bodies[self.bodies.len() - 1]
    }

    /// Integrates every body in list order
    pub fn step(&mut self, delta_time: f64) {
        log::trace!("step: dt={:.4}s bodies={}", delta_time, self.bodies.len());
        for body in self.bodies.iter_mut() {
            body.integrate(delta_time, &self.world);
        }
    }

    /// Draws every body in list order, so later bodies end up on top
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for body in &self.bodies {
            body.render(canvas);
        }
    }

    /// Puts the first body back at its starting state and lets go of any drag.
    ///
    /// Queued input is dropped. No body is removed.
    pub fn recenter(&mut self) {
        self.pointer.release(&mut self.bodies);
        self.events.clear();
        let seed = self.seed_body();
        match self.bodies.first_mut() {
            Some(first) => *first = seed,
            None => self.bodies.push(seed),
        }
        log::info!("recentered the seed body");
    }

    fn seed_body(&self) -> Body {
        let center = Point::new(self.config.width / 2.0, self.config.height / 2.0);
        Body::new(center, Vec2::new(200.0, 200.0), 50.0, Rgb::BLUE)
            .with_friction(0.99)
            .with_restitution(0.9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::PixelCanvas;

    fn seeded() -> Simulation {
        Simulation::new(SimConfig {
            seed: Some(1),
            ..SimConfig::default()
        })
    }

    #[test]
    fn starts_with_centered_seed_body() {
        let sim = seeded();
        assert_eq!(sim.bodies().len(), 1);
        let b = &sim.bodies()[0];
        assert_eq!(b.position, Point::new(400.0, 300.0));
        assert_eq!(b.velocity, Vec2::new(200.0, 200.0));
        assert_eq!(b.radius, 50.0);
        assert_eq!(b.color, Rgb::BLUE);
        assert_eq!(sim.drag_state(), DragState::Idle);
    }

    #[test]
    fn events_wait_for_advance() {
        let mut sim = seeded();
        let at = Point::new(10.0, 10.0);
        sim.push_event(PointerEvent::pressed(PointerButton::Secondary, at));
        assert_eq!(sim.bodies().len(), 1);
        assert_eq!(sim.pending_events(), 1);

        sim.advance(1.0 / 60.0);
        assert_eq!(sim.bodies().len(), 2);
        assert_eq!(sim.pending_events(), 0);
    }

    #[test]
    fn secondary_release_does_nothing() {
        let mut sim = seeded();
        let center = Point::new(400.0, 300.0);
        sim.handle_event(PointerEvent::pressed(PointerButton::Primary, center), 0.1);
        sim.handle_event(PointerEvent::released(PointerButton::Secondary, center), 0.1);
        assert!(sim.active_body().is_some());
    }

    #[test]
    fn drag_within_a_frame_happens_before_the_step() {
        let mut sim = seeded();
        let grab = Point::new(400.0, 300.0);
        sim.push_event(PointerEvent::pressed(PointerButton::Primary, grab));
        sim.push_event(PointerEvent::dragged(PointerButton::Primary, Point::new(410.0, 300.0)));
        sim.advance(0.5);

        let b = sim.active_body().expect("body should be held");
        // Held bodies are not integrated, so gravity and damping did not apply
        assert_eq!(b.position, Point::new(410.0, 300.0));
        assert_eq!(b.velocity, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn recenter_keeps_every_body() {
        let mut sim = seeded();
        sim.spawn(Point::new(100.0, 100.0));
        sim.step(0.5);
        let spawned = sim.bodies()[1].clone();
        let grab = sim.bodies()[0].position;
        sim.handle_event(PointerEvent::pressed(PointerButton::Primary, grab), 0.1);
        let away = Point::new(700.0, 50.0);
        sim.handle_event(PointerEvent::dragged(PointerButton::Primary, away), 0.1);
        sim.push_event(PointerEvent::released(PointerButton::Primary, grab));

        sim.recenter();

        assert_eq!(sim.bodies().len(), 2);
        assert_eq!(sim.drag_state(), DragState::Idle);
        assert_eq!(sim.pending_events(), 0);
        assert!(sim.bodies().iter().all(|b| !b.dragged));
        assert_eq!(sim.bodies()[0].position, Point::new(400.0, 300.0));
        assert_eq!(sim.bodies()[0].velocity, Vec2::new(200.0, 200.0));
        assert_eq!(sim.bodies()[1].position, spawned.position);
    }

    #[test]
    fn render_draws_every_body() {
        let mut sim = seeded();
        sim.spawn(Point::new(100.0, 100.0));
        let mut canvas = PixelCanvas::new(800, 600);
        canvas.clear(Rgb::BLACK);
        sim.render(&mut canvas);

        assert_eq!(canvas.pixel(400, 300), Some(Rgb::BLUE));
        assert_ne!(canvas.pixel(100, 100), Some(Rgb::BLACK));
    }
}
