//! # Physics Module
//!
//! Per-actor kinematics: an acceleration accumulator integrated into a
//! speed-capped velocity, with movement gated by the collision oracle.
//!
//! The same integrator drives the knight and every monster. Only the source
//! of the acceleration differs (player input or AI).

use crate::game::world::MoveGate;
use crate::utils::Vector2;
use serde::{Deserialize, Serialize};

/// What happens to an actor whose next position is not permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionResponse {
    /// Stay in place for this tick; velocity is kept.
    #[default]
    Cancel,
    /// Stay in place and turn the velocity: reversed when heading along an
    /// axis, rotated 90° otherwise. Can oscillate against diagonal walls.
    Bounce,
}

/// Result of one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Position changed by the given displacement.
    Moved(Vector2),
    /// The gate refused the move; position unchanged.
    Blocked,
    /// Nothing to do, the body is at rest.
    Idle,
}

/// Movement tunables shared by actors of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementProfile {
    /// Magnitude added per `accelerate_at_angle` call, units/s².
    pub acceleration: f32,
    /// Speed cap, units/s.
    pub max_speed: f32,
    /// Natural slowdown when no acceleration was applied, units/s².
    pub deceleration: f32,
}

impl Default for MovementProfile {
    fn default() -> Self {
        Self {
            acceleration: 200.0,
            max_speed: 50.0,
            deceleration: 200.0,
        }
    }
}

/// Position, velocity and the per-tick acceleration accumulator.
///
/// # Examples
///
/// ```
/// use dungeonlife::{MovementProfile, PhysicsBody, StepOutcome, Vector2};
///
/// let mut body = PhysicsBody::new(Vector2::ZERO, MovementProfile::default());
/// body.accelerate_at_angle(0.0);
/// let outcome = body.step(0.1, &|_: Vector2| true);
/// assert!(matches!(outcome, StepOutcome::Moved(_)));
/// assert!(body.position.x > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    pub position: Vector2,
    velocity: Vector2,
    acceleration: Vector2,
    pub profile: MovementProfile,
    pub response: CollisionResponse,
}

impl PhysicsBody {
    pub fn new(position: Vector2, profile: MovementProfile) -> Self {
        Self {
            position,
            velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
            profile,
            response: CollisionResponse::Cancel,
        }
    }

    pub fn with_response(mut self, response: CollisionResponse) -> Self {
        self.response = response;
        self
    }

    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector2) {
        self.velocity = velocity;
    }

    /// Acceleration accumulated so far this tick.
    pub fn acceleration(&self) -> Vector2 {
        self.acceleration
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Adds an acceleration impulse of the profile's magnitude at `degrees`.
    pub fn accelerate_at_angle(&mut self, degrees: f32) {
        self.acceleration += Vector2::from_angle(degrees, self.profile.acceleration);
    }

    /// Accelerates from `from` toward `target`. Coincident points add nothing.
    pub fn accelerate_towards(&mut self, from: Vector2, target: Vector2) {
        let delta = target - from;
        if !delta.is_zero() {
            self.accelerate_at_angle(delta.angle());
        }
    }

    /// Rescales velocity to `speed`, keeping heading. A body at rest gets
    /// heading (1, 0).
    pub fn set_speed(&mut self, speed: f32) {
        if self.velocity.is_zero() {
            self.velocity = Vector2::new(speed, 0.0);
        } else {
            self.velocity = self.velocity.with_length(speed);
        }
    }

    /// Points the velocity at `degrees`, keeping speed.
    pub fn set_motion_angle(&mut self, degrees: f32) {
        self.velocity = self.velocity.with_angle(degrees);
    }

    /// Hard stop.
    pub fn stop(&mut self) {
        self.velocity = Vector2::ZERO;
    }

    /// Moves the body without physics and clears all motion.
    pub fn teleport(&mut self, position: Vector2) {
        self.position = position;
        self.velocity = Vector2::ZERO;
        self.acceleration = Vector2::ZERO;
    }

    /// Advances one tick.
    ///
    /// Integrates acceleration, decelerates if none was applied, clamps the
    /// speed to `[0, max_speed]`, asks `gate` whether the resulting position
    /// is allowed and commits or applies the collision response. The
    /// acceleration accumulator is cleared on every path.
    pub fn step<G: MoveGate + ?Sized>(&mut self, dt: f32, gate: &G) -> StepOutcome {
        self.velocity += self.acceleration * dt;
        let mut speed = self.velocity.length();

        if self.acceleration.is_zero() {
            speed -= self.profile.deceleration * dt;
        }
        let speed = speed.clamp(0.0, self.profile.max_speed.max(0.0));
        self.velocity = self.velocity.with_length(speed);
        self.acceleration = Vector2::ZERO;

        if self.velocity.is_zero() {
            return StepOutcome::Idle;
        }

        let displacement = self.velocity * dt;
        let candidate = self.position + displacement;
        if gate.permits(candidate) {
            self.position = candidate;
            StepOutcome::Moved(displacement)
        } else {
            if self.response == CollisionResponse::Bounce {
                self.bounce();
            }
            StepOutcome::Blocked
        }
    }

    fn bounce(&mut self) {
        let heading = self.velocity.angle();
        let axis_aligned = [0.0_f32, 90.0, 180.0, 270.0, 360.0]
            .iter()
            .any(|axis| (heading - axis).abs() < 1e-3);
        let turn = if axis_aligned { 180.0 } else { 90.0 };
        self.velocity = self.velocity.rotated(turn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn open(_: Vector2) -> bool {
        true
    }

    fn body() -> PhysicsBody {
        PhysicsBody::new(
            Vector2::new(100.0, 100.0),
            MovementProfile {
                acceleration: 200.0,
                max_speed: 75.0,
                deceleration: 100.0,
            },
        )
    }

    #[test]
    fn test_sustained_acceleration_caps_at_max_speed() {
        let mut body = body();
        let mut last = 0.0;
        for _ in 0..120 {
            body.accelerate_at_angle(0.0);
            body.step(DT, &open);
            assert!(body.speed() >= last);
            assert!(body.speed() <= 75.0 + 1e-3);
            last = body.speed();
        }
        assert!((body.speed() - 75.0).abs() < 1e-3);
    }

    #[test]
    fn test_deceleration_without_input() {
        let mut body = body();
        body.set_speed(60.0);
        let mut last = body.speed();
        for _ in 0..60 {
            body.step(DT, &open);
            assert!(body.speed() <= last);
            assert!(body.speed() >= 0.0);
            last = body.speed();
        }
        assert_eq!(body.speed(), 0.0);
        assert_eq!(body.velocity(), Vector2::ZERO);
    }

    #[test]
    fn test_acceleration_resets_every_tick() {
        let mut body = body();
        body.accelerate_at_angle(90.0);
        body.step(DT, &open);
        assert_eq!(body.acceleration(), Vector2::ZERO);
    }

    #[test]
    fn test_blocked_move_keeps_position() {
        let mut body = body();
        body.set_speed(50.0);
        let start = body.position;
        let outcome = body.step(DT, &|_: Vector2| false);
        assert_eq!(outcome, StepOutcome::Blocked);
        assert_eq!(body.position, start);
    }

    #[test]
    fn test_permitted_move_commits_velocity_times_dt() {
        let mut body = body();
        body.set_speed(50.0);
        let start = body.position;
        body.accelerate_at_angle(0.0);
        let outcome = body.step(DT, &open);
        let expected = start + body.velocity() * DT;
        assert_eq!(outcome, StepOutcome::Moved(body.velocity() * DT));
        assert!((body.position.x - expected.x).abs() < 1e-4);
        assert!((body.position.y - expected.y).abs() < 1e-4);
    }

    #[test]
    fn test_set_speed_on_rest_points_right() {
        let mut body = body();
        body.set_speed(500.0);
        assert_eq!(body.velocity(), Vector2::new(500.0, 0.0));
        body.set_motion_angle(180.0);
        assert!((body.velocity().x + 500.0).abs() < 1e-2);
        assert!(body.velocity().y.abs() < 1e-2);
    }

    #[test]
    fn test_zero_velocity_step_is_idle() {
        let mut body = body();
        assert_eq!(body.step(DT, &open), StepOutcome::Idle);
        assert_eq!(body.velocity(), Vector2::ZERO);
    }

    #[test]
    fn test_bounce_reverses_axis_heading() {
        let mut body = body().with_response(CollisionResponse::Bounce);
        body.set_speed(40.0);
        body.step(DT, &|_: Vector2| false);
        assert!(body.velocity().x < 0.0);
        assert!(body.velocity().y.abs() < 1e-3);
    }

    #[test]
    fn test_bounce_rotates_diagonal_heading() {
        let mut body = body().with_response(CollisionResponse::Bounce);
        body.set_velocity(Vector2::new(20.0, 20.0));
        body.step(DT, &|_: Vector2| false);
        let v = body.velocity();
        assert!(v.x < 0.0 && v.y > 0.0);
    }

    #[test]
    fn test_accelerate_towards_same_point_is_noop() {
        let mut body = body();
        body.accelerate_towards(Vector2::new(1.0, 1.0), Vector2::new(1.0, 1.0));
        assert_eq!(body.acceleration(), Vector2::ZERO);
    }
}
