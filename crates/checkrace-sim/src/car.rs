use std::{
    f32::consts::{PI, TAU},
    sync::Arc,
};

use checkrace_engine::{Agent, AgentId, Point2, RankMarker, Transform};
use rand::Rng as _;
use rand_distr::Normal;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Driving characteristics shared by every car of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveParams {
    /// Distance covered per second.
    pub speed: f32,
    /// Maximum heading change per second, in radians.
    pub max_turn_rate: f32,
    /// Standard deviation of the per-step heading noise, in radians.
    pub heading_noise: f32,
}

impl Default for DriveParams {
    fn default() -> Self {
        Self {
            speed: 8.0,
            max_turn_rate: 2.5,
            heading_noise: 0.05,
        }
    }
}

/// A kinematic car that steers toward the next checkpoint it has not captured.
///
/// The car keeps its own idea of which checkpoint comes next and advances it on
/// every capture callback. Once the final checkpoint is captured the car parks
/// itself and reports as disabled until restarted.
#[derive(Debug, Clone)]
pub struct SimCar {
    id: AgentId,
    waypoints: Arc<[Point2]>,
    target: usize,
    transform: Transform,
    spawn: Transform,
    params: DriveParams,
    noise: Normal<f32>,
    rng: Pcg32,
    enabled: bool,
    primary: bool,
    manual_heading: Option<f32>,
    marker: RankMarker,
    captures: usize,
}

impl SimCar {
    pub(crate) fn new(
        id: AgentId,
        waypoints: Arc<[Point2]>,
        params: DriveParams,
        noise: Normal<f32>,
        rng: Pcg32,
        spawn: Transform,
    ) -> Self {
        let target = target_from(&waypoints, spawn.position);
        Self {
            id,
            waypoints,
            target,
            transform: spawn,
            spawn,
            params,
            noise,
            rng,
            enabled: true,
            primary: false,
            manual_heading: None,
            marker: RankMarker::None,
            captures: 0,
        }
    }

    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Index of the checkpoint the car is steering toward.
    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    #[must_use]
    pub const fn marker(&self) -> RankMarker {
        self.marker
    }

    #[must_use]
    pub const fn captures(&self) -> usize {
        self.captures
    }

    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.primary
    }

    /// Whether the car has captured the final checkpoint.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.target >= self.waypoints.len()
    }

    /// Moves the car onto another track.
    ///
    /// Takes effect on the next restart, which puts the car at `spawn`.
    pub(crate) fn retarget(&mut self, waypoints: Arc<[Point2]>, spawn: Transform) {
        self.waypoints = waypoints;
        self.spawn = spawn;
    }

    /// Heading requested by outside input for the primary car.
    ///
    /// Ignored while the car is not flagged primary; a primary car without
    /// input stays where it is.
    pub const fn steer(&mut self, heading: f32) {
        self.manual_heading = Some(heading);
    }

    /// Advances the car by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }

        let heading = if self.primary {
            let Some(heading) = self.manual_heading else {
                return;
            };
            heading
        } else {
            let Some(target) = self.waypoints.get(self.target).copied() else {
                return;
            };
            let desired = self.transform.position.heading_to(target);
            let max_turn = self.params.max_turn_rate * dt;
            let turn = wrap_angle(desired - self.transform.rotation).clamp(-max_turn, max_turn);
            self.transform.rotation + turn + self.rng.sample(self.noise)
        };

        self.transform.rotation = wrap_angle(heading);
        self.transform.position = self
            .transform
            .position
            .advanced(self.transform.rotation, self.params.speed * dt);
    }
}

impl Agent for SimCar {
    fn position(&self) -> Point2 {
        self.transform.position
    }

    fn rotation(&self) -> f32 {
        self.transform.rotation
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn on_checkpoint_captured(&mut self) {
        self.captures += 1;
        self.target += 1;
        if self.is_finished() {
            self.enabled = false;
            tracing::debug!(car = %self.id, captures = self.captures, "car finished");
        }
    }

    fn set_rank_marker(&mut self, marker: RankMarker) {
        self.marker = marker;
    }

    fn set_spawn(&mut self, spawn: Transform) {
        self.spawn = spawn;
    }

    fn restart(&mut self) {
        self.transform = self.spawn;
        self.target = target_from(&self.waypoints, self.spawn.position);
        self.enabled = true;
    }

    fn set_primary_control(&mut self, primary: bool) {
        self.primary = primary;
    }
}

/// The checkpoint after the one nearest to `position`.
fn target_from(waypoints: &[Point2], position: Point2) -> usize {
    let nearest = waypoints
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.distance(position).total_cmp(&b.distance(position)))
        .map_or(0, |(index, _)| index);
    (nearest + 1).min(waypoints.len())
}

/// Wraps an angle into `[-PI, PI)`.
fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;

    fn waypoints() -> Arc<[Point2]> {
        Arc::from([
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ])
    }

    fn quiet_car(spawn: Transform) -> SimCar {
        let params = DriveParams {
            heading_noise: 0.0,
            ..DriveParams::default()
        };
        SimCar::new(
            AgentId(0),
            waypoints(),
            params,
            Normal::new(0.0, 0.0).unwrap(),
            Pcg32::seed_from_u64(1),
            spawn,
        )
    }

    #[test]
    fn test_new_car_targets_checkpoint_after_spawn() {
        let car = quiet_car(Transform::default());
        assert_eq!(car.target(), 1);

        let car = quiet_car(Transform::new(Point2::new(9.5, 0.5), 0.0));
        assert_eq!(car.target(), 2);
    }

    #[test]
    fn test_step_drives_toward_target() {
        let mut car = quiet_car(Transform::default());
        car.step(0.5);
        assert!((car.position().x - 4.0).abs() < 1e-4);
        assert!(car.position().y.abs() < 1e-4);
    }

    #[test]
    fn test_turn_rate_is_limited() {
        // facing away from the target
        let mut car = quiet_car(Transform::new(Point2::new(0.0, 0.0), PI));
        car.step(0.1);
        let turned = wrap_angle(car.rotation() - PI).abs();
        assert!((turned - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_final_capture_disables_car_until_restart() {
        let mut car = quiet_car(Transform::default());
        car.on_checkpoint_captured();
        assert!(car.is_enabled());
        car.on_checkpoint_captured();
        assert!(car.is_finished());
        assert!(!car.is_enabled());

        let before = car.position();
        car.step(1.0);
        assert_eq!(car.position(), before);

        car.restart();
        assert!(car.is_enabled());
        assert_eq!(car.target(), 1);
        assert_eq!(car.captures(), 2);
    }

    #[test]
    fn test_restart_uses_latest_spawn() {
        let mut car = quiet_car(Transform::default());
        car.step(1.0);
        let spawn = Transform::new(Point2::new(10.0, 0.5), 1.0);
        car.set_spawn(spawn);
        car.restart();
        assert_eq!(car.transform(), spawn);
        assert_eq!(car.target(), 2);
    }

    #[test]
    fn test_retarget_applies_on_restart() {
        let mut car = quiet_car(Transform::default());
        let track: Arc<[Point2]> = Arc::from([Point2::new(0.0, 50.0), Point2::new(0.0, 80.0)]);
        let spawn = Transform::new(Point2::new(0.0, 50.0), PI / 2.0);
        car.retarget(Arc::clone(&track), spawn);
        assert_eq!(car.position(), Point2::ORIGIN);

        car.restart();
        assert_eq!(car.transform(), spawn);
        assert_eq!(car.target(), 1);
        car.step(1.0);
        assert!((car.position().y - 58.0).abs() < 1e-4);
    }

    #[test]
    fn test_primary_car_waits_for_input() {
        let mut car = quiet_car(Transform::default());
        car.set_primary_control(true);
        car.step(1.0);
        assert_eq!(car.position(), Point2::ORIGIN);

        car.steer(PI / 2.0);
        car.step(1.0);
        assert!(car.position().x.abs() < 1e-4);
        assert!((car.position().y - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
    }
}
