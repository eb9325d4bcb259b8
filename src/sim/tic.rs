use std::time::{Duration, Instant};

use super::{Controls, MoveOutcome, resolve_move};
use crate::config::MoveConfig;
use crate::world::{Camera, Level};

pub const SIM_FPS: u32 = 60;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Advance the camera by `dt` seconds of held `controls`: turn first, then
/// hand the displacement to the movement resolver.
pub fn step(
    level: &Level,
    camera: &mut Camera,
    controls: Controls,
    dt: f32,
    cfg: &MoveConfig,
) -> MoveOutcome {
    let turn = controls.turn_axis();
    if turn != 0.0 {
        camera.turn(turn * cfg.turn_speed * dt);
    }

    let delta = controls.displacement(camera, cfg.move_speed * dt);
    if delta == glam::Vec2::ZERO {
        return MoveOutcome::Unchanged;
    }
    let target = camera.pos() + delta;
    resolve_move(level, camera, target, cfg)
}

/// Runs fixed-rate tics so movement speed does not depend on frame rate.
pub struct TicRunner {
    last: Instant,
    cfg: MoveConfig,
}

impl TicRunner {
    pub fn new(cfg: MoveConfig) -> Self {
        Self {
            last: Instant::now(),
            cfg,
        }
    }

    #[inline]
    pub fn config(&self) -> &MoveConfig {
        &self.cfg
    }

    /// Advance enough tics to synchronise simulation with real time.
    /// Returns how many sector crossings happened.
    pub fn pump(&mut self, level: &Level, camera: &mut Camera, controls: Controls) -> usize {
        let mut crossings = 0;
        while self.last.elapsed() >= TIC {
            if let MoveOutcome::Crossed { .. } = step(level, camera, controls, DT, &self.cfg) {
                crossings += 1;
            }
            self.last += TIC;
        }
        crossings
    }
}

impl Default for TicRunner {
    fn default() -> Self {
        Self::new(MoveConfig::default())
    }
}
