pub mod collision;
mod controls;
mod tic;

pub use collision::{CrossingRefused, MoveOutcome, check_crossing, resolve_move};
pub use controls::Controls;
pub use tic::{DT, SIM_FPS, TicRunner, step};
