//! Windowed walkthrough of a sector map.
//!
//! ```bash
//! RUST_LOG=debug cargo run --release -- maps/two_rooms.map \
//!     --lights maps/two_rooms.lights --texture tex/brick.ppm --dither
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use portal_rs::{
    assets::load_scene,
    config::{MoveConfig, RenderConfig, SCR_HEIGHT, SCR_WIDTH},
    engine::{Ray, first_hit},
    renderer::{RendererExt, Software, pack_frame},
    sim::{Controls, TicRunner},
    world::{Camera, SectorId},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Sector map (text)
    map: PathBuf,

    /// Light list (text)
    #[arg(long, value_name = "FILE")]
    lights: Option<PathBuf>,

    /// 64x64 P6 texture; repeat for ids 0, 1, 2, ...
    #[arg(long = "texture", value_name = "FILE")]
    textures: Vec<PathBuf>,

    #[arg(long, default_value_t = SCR_WIDTH)]
    width: usize,

    #[arg(long, default_value_t = SCR_HEIGHT)]
    height: usize,

    /// Ordered black/white dithering of grey surfaces (toggle with F1; F2
    /// logs the wall under the centre column)
    #[arg(long)]
    dither: bool,

    /// Start position; defaults to the centroid of the first sector
    #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
    spawn: Option<Vec<f32>>,

    /// Start heading in degrees, 0 = +x
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    angle: f32,

    /// Eye height above the spawn sector's floor
    #[arg(long, default_value_t = 1.5)]
    eye: f32,

    /// Largest floor rise a portal crossing accepts
    #[arg(long, default_value_t = portal_rs::config::MAX_STEP)]
    max_step: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    let scene = load_scene(&opts.map, opts.lights.as_deref(), &opts.textures)
        .with_context(|| format!("loading {}", opts.map.display()))?;

    let spawn = match opts.spawn.as_deref() {
        Some(&[x, y]) => Vec2::new(x, y),
        _ => scene.level.centroid(SectorId(0))?,
    };
    let mut camera = Camera::spawn(&scene.level, spawn, opts.angle.to_radians(), opts.eye)
        .with_context(|| format!("spawning at {spawn}"))?;
    log::info!("camera at {} in sector {}", camera.pos(), camera.sector());

    let (w, h) = (opts.width, opts.height);
    let mut renderer = Software::new(RenderConfig {
        dither: opts.dither,
        ..RenderConfig::with_size(w, h)
    });
    let mut sim = TicRunner::new(MoveConfig {
        max_step: opts.max_step,
        ..MoveConfig::default()
    });

    let mut win = Window::new("portal_rs", w, h, WindowOptions::default())?;
    win.set_target_fps(60);

    let mut packed: Vec<u32> = Vec::with_capacity(w * h);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() {
        let controls = poll_controls(&win);
        if controls.contains(Controls::QUIT) {
            break;
        }
        if win.is_key_pressed(Key::F1, KeyRepeat::No) {
            let on = !renderer.config().dither;
            renderer.set_dither(on);
            log::info!("dithering {}", if on { "on" } else { "off" });
        }

        if win.is_key_pressed(Key::F2, KeyRepeat::No) {
            let ray = Ray::for_column(&camera, w / 2, w, renderer.config().focal_len);
            match first_hit(&ray, &scene.level, camera.sector(), 0.0) {
                Some(hit) => log::info!(
                    "centre column: sector {} wall {} depth {:.2} after {} portals",
                    hit.sector,
                    hit.wall,
                    hit.depth(),
                    hit.crossings()
                ),
                None => log::info!("centre column: no wall"),
            }
        }

        sim.pump(&scene.level, &mut camera, controls);

        let t0 = Instant::now();
        let mut shown = Ok(());
        renderer.draw_frame(w, h, &scene, &camera, |fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            pack_frame(fb, &mut packed);
            shown = win.update_with_buffer(&packed, w, h);
        });
        shown?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            log::info!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

/// Sample the keys held this frame.
fn poll_controls(win: &Window) -> Controls {
    let down = |keys: &[Key]| keys.iter().any(|&k| win.is_key_down(k));
    let mut c = Controls::empty();

    let alt = down(&[Key::LeftAlt, Key::RightAlt]);
    if alt {
        /* Alt + ←/→  = strafe */
        c.set(Controls::STRAFE_LEFT, down(&[Key::Left]));
        c.set(Controls::STRAFE_RIGHT, down(&[Key::Right]));
    } else {
        c.set(Controls::TURN_LEFT, down(&[Key::Left]));
        c.set(Controls::TURN_RIGHT, down(&[Key::Right]));
    }

    if down(&[Key::A]) {
        c |= Controls::STRAFE_LEFT;
    }
    if down(&[Key::D]) {
        c |= Controls::STRAFE_RIGHT;
    }
    c.set(Controls::FORWARD, down(&[Key::Up, Key::W]));
    c.set(Controls::BACK, down(&[Key::Down, Key::S]));
    c.set(Controls::QUIT, down(&[Key::Escape, Key::Q]));
    c
}
