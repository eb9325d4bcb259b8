//! ---------------------------------------------------------------------------
//! Portal column renderer
//!
//! * One ray per screen column; each column is drawn far-to-near through the
//!   chain of portals it sees, clipped to the opening of the portal it came
//!   through, so no pixel is written twice.
//! * Walls are textured and lit once per column; floors and ceilings are
//!   flat gradients darkened by the number of portals crossed.
//! ---------------------------------------------------------------------------

use std::ops::Range;

use glam::Vec3;

use crate::{
    config::RenderConfig,
    engine::{
        Extent, Ray, Screen,
        math::approx_len,
        projection::{tex_u, tex_v},
        shading::{illumination, shade},
        visibility::{WallHit, nearest_wall, past},
    },
    renderer::{FrameBuffer, Renderer, Rgb},
    world::{Camera, Scene, Sector, SectorId, Texture},
};

/// Solid wall that ended a column's traversal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnHit {
    pub sector: SectorId,
    pub wall: usize,
    pub depth: f32,
    pub s: f32,
    pub near_vertex: bool,
    /// Portals crossed before the hit.
    pub sector_dist: u32,
}

/// CPU column renderer.
pub struct Software {
    cfg: RenderConfig,
    screen: Screen,
    scratch: FrameBuffer,
    hits: Vec<Option<ColumnHit>>,
}

impl Default for Software {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

/// Per-column state shared by every recursion level.
struct Column<'a> {
    x: usize,
    ray: Ray<'a>,
    scene: &'a Scene,
    eye_z: f32,
}

/// Rows `top..bot` still owned by the sector being drawn.
#[derive(Clone, Copy)]
struct Window {
    top: i32,
    bot: i32,
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.cfg.width || h != self.cfg.height {
            self.cfg.width = w;
            self.cfg.height = h;
            self.cfg.aspect = w as f32 / h as f32;
            self.screen = Screen::new(&self.cfg);
        }
        if self.scratch.width != w || self.scratch.height != h {
            self.scratch.resize(w, h);
        }
        self.scratch.fill(Vec3::ZERO);
        self.hits.clear();
        self.hits.resize(w, None);
    }

    fn draw_view(&mut self, scene: &Scene, camera: &Camera) {
        let window = Window {
            top: 0,
            bot: self.screen.h as i32,
        };
        for x in 0..self.screen.w {
            let col = Column {
                x,
                ray: Ray::for_column(camera, x, self.screen.w, self.cfg.focal_len),
                scene,
                eye_z: camera.eye_z(),
            };
            self.render_sector(&col, camera.sector(), 0.0, 0, window);
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgb], usize, usize),
    {
        submit(&self.scratch.pixels, self.scratch.width, self.scratch.height);
    }
}

/*──────────────────────── column rendering ───────────────────────────*/
impl Software {
    pub fn new(cfg: RenderConfig) -> Self {
        let screen = Screen::new(&cfg);
        Self {
            scratch: FrameBuffer::new(cfg.width, cfg.height),
            hits: vec![None; cfg.width],
            screen,
            cfg,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    pub fn set_dither(&mut self, on: bool) {
        self.cfg.dither = on;
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.scratch
    }

    /// Solid wall that column `x` ended on in the last frame, if any.
    pub fn column_hit(&self, x: usize) -> Option<ColumnHit> {
        self.hits.get(x).copied().flatten()
    }

    /// Draw sector `id` into `win` of the column: far side of any portal
    /// first, then this sector's wall bands, ceiling and floor.
    fn render_sector(
        &mut self,
        col: &Column,
        id: SectorId,
        min_t: f32,
        sector_dist: u32,
        win: Window,
    ) {
        let sector = match col.scene.level.sector(id) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("column {}: {e}", col.x);
                return;
            }
        };
        let Some(hit) = nearest_wall(&col.ray, sector, min_t) else {
            return;
        };
        let wall = &sector.walls[hit.wall];
        let depth = hit.isect.t;

        let ext = Extent::of(&self.screen, sector.ceil_z, sector.floor_z, col.eye_z, depth);
        let ceil_row = self.screen.clamp_row(ext.ceil).clamp(win.top, win.bot);
        let floor_row = self.screen.clamp_row(ext.floor).clamp(ceil_row, win.bot);

        let light = illumination(
            col.ray.at(depth),
            wall.normal(),
            depth,
            &col.scene.lights,
            &self.cfg,
        );
        let tex = col.scene.textures.texture_or_missing(wall.texture_id);
        let band = Band {
            tex,
            u: tex_u(hit.isect.s, approx_len(wall.dir()), self.cfg.texel_density),
            ext,
            wall_h: sector.clearance(),
            light,
        };

        let neighbour = wall.portal.and_then(|next| match col.scene.level.sector(next) {
            Ok(nb) => Some((next, nb)),
            Err(e) => {
                log::warn!("column {}: {e}", col.x);
                None
            }
        });

        match neighbour {
            Some((next, nb)) => {
                let nb_ext = Extent::of(&self.screen, nb.ceil_z, nb.floor_z, col.eye_z, depth);
                let open_top = self.screen.clamp_row(nb_ext.ceil).clamp(ceil_row, floor_row);
                let open_bot = self.screen.clamp_row(nb_ext.floor).clamp(open_top, floor_row);

                if open_top < open_bot {
                    let opening = Window {
                        top: open_top,
                        bot: open_bot,
                    };
                    self.render_sector(col, next, past(depth), sector_dist + 1, opening);
                }

                // lintel above the opening, sill below it
                self.wall_rows(col.x, ceil_row..open_top, &band);
                self.wall_rows(col.x, open_bot..floor_row, &band);
            }
            None => {
                self.record_hit(col.x, id, &hit, sector_dist);
                if hit.isect.near_vertex {
                    for y in ceil_row..floor_row {
                        self.scratch.put(col.x, y as usize, self.cfg.edge_colour);
                    }
                } else {
                    self.wall_rows(col.x, ceil_row..floor_row, &band);
                }
            }
        }

        self.flat_rows(col.x, win.top..ceil_row, sector, sector_dist, Surface::Ceiling);
        self.flat_rows(col.x, floor_row..win.bot, sector, sector_dist, Surface::Floor);
    }

    fn record_hit(&mut self, x: usize, sector: SectorId, hit: &WallHit, sector_dist: u32) {
        self.hits[x] = Some(ColumnHit {
            sector,
            wall: hit.wall,
            depth: hit.isect.t,
            s: hit.isect.s,
            near_vertex: hit.isect.near_vertex,
            sector_dist,
        });
    }

    /// Textured, lit wall pixels for `rows`.
    fn wall_rows(&mut self, x: usize, rows: Range<i32>, band: &Band) {
        let density = self.cfg.texel_density;
        for y in rows {
            let v = tex_v(y as f32 + 0.5, &band.ext, band.wall_h, density);
            let texel = band.tex.texel(band.u, v);
            let px = shade(texel, band.light, x, y as usize, self.cfg.dither);
            self.scratch.put(x, y as usize, px);
        }
    }

    /// Floor or ceiling gradient: brightest at the screen edge, black at the
    /// horizon, dimmed by `fog_per_sector` for every portal crossed.
    fn flat_rows(
        &mut self,
        x: usize,
        rows: Range<i32>,
        sector: &Sector,
        sector_dist: u32,
        surface: Surface,
    ) {
        let fog = (1.0 - self.cfg.fog_per_sector * sector_dist as f32).max(0.0);
        let half_h = self.screen.half_h;
        let base = match surface {
            Surface::Ceiling => sector.ceil_colour,
            Surface::Floor => sector.floor_colour,
        };
        for y in rows {
            let yc = y as f32 + 0.5;
            let gradient = ((yc - half_h).abs() / half_h).min(1.0);
            let px = shade(base, gradient * fog, x, y as usize, self.cfg.dither);
            self.scratch.put(x, y as usize, px);
        }
    }
}

#[derive(Clone, Copy)]
enum Surface {
    Ceiling,
    Floor,
}

/// Texture column shared by a wall's lintel, sill or full face.
struct Band<'a> {
    tex: &'a Texture,
    u: i32,
    ext: Extent,
    wall_h: f32,
    light: f32,
}

/*──────────────────────────────── Tests ───────────────────────────────*/
