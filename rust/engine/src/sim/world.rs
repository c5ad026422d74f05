// rust/engine/src/sim/world.rs
#![forbid(unsafe_code)]

/*
TileWorld: a tile-granular side scroller behind the `Emulator` trait

Physics run in whole tiles on fixed periods, so holds measured in ticks map
to distances the same way they do against a real emulator:

- running moves one column every `run_period` ticks while exactly one of
  Left/Right is held; the player cannot walk left of the camera
- a fresh A press while standing starts a jump of up to `max_jump` rows,
  one row every `rise_period` ticks for as long as A stays held
- otherwise the player falls one row every `fall_period` ticks
- head-butting a special block turns it to ground and pays a coin
- ground hazards walk and fall; airborne hazards fly left through terrain,
  hopping two rows up and back, so they always reach and pass the player
- landing on a hazard from above removes it; any other contact is death
- falling below the bottom row is death; reaching the goal column wins

The player sprite is 2x2 tiles; positions below are its top-left corner in
level coordinates.
*/

use serde_json::json;

use crate::control::{Emulator, Frame, GameStats};
use crate::engine::{tile, Button, ButtonSet, InputEvent, TileGrid, H, W};

use super::level::Level;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    pub run_period: u64,
    pub rise_period: u64,
    pub fall_period: u64,
    /// Rows a full-length jump rises.
    pub max_jump: u32,
    /// Ticks between hazard moves.
    pub hazard_period: u64,
    /// Hard episode limit; the game reports over once reached.
    pub max_ticks: u64,
    /// View column the camera keeps the player at (or left of).
    pub camera_anchor: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            run_period: 3,
            rise_period: 2,
            fall_period: 2,
            max_jump: 5,
            hazard_period: 8,
            max_ticks: 20_000,
            camera_anchor: 8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Mob {
    row: i32,
    col: i32,
    code: u8,
    dir: i32,
    home_row: i32,
    alive: bool,
}

impl Mob {
    #[inline]
    fn airborne(&self) -> bool {
        self.code == tile::AIRBORNE_HAZARD
    }
}

#[derive(Clone, Debug)]
pub struct TileWorld {
    cfg: WorldConfig,
    level: Level,

    terrain: Vec<Vec<u8>>,
    mobs: Vec<Mob>,

    px: i32,
    py: i32,
    held: ButtonSet,
    jump_queued: bool,
    rise_left: u32,
    descending: bool,

    camera: usize,
    ticks: u64,
    score: u64,
    coins: u64,
    stomps: u64,
    distance: usize,
    dead: bool,
    complete: bool,
}

impl TileWorld {
    pub fn new(level: Level, cfg: WorldConfig) -> Self {
        let mut world = Self {
            cfg,
            level,
            terrain: Vec::new(),
            mobs: Vec::new(),
            px: 0,
            py: 0,
            held: ButtonSet::EMPTY,
            jump_queued: false,
            rise_left: 0,
            descending: false,
            camera: 0,
            ticks: 0,
            score: 0,
            coins: 0,
            stomps: 0,
            distance: 0,
            dead: false,
            complete: false,
        };
        world.reset();
        world
    }

    pub fn config(&self) -> &WorldConfig {
        &self.cfg
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Player's top-left tile in level coordinates, as (row, col).
    pub fn player_tile(&self) -> (i32, i32) {
        (self.py, self.px)
    }

    pub fn camera(&self) -> usize {
        self.camera
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn held(&self) -> ButtonSet {
        self.held
    }

    fn width(&self) -> i32 {
        self.level.width() as i32
    }

    // ------------------------------------------------------------------
    // Terrain queries
    // ------------------------------------------------------------------

    fn terrain_at(&self, row: i32, col: i32) -> u8 {
        if row < 0 || col < 0 {
            return tile::AIR;
        }
        self.terrain
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(tile::AIR)
    }

    /// Level sides and ceiling are solid; below the bottom row is open.
    fn solid(&self, row: i32, col: i32) -> bool {
        if col < 0 || col >= self.width() || row < 0 {
            return true;
        }
        tile::is_solid(self.terrain_at(row, col))
    }

    fn fits(&self, row: i32, col: i32) -> bool {
        (0..2).all(|dr| (0..2).all(|dc| !self.solid(row + dr, col + dc)))
    }

    fn standing(&self) -> bool {
        self.solid(self.py + 2, self.px) || self.solid(self.py + 2, self.px + 1)
    }

    fn occupied_by_mob(&self, row: i32, col: i32, skip: usize) -> bool {
        self.mobs
            .iter()
            .enumerate()
            .any(|(i, m)| i != skip && m.alive && m.row == row && m.col == col)
    }

    // ------------------------------------------------------------------
    // Per-tick updates
    // ------------------------------------------------------------------

    fn move_player(&mut self) {
        let t = self.ticks;
        let dx = match (self.held.contains(Button::Right), self.held.contains(Button::Left)) {
            (true, false) => 1,
            (false, true) => -1,
            _ => 0,
        };
        if dx != 0 && t % self.cfg.run_period == 0 {
            let nx = self.px + dx;
            if nx >= self.camera as i32 && self.fits(self.py, nx) {
                self.px = nx;
            }
        }

        if std::mem::take(&mut self.jump_queued) && self.standing() {
            self.rise_left = self.cfg.max_jump;
        }

        if self.rise_left > 0 && self.held.contains(Button::A) {
            self.descending = false;
            if t % self.cfg.rise_period == 0 {
                if self.fits(self.py - 1, self.px) {
                    self.py -= 1;
                    self.rise_left -= 1;
                } else {
                    self.bump_head();
                    self.rise_left = 0;
                }
            }
        } else {
            self.rise_left = 0;
            if self.standing() {
                self.descending = false;
            } else if t % self.cfg.fall_period == 0 {
                self.py += 1;
                self.descending = true;
            }
        }

        if self.py + 1 >= H as i32 {
            tracing::debug!(col = self.px, "fell out of the level");
            self.dead = true;
        }
    }

    fn bump_head(&mut self) {
        let row = self.py - 1;
        for col in [self.px, self.px + 1] {
            if self.terrain_at(row, col) == tile::SPECIAL_BLOCK {
                self.terrain[row as usize][col as usize] = tile::GROUND;
                self.coins += 1;
                self.score += 200;
                tracing::debug!(row, col, "special block bumped");
            }
        }
    }

    fn move_mobs(&mut self) {
        if self.ticks % self.cfg.hazard_period != 0 {
            return;
        }
        // Only hazards near the screen move.
        let active = (self.camera + W + 2) as i32;
        for i in 0..self.mobs.len() {
            let mob = self.mobs[i];
            if !mob.alive || mob.col > active {
                continue;
            }
            let mut next = mob;
            if mob.airborne() {
                next.row = if mob.row == mob.home_row {
                    mob.home_row - 2
                } else {
                    mob.home_row
                };
                next.col = mob.col - 1;
                if next.col < 0 {
                    next.alive = false;
                }
            } else if !self.solid(mob.row + 1, mob.col) {
                next.row += 1;
                if next.row >= H as i32 {
                    next.alive = false;
                }
            } else {
                let nc = mob.col + mob.dir;
                if self.solid(mob.row, nc) || self.occupied_by_mob(mob.row, nc, i) {
                    next.dir = -mob.dir;
                } else {
                    next.col = nc;
                }
            }
            self.mobs[i] = next;
        }
    }

    fn resolve_contacts(&mut self) {
        let (py, px) = (self.py, self.px);
        for i in 0..self.mobs.len() {
            let m = self.mobs[i];
            if !m.alive || !(py..py + 2).contains(&m.row) || !(px..px + 2).contains(&m.col) {
                continue;
            }
            if self.descending && m.row == py + 1 {
                self.mobs[i].alive = false;
                self.stomps += 1;
                self.score += 100;
                tracing::debug!(code = m.code, col = m.col, "hazard stomped");
            } else {
                tracing::debug!(code = m.code, col = m.col, "hit by hazard");
                self.dead = true;
                return;
            }
        }
    }

    fn follow_camera(&mut self) {
        let max_cam = self.level.width().saturating_sub(W);
        let anchor = self.camera + self.cfg.camera_anchor;
        if self.px > anchor as i32 {
            self.camera = (self.px as usize - self.cfg.camera_anchor).min(max_cam);
        }
        self.distance = self.distance.max(self.px.max(0) as usize);
        if self.px + 1 >= self.level.goal_col() as i32 {
            tracing::debug!(ticks = self.ticks, "goal reached");
            self.complete = true;
        }
    }
}

impl Emulator for TileWorld {
    fn reset(&mut self) {
        self.terrain = self.level.rows().to_vec();
        self.mobs = self
            .level
            .spawns()
            .iter()
            .map(|s| Mob {
                row: s.row as i32,
                col: s.col as i32,
                code: s.code,
                dir: -1,
                home_row: s.row as i32,
                alive: true,
            })
            .collect();
        let start = self.level.start();
        self.py = start.row as i32;
        self.px = start.col as i32;
        self.held = ButtonSet::EMPTY;
        self.jump_queued = false;
        self.rise_left = 0;
        self.descending = false;
        self.camera = 0;
        self.ticks = 0;
        self.score = 0;
        self.coins = 0;
        self.stomps = 0;
        self.distance = start.col;
        self.dead = false;
        self.complete = false;
    }

    fn tick(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.ticks += 1;
        self.move_player();
        if self.dead {
            return;
        }
        self.move_mobs();
        self.resolve_contacts();
        if self.dead {
            return;
        }
        self.follow_camera();
    }

    fn game_area(&self) -> TileGrid {
        let mut grid = TileGrid::empty();
        for r in 0..H {
            for c in 0..W {
                grid.set(r, c, self.terrain_at(r as i32, (self.camera + c) as i32));
            }
        }

        let cam = self.camera as i32;
        let in_view = |row: i32, col: i32| {
            (0..H as i32).contains(&row) && (cam..cam + W as i32).contains(&col)
        };

        for m in self.mobs.iter().filter(|m| m.alive) {
            if in_view(m.row, m.col) {
                grid.set(m.row as usize, (m.col - cam) as usize, m.code);
            }
        }
        if !self.dead {
            for (r, c) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                let (row, col) = (self.py + r, self.px + c);
                if in_view(row, col) {
                    grid.set(row as usize, (col - cam) as usize, tile::PLAYER);
                }
            }
        }
        grid
    }

    fn send_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press(b) => {
                if b == Button::A && !self.held.contains(Button::A) {
                    self.jump_queued = true;
                }
                self.held = self.held.with(b);
            }
            InputEvent::Release(b) => {
                self.held = self.held.difference(ButtonSet::EMPTY.with(b));
            }
        }
    }

    fn is_game_over(&self) -> bool {
        self.dead || self.complete || self.ticks >= self.cfg.max_ticks
    }

    fn game_state(&self) -> GameStats {
        let mut stats = GameStats::new();
        stats.insert("score".into(), json!(self.score));
        stats.insert("coins".into(), json!(self.coins));
        stats.insert("stomps".into(), json!(self.stomps));
        stats.insert("distance".into(), json!(self.distance));
        stats.insert("ticks".into(), json!(self.ticks));
        stats.insert("level_complete".into(), json!(self.complete));
        stats.insert("dead".into(), json!(self.dead));
        stats
    }

    fn grab_frame(&self) -> Frame {
        const PX: usize = 8;
        let grid = self.game_area();
        let (width, height) = (W * PX, H * PX);
        let mut rgb = vec![0u8; width * height * 3];
        for r in 0..H {
            for c in 0..W {
                let color = palette(grid.at(r, c));
                for y in r * PX..(r + 1) * PX {
                    for x in c * PX..(c + 1) * PX {
                        let i = (y * width + x) * 3;
                        rgb[i..i + 3].copy_from_slice(&color);
                    }
                }
            }
        }
        Frame { width, height, rgb }
    }
}

fn palette(code: u8) -> [u8; 3] {
    match code {
        tile::PLAYER => [220, 40, 40],
        tile::WALL => [150, 80, 30],
        tile::GROUND => [190, 110, 50],
        tile::SPECIAL_BLOCK => [240, 200, 40],
        tile::TUNNEL => [40, 170, 60],
        tile::HAZARD_A | tile::HAZARD_B | tile::HAZARD_C => [120, 60, 20],
        tile::AIRBORNE_HAZARD => [200, 60, 200],
        _ => [100, 140, 250],
    }
}
