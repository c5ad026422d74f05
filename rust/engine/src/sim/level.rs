// rust/engine/src/sim/level.rs
#![forbid(unsafe_code)]

/*
Level maps for the headless world

Text format: exactly `H` lines of equal width, one glyph per tile.

  .  air            #  ground         W  wall          ?  special block
  T  tunnel         g/k/s  ground hazards              f  airborne hazard
  M  player start (top-left of the 2x2 sprite)         |  goal column

Hazards and the player are spawned as entities; the tiles underneath them
are air.
*/

use rand::prelude::*;

use crate::engine::{code_for_glyph, tile, Cell, H};
use crate::error::{EngineError, Result};

/// An entity placed in the level at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub code: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    rows: Vec<Vec<u8>>,
    start: Cell,
    goal_col: usize,
    spawns: Vec<Spawn>,
}

impl Level {
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.len() != H {
            return Err(EngineError::LevelHeight {
                rows: lines.len(),
                expected: H,
            });
        }

        let width = lines[0].chars().count();
        let mut rows = Vec::with_capacity(H);
        let mut start: Option<Cell> = None;
        let mut goal_col: Option<usize> = None;
        let mut spawns = Vec::new();

        for (r, line) in lines.iter().enumerate() {
            let n = line.chars().count();
            if n != width {
                return Err(EngineError::RaggedLevel {
                    row: r,
                    width: n,
                    expected: width,
                });
            }

            let mut row = vec![tile::AIR; width];
            for (c, ch) in line.chars().enumerate() {
                match ch {
                    '|' => goal_col = Some(goal_col.map_or(c, |g| g.min(c))),
                    'M' => {
                        let s = start.get_or_insert(Cell::new(r, c));
                        s.row = s.row.min(r);
                        s.col = s.col.min(c);
                    }
                    _ => {
                        let code = code_for_glyph(ch).ok_or(EngineError::UnknownGlyph {
                            glyph: ch,
                            row: r,
                            col: c,
                        })?;
                        if tile::ALL_HAZARDS.contains(&code) {
                            spawns.push(Spawn { row: r, col: c, code });
                        } else {
                            row[c] = code;
                        }
                    }
                }
            }
            rows.push(row);
        }

        let start = start.ok_or(EngineError::MissingStart)?;
        Ok(Self {
            rows,
            start,
            goal_col: goal_col.unwrap_or(width.saturating_sub(1)),
            spawns,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Static tile at (row, col); air beyond the right edge.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> u8 {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(tile::AIR)
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal_col(&self) -> usize {
        self.goal_col
    }

    pub fn spawns(&self) -> &[Spawn] {
        &self.spawns
    }
}

/// Seeded random level generator.
#[derive(Clone, Copy, Debug)]
pub struct LevelGen {
    /// Level width in columns (at least 40).
    pub len: usize,
    /// Salt mixed into the episode seed for an independent stream.
    pub seed_salt: u64,
}

impl LevelGen {
    pub const DEFAULT_SEED_SALT: u64 = 0x5EED_1E7E_15AB_0001;
    const GROUND_TOP: usize = 14;
    const SAFE_PREFIX: usize = 12;
    const SAFE_SUFFIX: usize = 12;

    pub fn new(len: usize) -> Self {
        Self {
            len: len.max(40),
            seed_salt: Self::DEFAULT_SEED_SALT,
        }
    }

    pub fn generate(&self, seed: u64) -> Level {
        let mut rng = StdRng::seed_from_u64(seed ^ self.seed_salt);
        let width = self.len;

        let mut rows = vec![vec![tile::AIR; width]; H];
        for row in rows.iter_mut().skip(Self::GROUND_TOP) {
            row.fill(tile::GROUND);
        }
        let mut spawns = Vec::new();

        let mut c = Self::SAFE_PREFIX;
        while c + Self::SAFE_SUFFIX < width {
            match rng.gen_range(0..6u8) {
                0 => c += rng.gen_range(3..8),
                1 => {
                    let h = rng.gen_range(1..=2);
                    for row in rows.iter_mut().take(Self::GROUND_TOP).skip(Self::GROUND_TOP - h) {
                        row[c] = tile::WALL;
                    }
                    c += rng.gen_range(4..7);
                }
                2 => {
                    let h = rng.gen_range(2..=3);
                    for row in rows.iter_mut().take(Self::GROUND_TOP).skip(Self::GROUND_TOP - h) {
                        row[c] = tile::TUNNEL;
                        row[c + 1] = tile::TUNNEL;
                    }
                    c += 2 + rng.gen_range(4..7);
                }
                3 => {
                    let w = rng.gen_range(2..=3);
                    for row in rows.iter_mut().skip(Self::GROUND_TOP) {
                        row[c..c + w].fill(tile::AIR);
                    }
                    c += w + 4;
                }
                4 => {
                    rows[Self::GROUND_TOP - 5][c + 1] = tile::SPECIAL_BLOCK;
                    c += 5;
                }
                _ => {
                    let spawn = if rng.gen_bool(0.2) {
                        Spawn {
                            row: Self::GROUND_TOP - 3,
                            col: c + 2,
                            code: tile::AIRBORNE_HAZARD,
                        }
                    } else {
                        let code = *tile::GROUND_HAZARDS
                            .choose(&mut rng)
                            .unwrap_or(&tile::HAZARD_A);
                        Spawn {
                            row: Self::GROUND_TOP - 1,
                            col: c + 2,
                            code,
                        }
                    };
                    spawns.push(spawn);
                    c += 6;
                }
            }
        }

        Level {
            rows,
            start: Cell::new(Self::GROUND_TOP - 2, 2),
            goal_col: width - 4,
            spawns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_text(width: usize, goal: usize) -> String {
        let mut out = String::new();
        for r in 0..H {
            let line: String = (0..width)
                .map(|c| match (r, c) {
                    (0, c) if c == goal => '|',
                    (12 | 13, 2 | 3) => 'M',
                    (14 | 15, _) => '#',
                    _ => '.',
                })
                .collect();
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    #[test]
    fn parse_flat_level() {
        let lvl = Level::parse(&flat_text(40, 35)).unwrap();
        assert_eq!(lvl.width(), 40);
        assert_eq!(lvl.start(), Cell::new(12, 2));
        assert_eq!(lvl.goal_col(), 35);
        assert_eq!(lvl.at(14, 0), tile::GROUND);
        assert_eq!(lvl.at(12, 2), tile::AIR);
        assert_eq!(lvl.at(14, 400), tile::AIR);
    }

    #[test]
    fn hazards_become_spawns() {
        let mut text = flat_text(30, 25);
        // Row 13, column 10.
        let idx = 13 * 31 + 10;
        text.replace_range(idx..idx + 1, "g");
        let lvl = Level::parse(&text).unwrap();
        assert_eq!(
            lvl.spawns(),
            &[Spawn {
                row: 13,
                col: 10,
                code: tile::HAZARD_A
            }]
        );
        assert_eq!(lvl.at(13, 10), tile::AIR);
    }

    #[test]
    fn malformed_levels_are_rejected() {
        assert!(matches!(
            Level::parse("M.\n##\n"),
            Err(EngineError::LevelHeight { rows: 2, .. })
        ));

        let mut ragged = flat_text(30, 25);
        // Row 1 gains a column.
        ragged.insert(31 + 5, '.');
        assert!(matches!(
            Level::parse(&ragged),
            Err(EngineError::RaggedLevel {
                row: 1,
                width: 31,
                expected: 30
            })
        ));

        let no_start = flat_text(30, 25).replace('M', ".");
        assert!(matches!(Level::parse(&no_start), Err(EngineError::MissingStart)));

        let bad = flat_text(30, 25).replacen('.', "x", 1);
        assert!(matches!(Level::parse(&bad), Err(EngineError::UnknownGlyph { glyph: 'x', .. })));
    }

    #[test]
    fn generator_is_seed_deterministic() {
        let g = LevelGen::new(120);
        assert_eq!(g.generate(7), g.generate(7));
        let lvl = g.generate(7);
        assert_eq!(lvl.width(), 120);
        assert_eq!(lvl.goal_col(), 116);
        // Safe start: ground under the player, nothing solid in the first columns.
        for c in 0..LevelGen::SAFE_PREFIX {
            assert_eq!(lvl.at(14, c), tile::GROUND);
            assert_eq!(lvl.at(13, c), tile::AIR);
        }
    }
}
