use std::path::Path;

use image::imageops::FilterType;
use image::GrayImage;

use crate::error::PanelError;
use crate::types::SeedType;
use crate::uniforms::SimulationUniforms;

const SEED_TEXT: &str = "REACTION";
const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;

/// Gray-Scott field with two chemicals, A and B, on a wrapping grid.
pub struct ReactionDiffusionField {
    width: usize,
    height: usize,
    a: Vec<f32>,
    b: Vec<f32>,
    next_a: Vec<f32>,
    next_b: Vec<f32>,
    time: f32,
}

impl ReactionDiffusionField {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let len = width * height;
        Self {
            width,
            height,
            a: vec![1.0; len],
            b: vec![0.0; len],
            next_a: vec![0.0; len],
            next_b: vec![0.0; len],
            time: 0.0,
        }
    }

    pub fn dimensions(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn a(&self) -> &[f32] {
        &self.a
    }

    pub fn b(&self) -> &[f32] {
        &self.b
    }

    /// Reallocates the grid. Contents are lost.
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    /// Back to pure A with no B anywhere.
    pub fn clear(&mut self) {
        self.a.fill(1.0);
        self.b.fill(0.0);
        self.time = 0.0;
    }

    pub fn seed(&mut self, seed: SeedType, image: Option<&GrayImage>) {
        self.clear();
        match seed {
            SeedType::Circle => self.seed_circle(),
            SeedType::Square => self.seed_square(),
            SeedType::Text => self.seed_text(),
            SeedType::Image => match image {
                Some(image) => self.seed_image(image),
                None => {
                    log::warn!("no seed image loaded, falling back to circle");
                    self.seed_circle();
                }
            },
        }
    }

    pub fn step(&mut self, uniforms: &SimulationUniforms, steps: usize) {
        for _ in 0..steps {
            for y in 0..self.height {
                for x in 0..self.width {
                    let idx = self.idx(x, y);
                    let a = self.a[idx];
                    let b = self.b[idx];
                    let lap_a = Self::laplacian(&self.a, self.width, self.height, x, y);
                    let lap_b = Self::laplacian(&self.b, self.width, self.height, x, y);
                    let reaction = a * b * b;

                    let next_a = a
                        + (uniforms.d_a * lap_a - reaction + uniforms.f * (1.0 - a))
                            * uniforms.timestep;
                    let next_b = b
                        + (uniforms.d_b * lap_b + reaction - (uniforms.k + uniforms.f) * b)
                            * uniforms.timestep;

                    self.next_a[idx] = next_a.clamp(0.0, 1.0);
                    self.next_b[idx] = next_b.clamp(0.0, 1.0);
                }
            }

            std::mem::swap(&mut self.a, &mut self.next_a);
            std::mem::swap(&mut self.b, &mut self.next_b);
            self.time += uniforms.timestep;
        }
    }

    fn seed_circle(&mut self) {
        let (cx, cy) = self.center();
        let radius = self.seed_extent();
        for y in 0..self.height {
            for x in 0..self.width {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if (dx * dx + dy * dy).sqrt() <= radius {
                    self.plant(x, y);
                }
            }
        }
    }

    fn seed_square(&mut self) {
        let (cx, cy) = self.center();
        let half = self.seed_extent();
        for y in 0..self.height {
            for x in 0..self.width {
                if (x as f32 - cx).abs() <= half && (y as f32 - cy).abs() <= half {
                    self.plant(x, y);
                }
            }
        }
    }

    fn seed_text(&mut self) {
        let columns = SEED_TEXT.len() * (GLYPH_WIDTH + 1) - 1;
        let max_scale = (self.height / GLYPH_HEIGHT).max(1);
        let scale = (self.width * 3 / 4 / columns).clamp(1, max_scale);
        let origin_x = self.width.saturating_sub(columns * scale) / 2;
        let origin_y = self.height.saturating_sub(GLYPH_HEIGHT * scale) / 2;

        for (n, letter) in SEED_TEXT.chars().enumerate() {
            let Some(rows) = glyph(letter) else {
                continue;
            };
            let glyph_x = origin_x + n * (GLYPH_WIDTH + 1) * scale;
            for (row, bits) in rows.iter().enumerate() {
                for (col, bit) in bits.bytes().enumerate() {
                    if bit != b'#' {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            let x = glyph_x + col * scale + sx;
                            let y = origin_y + row * scale + sy;
                            if x < self.width && y < self.height {
                                self.plant(x, y);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Dark pixels of the image become B.
    fn seed_image(&mut self, image: &GrayImage) {
        let fitted = image::imageops::resize(
            image,
            self.width as u32,
            self.height as u32,
            FilterType::Triangle,
        );
        for (x, y, pixel) in fitted.enumerate_pixels() {
            if pixel.0[0] < 128 {
                self.plant(x as usize, y as usize);
            }
        }
    }

    fn plant(&mut self, x: usize, y: usize) {
        let idx = self.idx(x, y);
        self.a[idx] = 0.0;
        self.b[idx] = 1.0;
    }

    fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    fn seed_extent(&self) -> f32 {
        (self.width.min(self.height) as f32 / 10.0).max(2.0)
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn laplacian(field: &[f32], width: usize, height: usize, x: usize, y: usize) -> f32 {
        let xm = if x == 0 { width - 1 } else { x - 1 };
        let xp = if x + 1 == width { 0 } else { x + 1 };
        let ym = if y == 0 { height - 1 } else { y - 1 };
        let yp = if y + 1 == height { 0 } else { y + 1 };

        let idx = |xx: usize, yy: usize| -> usize { yy * width + xx };

        -field[idx(x, y)]
            + 0.2 * (field[idx(xm, y)] + field[idx(xp, y)] + field[idx(x, ym)] + field[idx(x, yp)])
            + 0.05
                * (field[idx(xm, ym)]
                    + field[idx(xp, ym)]
                    + field[idx(xm, yp)]
                    + field[idx(xp, yp)])
    }
}

pub fn load_seed_image(path: &Path) -> Result<GrayImage, PanelError> {
    let image = image::open(path).map_err(|source| PanelError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_luma8())
}

fn glyph(letter: char) -> Option<[&'static str; GLYPH_HEIGHT]> {
    let rows = match letter {
        'R' => ["####.", "#...#", "#...#", "####.", "#.#..", "#..#.", "#...#"],
        'E' => ["#####", "#....", "#....", "####.", "#....", "#....", "#####"],
        'A' => [".###.", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'C' => [".###.", "#...#", "#....", "#....", "#....", "#...#", ".###."],
        'T' => ["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."],
        'I' => [".###.", "..#..", "..#..", "..#..", "..#..", "..#..", ".###."],
        'O' => [".###.", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        'N' => ["#...#", "##..#", "#.#.#", "#.#.#", "#..##", "#...#", "#...#"],
        _ => return None,
    };
    Some(rows)
}
