use image::GrayImage;

use crate::canvas::{SimulationHost, SurfaceSnapshot};
use crate::config::AppConfig;
use crate::display;
use crate::reaction_diffusion::{self, ReactionDiffusionField};
use crate::types::{ParameterValues, SeedType};
use crate::uniforms::{DisplayUniforms, SimulationUniforms};

/// Runs the simulation on the CPU and shades it into an RGBA frame.
pub struct CpuSimulation {
    field: ReactionDiffusionField,
    simulation: SimulationUniforms,
    display: DisplayUniforms,
    surface: [u32; 2],
    aspect: f32,
    render_scale: f32,
    steps_per_frame: usize,
    seed_image: Option<GrayImage>,
}

impl CpuSimulation {
    pub fn new(config: &AppConfig) -> Self {
        let seed_image = config.seed_image.as_deref().and_then(|path| {
            match reaction_diffusion::load_seed_image(path) {
                Ok(image) => {
                    log::info!("loaded seed image {}", path.display());
                    Some(image)
                }
                Err(err) => {
                    log::warn!("{err}");
                    None
                }
            }
        });
        let values = ParameterValues::default();

        Self {
            field: ReactionDiffusionField::new(1, 1),
            simulation: SimulationUniforms::from_parameters(&values, 1, 1),
            display: DisplayUniforms::from_parameters(&values),
            surface: [1, 1],
            aspect: 1.0,
            render_scale: config.render_scale,
            steps_per_frame: config.steps_per_frame,
            seed_image,
        }
    }

    pub fn surface_size(&self) -> [u32; 2] {
        self.surface
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn field(&self) -> &ReactionDiffusionField {
        &self.field
    }

    pub fn step(&mut self) {
        self.field.step(&self.simulation, self.steps_per_frame);
    }

    pub fn to_rgba8(&self) -> Vec<u8> {
        display::to_rgba8(&self.field, &self.display)
    }

    fn target_size(&self) -> (usize, usize) {
        let scale = |v: u32| ((v as f32 * self.render_scale).round() as usize).max(1);
        (scale(self.surface[0]), scale(self.surface[1]))
    }
}

impl SimulationHost for CpuSimulation {
    fn resize_surface(&mut self, width: u32, height: u32) {
        self.surface = [width.max(1), height.max(1)];
    }

    fn update_camera(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    fn setup_render_targets(&mut self) {
        let (width, height) = self.target_size();
        self.field.resize(width, height);
    }

    fn reset_texture_sizes(&mut self) {
        self.field.clear();
    }

    fn draw_first_frame(&mut self, seed: SeedType) {
        self.field.seed(seed, self.seed_image.as_ref());
    }

    fn apply_uniforms(&mut self, simulation: &SimulationUniforms, display: &DisplayUniforms) {
        self.simulation = *simulation;
        self.display = *display;
    }

    fn snapshot(&self) -> Option<SurfaceSnapshot> {
        let [width, height] = self.field.dimensions();
        Some(SurfaceSnapshot {
            width: width as u32,
            height: height as u32,
            rgba: self.to_rgba8(),
        })
    }
}
