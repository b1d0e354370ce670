use glam::Vec4;

use crate::types::{ParameterValues, RenderingStyle, GRADIENT_STOP_COUNT};

/// Values read by the simulation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationUniforms {
    pub f: f32,
    pub k: f32,
    pub d_a: f32,
    pub d_b: f32,
    pub timestep: f32,
    pub resolution: [f32; 2],
}

impl SimulationUniforms {
    pub fn from_parameters(values: &ParameterValues, width: u32, height: u32) -> Self {
        Self {
            f: values.f,
            k: values.k,
            d_a: values.d_a,
            d_b: values.d_b,
            timestep: values.timestep,
            resolution: [width as f32, height as f32],
        }
    }
}

/// Values read by the display pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayUniforms {
    /// Raw style index; values outside the known styles are tolerated.
    pub rendering_style: i32,
    pub color_stops: [Vec4; GRADIENT_STOP_COUNT],
}

impl DisplayUniforms {
    pub fn from_parameters(values: &ParameterValues) -> Self {
        Self {
            rendering_style: values.rendering_style.index(),
            color_stops: std::array::from_fn(|i| values.gradient[i].uniform_value()),
        }
    }

    pub fn style(&self) -> Option<RenderingStyle> {
        RenderingStyle::from_index(self.rendering_style)
    }
}
