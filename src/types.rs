use serde::{Deserialize, Serialize};

use crate::gradient::GradientStop;

pub const GRADIENT_STOP_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: Option<f32>,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, step: Option<f32>) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }
}

#[cfg(test)]
impl ParamRange {
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Declared bounds of the reaction-diffusion coefficients.
#[derive(Clone, Copy, Debug)]
pub struct ParameterMetadata {
    pub f: ParamRange,
    pub k: ParamRange,
    pub d_a: ParamRange,
    pub d_b: ParamRange,
    pub timestep: ParamRange,
}

impl Default for ParameterMetadata {
    fn default() -> Self {
        Self {
            f: ParamRange::new(0.0, 0.1, Some(0.0001)),
            k: ParamRange::new(0.0, 0.1, Some(0.0001)),
            d_a: ParamRange::new(0.0, 1.0, Some(0.0001)),
            d_b: ParamRange::new(0.0, 1.0, Some(0.0001)),
            timestep: ParamRange::new(0.0, 2.0, None),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeedType {
    Circle,
    Square,
    Text,
    Image,
}

impl SeedType {
    pub const ALL: [SeedType; 4] = [Self::Circle, Self::Square, Self::Text, Self::Image];

    pub fn label(self) -> &'static str {
        match self {
            Self::Circle => "Circle",
            Self::Square => "Square",
            Self::Text => "Text",
            Self::Image => "Image",
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Self::Circle => 0,
            Self::Square => 1,
            Self::Text => 2,
            Self::Image => 3,
        }
    }

    pub fn from_index(index: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|seed| seed.index() == index)
    }
}

/// Display styles understood by the shading stage, keyed by the integer the
/// display uniform carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderingStyle {
    Gradient,
    RedBlobOriginal,
    RedBlobAlt1,
    RedBlobAlt2,
    Rainbow,
    BlackAndWhite,
    Raw,
}

impl RenderingStyle {
    pub const ALL: [RenderingStyle; 7] = [
        Self::Gradient,
        Self::RedBlobOriginal,
        Self::RedBlobAlt1,
        Self::RedBlobAlt2,
        Self::Rainbow,
        Self::BlackAndWhite,
        Self::Raw,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Gradient => "Gradient",
            Self::RedBlobOriginal => "Red Blob Games (original)",
            Self::RedBlobAlt1 => "Red Blob Games (alt 1)",
            Self::RedBlobAlt2 => "Red Blob Games (alt 2)",
            Self::Rainbow => "Rainbow",
            Self::BlackAndWhite => "Black and white",
            Self::Raw => "Raw",
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Self::Gradient => 0,
            Self::RedBlobOriginal => 1,
            Self::RedBlobAlt1 => 2,
            Self::RedBlobAlt2 => 3,
            Self::Rainbow => 4,
            Self::BlackAndWhite => 5,
            Self::Raw => 6,
        }
    }

    pub fn from_index(index: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.index() == index)
    }
}

/// Named Gray-Scott feed/kill pairs offered by the presets dropdown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub f: f32,
    pub k: f32,
}

pub const PRESETS: [Preset; 6] = [
    Preset {
        name: "Mitosis",
        f: 0.0367,
        k: 0.0649,
    },
    Preset {
        name: "Coral growth",
        f: 0.0545,
        k: 0.062,
    },
    Preset {
        name: "Fingerprints",
        f: 0.055,
        k: 0.062,
    },
    Preset {
        name: "Worms",
        f: 0.078,
        k: 0.061,
    },
    Preset {
        name: "Solitons",
        f: 0.03,
        k: 0.062,
    },
    Preset {
        name: "Spiral waves",
        f: 0.018,
        k: 0.051,
    },
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterValues {
    #[serde(skip)]
    pub preset: Option<usize>,
    pub f: f32,
    pub k: f32,
    pub d_a: f32,
    pub d_b: f32,
    pub timestep: f32,
    pub seed_type: SeedType,
    pub rendering_style: RenderingStyle,
    pub gradient: [GradientStop; GRADIENT_STOP_COUNT],
}

impl Default for ParameterValues {
    fn default() -> Self {
        Self {
            preset: None,
            f: 0.054,
            k: 0.062,
            d_a: 0.2097,
            d_b: 0.105,
            timestep: 1.0,
            seed_type: SeedType::Circle,
            rendering_style: RenderingStyle::Gradient,
            gradient: [
                GradientStop::new([0, 0, 0], 0.0),
                GradientStop::new([0, 255, 0], 0.2),
                GradientStop::new([255, 255, 0], 0.21),
                GradientStop::new([255, 0, 0], 0.4),
                GradientStop::new([255, 255, 255], 0.6),
            ],
        }
    }
}

impl ParameterValues {
    /// Pulls loaded values back inside the declared bounds.
    pub fn sanitize(&mut self, metadata: &ParameterMetadata) {
        self.f = metadata.f.clamp(self.f);
        self.k = metadata.k.clamp(self.k);
        self.d_a = metadata.d_a.clamp(self.d_a);
        self.d_b = metadata.d_b.clamp(self.d_b);
        self.timestep = metadata.timestep.clamp(self.timestep);
        for stop in &mut self.gradient {
            stop.sanitize();
        }
    }
}
