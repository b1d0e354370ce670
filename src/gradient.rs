//! Gradient stops and the enable/disable protocol that keeps their display
//! uniforms in sync.
//!
//! Each stop is encoded for the display pass as `(r, g, b, threshold)` with
//! the color normalized to `[0, 1]`. A disabled stop is encoded as
//! [`INACTIVE_STOP`]; the vector it carried is remembered on the stop and put
//! back when the stop is enabled again.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Marks a gradient stop as inactive for the display pass.
pub const INACTIVE_STOP: Vec4 = Vec4::NEG_ONE;

/// What color and threshold edits do while their stop is disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabledStopEdits {
    /// Edits land in the live uniform and overwrite the inactive marker,
    /// while the stop still reports itself as disabled.
    #[default]
    WriteThrough,
    /// Edits land in the remembered vector; the marker stays until the stop
    /// is enabled again.
    Deferred,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: [u8; 3],
    pub threshold: f32,
    pub enabled: bool,
    #[serde(skip)]
    last_value: Vec4,
}

impl GradientStop {
    pub fn new(color: [u8; 3], threshold: f32) -> Self {
        let mut stop = Self {
            color,
            threshold,
            enabled: true,
            last_value: Vec4::ZERO,
        };
        stop.prime();
        stop
    }

    /// Color and threshold combined, regardless of the enabled flag.
    pub fn vector(&self) -> Vec4 {
        let [r, g, b] = normalized(self.color);
        Vec4::new(r, g, b, self.threshold)
    }

    /// The value the display uniform starts from.
    pub fn uniform_value(&self) -> Vec4 {
        if self.enabled {
            self.vector()
        } else {
            INACTIVE_STOP
        }
    }

    /// Seeds the remembered vector from color and threshold. Needed after
    /// deserializing, since the remembered vector is not persisted.
    pub fn prime(&mut self) {
        self.last_value = self.vector();
    }

    pub fn sanitize(&mut self) {
        self.threshold = if self.threshold.is_nan() {
            0.0
        } else {
            self.threshold.clamp(0.0, 1.0)
        };
        self.prime();
    }

    pub fn set_color(&mut self, uniform: &mut Vec4, color: [u8; 3], policy: DisabledStopEdits) {
        self.color = color;
        let [r, g, b] = normalized(color);

        if !self.enabled && policy == DisabledStopEdits::Deferred {
            self.last_value = Vec4::new(r, g, b, self.last_value.w);
            return;
        }
        if !self.enabled {
            log::warn!("color edited on a disabled gradient stop; inactive marker overwritten");
        }
        *uniform = Vec4::new(r, g, b, uniform.w);
    }

    pub fn set_threshold(&mut self, uniform: &mut Vec4, threshold: f32, policy: DisabledStopEdits) {
        self.threshold = threshold;

        if !self.enabled && policy == DisabledStopEdits::Deferred {
            self.last_value.w = threshold;
            return;
        }
        if !self.enabled {
            log::warn!("threshold edited on a disabled gradient stop; inactive marker overwritten");
        }
        uniform.w = threshold;
    }

    pub fn set_enabled(&mut self, uniform: &mut Vec4, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;

        if enabled {
            *uniform = self.last_value;
        } else {
            self.last_value = *uniform;
            *uniform = INACTIVE_STOP;
        }
    }
}

fn normalized(color: [u8; 3]) -> [f32; 3] {
    color.map(|channel| channel as f32 / 255.0)
}
