use serde::{Deserialize, Serialize};

use crate::types::SeedType;
use crate::uniforms::{DisplayUniforms, SimulationUniforms};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

/// Size of the simulation canvas, plus the size to go back to after
/// leaving maximized mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSize {
    pub width: u32,
    pub height: u32,
    pub is_maximized: bool,
    #[serde(skip)]
    last_width: u32,
    #[serde(skip)]
    last_height: u32,
}

impl Default for ContainerSize {
    fn default() -> Self {
        Self::new(900, 600)
    }
}

impl ContainerSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            is_maximized: false,
            last_width: width,
            last_height: height,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    /// Entering maximized mode remembers the current size and takes the whole
    /// viewport; leaving it restores the remembered size.
    pub fn set_maximized(&mut self, maximized: bool, viewport: Viewport) {
        if maximized {
            if !self.is_maximized {
                self.last_width = self.width;
                self.last_height = self.height;
            }
            self.width = viewport.width;
            self.height = viewport.height;
        } else if self.is_maximized {
            self.width = self.last_width;
            self.height = self.last_height;
        }
        self.is_maximized = maximized;
    }

    /// Keeps a maximized canvas glued to the viewport. Returns whether the
    /// size changed.
    pub fn follow_viewport(&mut self, viewport: Viewport) -> bool {
        if !self.is_maximized {
            return false;
        }
        let changed = self.width != viewport.width || self.height != viewport.height;
        self.width = viewport.width;
        self.height = viewport.height;
        changed
    }

    /// Brings a size read from disk back inside the viewport.
    pub fn sanitize(&mut self, viewport: Viewport) {
        self.width = self.width.clamp(1, viewport.width);
        self.height = self.height.clamp(1, viewport.height);
        self.last_width = self.width;
        self.last_height = self.height;
        if self.is_maximized {
            self.width = viewport.width;
            self.height = viewport.height;
        }
    }
}

pub struct SurfaceSnapshot {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// The simulation and its drawing surface, as seen from the control panel.
pub trait SimulationHost {
    fn resize_surface(&mut self, width: u32, height: u32);
    fn update_camera(&mut self, aspect: f32);
    fn setup_render_targets(&mut self);
    fn reset_texture_sizes(&mut self);
    fn draw_first_frame(&mut self, seed: SeedType);
    fn apply_uniforms(&mut self, simulation: &SimulationUniforms, display: &DisplayUniforms);
    fn snapshot(&self) -> Option<SurfaceSnapshot>;
}

/// Propagates the container size to the host. Each step reads sizes set by
/// the ones before it, so the order is fixed.
pub fn run_resize_chain(host: &mut dyn SimulationHost, size: &ContainerSize, seed: SeedType) {
    log::debug!("resizing canvas to {}x{}", size.width, size.height);
    host.resize_surface(size.width, size.height);
    host.update_camera(size.aspect());
    host.setup_render_targets();
    host.reset_texture_sizes();
    host.draw_first_frame(seed);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum HostCall {
        ResizeSurface(u32, u32),
        UpdateCamera(f32),
        SetupRenderTargets,
        ResetTextureSizes,
        DrawFirstFrame(SeedType),
        ApplyUniforms,
    }

    /// Records every call so tests can check what ran and in which order.
    #[derive(Default)]
    pub struct RecordingHost {
        pub calls: Vec<HostCall>,
        pub surface: Option<(u32, u32)>,
        pub last_simulation: Option<SimulationUniforms>,
        pub last_display: Option<DisplayUniforms>,
    }

    impl RecordingHost {
        pub fn clear(&mut self) {
            self.calls.clear();
        }

        pub fn count(&self, call: &HostCall) -> usize {
            self.calls.iter().filter(|c| *c == call).count()
        }

        pub fn without_uniform_updates(&self) -> Vec<HostCall> {
            self.calls
                .iter()
                .filter(|c| **c != HostCall::ApplyUniforms)
                .cloned()
                .collect()
        }
    }

    impl SimulationHost for RecordingHost {
        fn resize_surface(&mut self, width: u32, height: u32) {
            self.surface = Some((width, height));
            self.calls.push(HostCall::ResizeSurface(width, height));
        }

        fn update_camera(&mut self, aspect: f32) {
            self.calls.push(HostCall::UpdateCamera(aspect));
        }

        fn setup_render_targets(&mut self) {
            self.calls.push(HostCall::SetupRenderTargets);
        }

        fn reset_texture_sizes(&mut self) {
            self.calls.push(HostCall::ResetTextureSizes);
        }

        fn draw_first_frame(&mut self, seed: SeedType) {
            self.calls.push(HostCall::DrawFirstFrame(seed));
        }

        fn apply_uniforms(&mut self, simulation: &SimulationUniforms, display: &DisplayUniforms) {
            self.last_simulation = Some(*simulation);
            self.last_display = Some(*display);
            self.calls.push(HostCall::ApplyUniforms);
        }

        fn snapshot(&self) -> Option<SurfaceSnapshot> {
            let (width, height) = self.surface?;
            Some(SurfaceSnapshot {
                width,
                height,
                rgba: vec![255; (width * height * 4) as usize],
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{HostCall, RecordingHost};
    use super::*;

    #[test]
    fn maximize_round_trip_restores_previous_size() {
        let viewport = Viewport::new(1920, 1080);
        let mut size = ContainerSize::new(640, 360);

        size.set_maximized(true, viewport);
        assert_eq!((size.width, size.height), (1920, 1080));
        assert!(size.is_maximized);

        size.set_maximized(false, viewport);
        assert_eq!((size.width, size.height), (640, 360));
        assert!(!size.is_maximized);
    }

    #[test]
    fn maximizing_twice_keeps_the_first_size() {
        let viewport = Viewport::new(1280, 720);
        let mut size = ContainerSize::new(300, 200);

        size.set_maximized(true, viewport);
        size.set_maximized(true, Viewport::new(1000, 700));
        size.set_maximized(false, viewport);
        assert_eq!((size.width, size.height), (300, 200));
    }

    #[test]
    fn follow_viewport_only_applies_while_maximized() {
        let mut size = ContainerSize::new(300, 200);
        assert!(!size.follow_viewport(Viewport::new(800, 600)));
        assert_eq!(size.width, 300);

        size.set_maximized(true, Viewport::new(800, 600));
        assert!(!size.follow_viewport(Viewport::new(800, 600)));
        assert!(size.follow_viewport(Viewport::new(1024, 768)));
        assert_eq!((size.width, size.height), (1024, 768));
    }

    #[test]
    fn resize_chain_runs_steps_in_order() {
        let mut host = RecordingHost::default();
        let size = ContainerSize::new(800, 400);

        run_resize_chain(&mut host, &size, SeedType::Square);

        assert_eq!(
            host.calls,
            vec![
                HostCall::ResizeSurface(800, 400),
                HostCall::UpdateCamera(2.0),
                HostCall::SetupRenderTargets,
                HostCall::ResetTextureSizes,
                HostCall::DrawFirstFrame(SeedType::Square),
            ]
        );
    }

    #[test]
    fn sanitize_fits_size_into_viewport() {
        let mut size = ContainerSize::new(5000, 0);
        size.sanitize(Viewport::new(1600, 900));
        assert_eq!((size.width, size.height), (1600, 1));
        assert_eq!((size.last_width, size.last_height), (1600, 1));
    }
}
