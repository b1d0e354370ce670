//! State owned for the lifetime of the application, and the handlers that
//! apply panel events to it.

use std::path::PathBuf;

use crate::actions;
use crate::canvas::{run_resize_chain, ContainerSize, SimulationHost, Viewport};
use crate::config::AppConfig;
use crate::gradient::DisabledStopEdits;
use crate::panel::{ControlEvent, ControlId, ControlPanel, ControlValue, PanelInputs};
use crate::types::{ParameterMetadata, ParameterValues, RenderingStyle, SeedType, PRESETS};
use crate::uniforms::{DisplayUniforms, SimulationUniforms};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// A structural control changed; the panel has to be described again.
    Rebuild,
    Ignored,
}

pub struct Session {
    pub values: ParameterValues,
    pub metadata: ParameterMetadata,
    pub simulation: SimulationUniforms,
    pub display: DisplayUniforms,
    pub container: ContainerSize,
    pub paused: bool,
    pub stop_edits: DisabledStopEdits,
    pub export_dir: PathBuf,
}

impl Session {
    pub fn new(config: &AppConfig, viewport: Viewport) -> Self {
        let metadata = ParameterMetadata::default();
        let mut values = config.parameters.clone();
        values.sanitize(&metadata);

        let mut container = config.canvas;
        container.sanitize(viewport);

        Self {
            simulation: SimulationUniforms::from_parameters(
                &values,
                container.width,
                container.height,
            ),
            display: DisplayUniforms::from_parameters(&values),
            values,
            metadata,
            container,
            paused: false,
            stop_edits: config.disabled_stop_edits,
            export_dir: config.export_dir.clone(),
        }
    }

    /// Pushes the initial uniforms and sizes to the host and draws the first
    /// frame.
    pub fn start(&mut self, host: &mut dyn SimulationHost) {
        host.apply_uniforms(&self.simulation, &self.display);
        run_resize_chain(host, &self.container, self.values.seed_type);
    }

    pub fn panel_inputs(&self, viewport: Viewport) -> PanelInputs<'_> {
        PanelInputs {
            values: &self.values,
            metadata: &self.metadata,
            display: &self.display,
            container: &self.container,
            viewport,
        }
    }

    /// Lets the panel vet an event, applies it, and rebuilds the panel when
    /// the event was structural.
    pub fn dispatch(
        &mut self,
        panel: &mut ControlPanel,
        event: ControlEvent,
        viewport: Viewport,
        host: &mut dyn SimulationHost,
    ) -> Outcome {
        let Some(event) = panel.accept(event) else {
            log::debug!("dropping {event:?}: no such control in the active panel");
            return Outcome::Ignored;
        };

        let outcome = self.handle(event, viewport, host);
        if outcome == Outcome::Rebuild {
            panel.rebuild(&self.panel_inputs(viewport));
        }
        outcome
    }

    pub fn handle(
        &mut self,
        event: ControlEvent,
        viewport: Viewport,
        host: &mut dyn SimulationHost,
    ) -> Outcome {
        match (event.id, event.value) {
            (ControlId::Preset, ControlValue::Choice(choice)) => self.select_preset(choice, host),
            (ControlId::F, ControlValue::Number(v)) => {
                self.values.f = v;
                self.simulation.f = v;
                self.push_uniforms(host)
            }
            (ControlId::K, ControlValue::Number(v)) => {
                self.values.k = v;
                self.simulation.k = v;
                self.push_uniforms(host)
            }
            (ControlId::DiffusionA, ControlValue::Number(v)) => {
                self.values.d_a = v;
                self.simulation.d_a = v;
                self.push_uniforms(host)
            }
            (ControlId::DiffusionB, ControlValue::Number(v)) => {
                self.values.d_b = v;
                self.simulation.d_b = v;
                self.push_uniforms(host)
            }
            (ControlId::Timestep, ControlValue::Number(v)) => {
                self.values.timestep = v;
                self.simulation.timestep = v;
                self.push_uniforms(host)
            }
            (ControlId::SeedType, ControlValue::Choice(choice)) => {
                let Some(seed) = SeedType::from_index(choice) else {
                    return Outcome::Ignored;
                };
                self.values.seed_type = seed;
                Outcome::Rebuild
            }
            (ControlId::Restart, ControlValue::Pressed) => {
                actions::restart(host, self.values.seed_type);
                Outcome::Applied
            }
            (ControlId::RenderingStyle, ControlValue::Choice(choice)) => {
                let Some(style) = RenderingStyle::from_index(choice) else {
                    return Outcome::Ignored;
                };
                self.values.rendering_style = style;
                self.display.rendering_style = style.index();
                host.apply_uniforms(&self.simulation, &self.display);
                Outcome::Rebuild
            }
            (ControlId::StopColor(i), ControlValue::Color(color)) => {
                let (Some(stop), Some(uniform)) = (
                    self.values.gradient.get_mut(i),
                    self.display.color_stops.get_mut(i),
                ) else {
                    return Outcome::Ignored;
                };
                stop.set_color(uniform, color, self.stop_edits);
                self.push_uniforms(host)
            }
            (ControlId::StopThreshold(i), ControlValue::Number(threshold)) => {
                let (Some(stop), Some(uniform)) = (
                    self.values.gradient.get_mut(i),
                    self.display.color_stops.get_mut(i),
                ) else {
                    return Outcome::Ignored;
                };
                stop.set_threshold(uniform, threshold, self.stop_edits);
                self.push_uniforms(host)
            }
            (ControlId::StopEnabled(i), ControlValue::Flag(enabled)) => {
                let (Some(stop), Some(uniform)) = (
                    self.values.gradient.get_mut(i),
                    self.display.color_stops.get_mut(i),
                ) else {
                    return Outcome::Ignored;
                };
                stop.set_enabled(uniform, enabled);
                self.push_uniforms(host)
            }
            (ControlId::Width, ControlValue::Number(width)) => {
                self.container.set_width(width as u32);
                self.resize(host);
                Outcome::Applied
            }
            (ControlId::Height, ControlValue::Number(height)) => {
                self.container.set_height(height as u32);
                self.resize(host);
                Outcome::Applied
            }
            (ControlId::Maximize, ControlValue::Flag(maximized)) => {
                self.container.set_maximized(maximized, viewport);
                self.resize(host);
                Outcome::Rebuild
            }
            (ControlId::PausePlay, ControlValue::Pressed) => {
                actions::toggle_pause(&mut self.paused);
                Outcome::Applied
            }
            (ControlId::SaveImage, ControlValue::Pressed) => {
                actions::save_image_detached(host, &self.export_dir);
                Outcome::Applied
            }
            (id, value) => {
                log::debug!("no handler for {value:?} on {id:?}");
                Outcome::Ignored
            }
        }
    }

    /// Called when the viewport changed. A maximized canvas is resized to
    /// it; otherwise the panel is rebuilt so the width and height sliders
    /// stay bounded by it. Returns whether the resize chain ran.
    pub fn sync_viewport(
        &mut self,
        panel: &mut ControlPanel,
        viewport: Viewport,
        host: &mut dyn SimulationHost,
    ) -> bool {
        if !self.container.is_maximized {
            panel.rebuild(&self.panel_inputs(viewport));
            return false;
        }
        if !self.container.follow_viewport(viewport) {
            return false;
        }
        self.resize(host);
        true
    }

    fn select_preset(&mut self, choice: i32, host: &mut dyn SimulationHost) -> Outcome {
        let preset = usize::try_from(choice).ok().and_then(|i| PRESETS.get(i).map(|p| (i, p)));
        match preset {
            Some((index, preset)) => {
                log::info!("applying preset {}", preset.name);
                self.values.preset = Some(index);
                self.values.f = self.metadata.f.clamp(preset.f);
                self.values.k = self.metadata.k.clamp(preset.k);
                self.simulation.f = self.values.f;
                self.simulation.k = self.values.k;
                self.push_uniforms(host)
            }
            None => {
                self.values.preset = None;
                Outcome::Applied
            }
        }
    }

    fn push_uniforms(&mut self, host: &mut dyn SimulationHost) -> Outcome {
        host.apply_uniforms(&self.simulation, &self.display);
        Outcome::Applied
    }

    fn resize(&mut self, host: &mut dyn SimulationHost) {
        self.simulation.resolution = [self.container.width as f32, self.container.height as f32];
        host.apply_uniforms(&self.simulation, &self.display);
        run_resize_chain(host, &self.container, self.values.seed_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::testing::{HostCall, RecordingHost};
    use crate::gradient::INACTIVE_STOP;
    use crate::panel::ControlKind;
    use crate::types::ParamRange;
    use glam::Vec4;

    const VIEWPORT: Viewport = Viewport {
        width: 1600,
        height: 900,
    };

    fn setup() -> (Session, ControlPanel, RecordingHost) {
        let mut config = AppConfig::default();
        config.canvas = ContainerSize::new(640, 480);
        let session = Session::new(&config, VIEWPORT);
        let panel = ControlPanel::build(&session.panel_inputs(VIEWPORT));
        (session, panel, RecordingHost::default())
    }

    fn send(
        session: &mut Session,
        panel: &mut ControlPanel,
        host: &mut RecordingHost,
        id: ControlId,
        value: ControlValue,
    ) -> Outcome {
        session.dispatch(panel, ControlEvent::new(id, value), VIEWPORT, host)
    }

    fn resize_chain(width: u32, height: u32, seed: SeedType) -> Vec<HostCall> {
        vec![
            HostCall::ResizeSurface(width, height),
            HostCall::UpdateCamera(width as f32 / height as f32),
            HostCall::SetupRenderTargets,
            HostCall::ResetTextureSizes,
            HostCall::DrawFirstFrame(seed),
        ]
    }

    #[test]
    fn start_pushes_uniforms_and_draws_first_frame() {
        let (mut session, _, mut host) = setup();
        session.start(&mut host);

        assert_eq!(host.calls[0], HostCall::ApplyUniforms);
        assert_eq!(
            host.without_uniform_updates(),
            resize_chain(640, 480, SeedType::Circle)
        );
    }

    #[test]
    fn coefficient_sliders_write_simulation_uniforms_within_range() {
        let (mut session, mut panel, mut host) = setup();
        let inputs = [-1.0, 0.0, 0.0123, 0.5, 1.5, 3.0, f32::NAN];

        for id in [
            ControlId::F,
            ControlId::K,
            ControlId::DiffusionA,
            ControlId::DiffusionB,
            ControlId::Timestep,
        ] {
            let range = match id {
                ControlId::F => session.metadata.f,
                ControlId::K => session.metadata.k,
                ControlId::DiffusionA => session.metadata.d_a,
                ControlId::DiffusionB => session.metadata.d_b,
                _ => session.metadata.timestep,
            };
            for input in inputs {
                send(
                    &mut session,
                    &mut panel,
                    &mut host,
                    id,
                    ControlValue::Number(input),
                );
                let written = match id {
                    ControlId::F => session.simulation.f,
                    ControlId::K => session.simulation.k,
                    ControlId::DiffusionA => session.simulation.d_a,
                    ControlId::DiffusionB => session.simulation.d_b,
                    _ => session.simulation.timestep,
                };
                assert!(range.contains(written), "{id:?} wrote {written} for {input}");
            }
        }
        assert_eq!(host.last_simulation, Some(session.simulation));
    }

    #[test]
    fn seed_type_change_rebuilds_panel_once() {
        let (mut session, mut panel, mut host) = setup();

        let outcome = send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::SeedType,
            ControlValue::Choice(SeedType::Square.index()),
        );
        assert_eq!(outcome, Outcome::Rebuild);
        assert_eq!(session.values.seed_type, SeedType::Square);
        assert_eq!((panel.builds(), panel.teardowns()), (2, 1));
        assert!(host.calls.is_empty());
    }

    #[test]
    fn restart_uses_recorded_seed_without_rebuild() {
        let (mut session, mut panel, mut host) = setup();
        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::SeedType,
            ControlValue::Choice(SeedType::Text.index()),
        );

        let outcome = send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::Restart,
            ControlValue::Pressed,
        );
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(host.calls, vec![HostCall::DrawFirstFrame(SeedType::Text)]);
        assert_eq!(panel.builds(), 2);
    }

    #[test]
    fn rendering_style_change_rebuilds_with_matching_controls() {
        let (mut session, mut panel, mut host) = setup();
        let gradient_controls = |panel: &ControlPanel| {
            panel
                .description()
                .controls()
                .filter(|control| control.id.is_gradient_stop())
                .count()
        };
        assert_eq!(gradient_controls(&panel), 15);

        let outcome = send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::RenderingStyle,
            ControlValue::Choice(1),
        );
        assert_eq!(outcome, Outcome::Rebuild);
        assert_eq!(session.display.rendering_style, 1);
        assert_eq!((panel.builds(), panel.teardowns()), (2, 1));
        assert_eq!(gradient_controls(&panel), 0);

        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::RenderingStyle,
            ControlValue::Choice(0),
        );
        assert_eq!((panel.builds(), panel.teardowns()), (3, 2));
        assert_eq!(gradient_controls(&panel), 15);
    }

    #[test]
    fn gradient_stop_scenario_round_trips_through_panel() {
        let (mut session, mut panel, mut host) = setup();

        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::StopColor(0),
            ControlValue::Color([255, 0, 0]),
        );
        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::StopThreshold(0),
            ControlValue::Number(0.5),
        );
        assert_eq!(session.display.color_stops[0], Vec4::new(1.0, 0.0, 0.0, 0.5));

        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::StopEnabled(0),
            ControlValue::Flag(false),
        );
        assert_eq!(session.display.color_stops[0], INACTIVE_STOP);
        assert_eq!(host.last_display.unwrap().color_stops[0], INACTIVE_STOP);

        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::StopEnabled(0),
            ControlValue::Flag(true),
        );
        assert_eq!(session.display.color_stops[0], Vec4::new(1.0, 0.0, 0.0, 0.5));
        assert_eq!(panel.builds(), 1);
    }

    #[test]
    fn every_stop_disables_to_sentinel_and_restores() {
        let (mut session, mut panel, mut host) = setup();
        for i in 0..session.values.gradient.len() {
            let before = session.display.color_stops[i];
            send(
                &mut session,
                &mut panel,
                &mut host,
                ControlId::StopEnabled(i),
                ControlValue::Flag(false),
            );
            assert_eq!(session.display.color_stops[i], INACTIVE_STOP);
            send(
                &mut session,
                &mut panel,
                &mut host,
                ControlId::StopEnabled(i),
                ControlValue::Flag(true),
            );
            assert_eq!(session.display.color_stops[i], before);
        }
    }

    #[test]
    fn stop_events_are_ignored_when_gradient_controls_are_hidden() {
        let (mut session, mut panel, mut host) = setup();
        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::RenderingStyle,
            ControlValue::Choice(RenderingStyle::Raw.index()),
        );

        let before = session.display.color_stops;
        let outcome = send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::StopEnabled(2),
            ControlValue::Flag(false),
        );
        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(session.display.color_stops, before);
    }

    #[test]
    fn width_change_runs_one_resize_chain() {
        let (mut session, mut panel, mut host) = setup();

        let outcome = send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::Width,
            ControlValue::Number(800.0),
        );
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(session.container.width, 800);
        assert_eq!(host.without_uniform_updates(), resize_chain(800, 480, SeedType::Circle));
        assert_eq!(host.count(&HostCall::SetupRenderTargets), 1);
        assert_eq!(panel.builds(), 1);
        assert_eq!(session.simulation.resolution, [800.0, 480.0]);
    }

    #[test]
    fn height_is_bounded_by_viewport() {
        let (mut session, mut panel, mut host) = setup();
        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::Height,
            ControlValue::Number(5000.0),
        );
        assert_eq!(session.container.height, VIEWPORT.height);
    }

    #[test]
    fn maximize_round_trip_restores_size_and_rebuilds_each_time() {
        let (mut session, mut panel, mut host) = setup();

        let outcome = send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::Maximize,
            ControlValue::Flag(true),
        );
        assert_eq!(outcome, Outcome::Rebuild);
        assert_eq!(
            (session.container.width, session.container.height),
            (VIEWPORT.width, VIEWPORT.height)
        );
        assert!(!panel.description().contains(ControlId::Width));
        assert_eq!(
            host.without_uniform_updates(),
            resize_chain(1600, 900, SeedType::Circle)
        );

        host.clear();
        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::Maximize,
            ControlValue::Flag(false),
        );
        assert_eq!((session.container.width, session.container.height), (640, 480));
        assert!(panel.description().contains(ControlId::Width));
        assert_eq!(host.without_uniform_updates(), resize_chain(640, 480, SeedType::Circle));
        assert_eq!((panel.builds(), panel.teardowns()), (3, 2));
    }

    #[test]
    fn width_events_are_refused_while_maximized() {
        let (mut session, mut panel, mut host) = setup();
        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::Maximize,
            ControlValue::Flag(true),
        );
        host.clear();

        let outcome = send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::Width,
            ControlValue::Number(300.0),
        );
        assert_eq!(outcome, Outcome::Ignored);
        assert!(host.calls.is_empty());
        assert_eq!(session.container.width, VIEWPORT.width);
    }

    #[test]
    fn maximized_canvas_follows_viewport() {
        let (mut session, mut panel, mut host) = setup();
        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::Maximize,
            ControlValue::Flag(true),
        );
        host.clear();

        assert!(session.sync_viewport(&mut panel, Viewport::new(1280, 720), &mut host));
        assert_eq!(host.without_uniform_updates(), resize_chain(1280, 720, SeedType::Circle));
        assert_eq!(panel.builds(), 2);
    }

    #[test]
    fn viewport_change_rebuilds_size_slider_bounds() {
        let (mut session, mut panel, mut host) = setup();
        let viewport = Viewport::new(1000, 700);

        assert!(!session.sync_viewport(&mut panel, viewport, &mut host));
        assert!(host.calls.is_empty());
        assert_eq!((panel.builds(), panel.teardowns()), (2, 1));

        let width = panel.description().control(ControlId::Width).unwrap();
        assert_eq!(
            width.kind,
            ControlKind::Slider {
                range: ParamRange::new(1.0, 1000.0, Some(1.0)),
                integral: true,
            }
        );

        let outcome = session.dispatch(
            &mut panel,
            ControlEvent::new(ControlId::Width, ControlValue::Number(1400.0)),
            viewport,
            &mut host,
        );
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(session.container.width, 1000);
    }

    #[test]
    fn pause_toggles_without_side_effects() {
        let (mut session, mut panel, mut host) = setup();
        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::PausePlay,
            ControlValue::Pressed,
        );
        assert!(session.paused);
        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::PausePlay,
            ControlValue::Pressed,
        );
        assert!(!session.paused);
        assert!(host.calls.is_empty());
        assert_eq!(panel.builds(), 1);
    }

    #[test]
    fn save_image_failure_is_not_surfaced() {
        let (mut session, mut panel, mut host) = setup();
        let outcome = send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::SaveImage,
            ControlValue::Pressed,
        );
        assert_eq!(outcome, Outcome::Applied);
    }

    #[test]
    fn preset_writes_feed_and_kill() {
        let (mut session, mut panel, mut host) = setup();
        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::Preset,
            ControlValue::Choice(3),
        );

        assert_eq!(session.values.preset, Some(3));
        assert_eq!(session.simulation.f, PRESETS[3].f);
        assert_eq!(session.simulation.k, PRESETS[3].k);

        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::Preset,
            ControlValue::Choice(-1),
        );
        assert_eq!(session.values.preset, None);
        assert_eq!(session.simulation.f, PRESETS[3].f);
    }

    #[test]
    fn deferred_policy_keeps_sentinel_while_disabled() {
        let mut config = AppConfig::default();
        config.disabled_stop_edits = DisabledStopEdits::Deferred;
        let mut session = Session::new(&config, VIEWPORT);
        let mut panel = ControlPanel::build(&session.panel_inputs(VIEWPORT));
        let mut host = RecordingHost::default();

        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::StopEnabled(1),
            ControlValue::Flag(false),
        );
        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::StopThreshold(1),
            ControlValue::Number(0.9),
        );
        assert_eq!(session.display.color_stops[1], INACTIVE_STOP);

        send(
            &mut session,
            &mut panel,
            &mut host,
            ControlId::StopEnabled(1),
            ControlValue::Flag(true),
        );
        assert_eq!(session.display.color_stops[1], Vec4::new(0.0, 1.0, 0.0, 0.9));
    }
}
