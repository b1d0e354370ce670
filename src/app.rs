use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};

use crate::canvas::Viewport;
use crate::config::AppConfig;
use crate::host::CpuSimulation;
use crate::panel::{
    Control, ControlEvent, ControlKind, ControlPanel, ControlValue, PanelInputs, PanelItem,
};
use crate::session::Session;

pub const CONTROLS_WIDTH: f32 = 300.0;

pub fn initial_window_size(config: &AppConfig) -> [f32; 2] {
    [
        config.canvas.width as f32 + CONTROLS_WIDTH + 24.0,
        config.canvas.height as f32 + 48.0,
    ]
}

pub struct PanelApp {
    session: Session,
    panel: ControlPanel,
    host: CpuSimulation,
    texture: Option<TextureHandle>,
    viewport: Viewport,
}

impl PanelApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let [width, height] = initial_window_size(&config);
        let viewport = Viewport::new((width - CONTROLS_WIDTH) as u32, height as u32);

        let mut session = Session::new(&config, viewport);
        let mut host = CpuSimulation::new(&config);
        session.start(&mut host);
        let panel = ControlPanel::build(&session.panel_inputs(viewport));

        Self {
            session,
            panel,
            host,
            texture: None,
            viewport,
        }
    }

    fn viewport_of(ctx: &egui::Context) -> Viewport {
        let size = ctx.screen_rect().size();
        Viewport::new(
            (size.x - CONTROLS_WIDTH).max(1.0) as u32,
            size.y.max(1.0) as u32,
        )
    }

    fn update_texture(&mut self, ctx: &egui::Context) {
        let size = self.host.field().dimensions();
        let image = ColorImage::from_rgba_unmultiplied(size, &self.host.to_rgba8());

        if let Some(texture) = &mut self.texture {
            texture.set(image, TextureOptions::LINEAR);
        } else {
            self.texture =
                Some(ctx.load_texture("reaction-diffusion", image, TextureOptions::LINEAR));
        }
    }

    fn draw_controls(&self, ui: &mut egui::Ui) -> Vec<ControlEvent> {
        let inputs = self.session.panel_inputs(self.viewport);
        let description = self.panel.description();
        let mut events = Vec::new();

        ui.heading(description.title);
        draw_items(ui, &description.items, &inputs, &mut events);

        for folder in &description.folders {
            egui::CollapsingHeader::new(folder.title)
                .default_open(true)
                .show(ui, |ui| {
                    draw_items(ui, &folder.items, &inputs, &mut events);
                });
        }

        events
    }

    fn draw_visuals(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("sim time: {:.1}", self.host.field().time()));
            ui.separator();
            let [width, height] = self.host.field().dimensions();
            ui.label(format!("grid: {width}x{height}"));
            if self.session.paused {
                ui.separator();
                ui.label("paused");
            }
        });

        ui.separator();

        if let Some(texture) = &self.texture {
            let [width, _] = self.host.surface_size();
            let aspect = self.host.aspect().max(f32::EPSILON);
            let available = ui.available_size();
            let width = (width as f32).min(available.x).min(available.y * aspect);
            ui.image((texture.id(), egui::vec2(width, width / aspect)));
        }
    }
}

fn draw_items(
    ui: &mut egui::Ui,
    items: &[PanelItem],
    inputs: &PanelInputs<'_>,
    events: &mut Vec<ControlEvent>,
) {
    for item in items {
        match item {
            PanelItem::Separator => {
                ui.separator();
            }
            PanelItem::Control(control) => {
                if let Some(value) = draw_control(ui, control, inputs.read(control.id)) {
                    events.push(ControlEvent::new(control.id, value));
                }
            }
        }
    }
}

/// Shows one control and returns its new value when the user changed it.
fn draw_control(
    ui: &mut egui::Ui,
    control: &Control,
    current: Option<ControlValue>,
) -> Option<ControlValue> {
    let label = control.label.as_str();
    match (&control.kind, current?) {
        (ControlKind::Slider { range, integral }, ControlValue::Number(mut value)) => {
            let mut slider = egui::Slider::new(&mut value, range.min..=range.max).text(label);
            if let Some(step) = range.step {
                slider = slider.step_by(step as f64);
            }
            if *integral {
                slider = slider.integer();
            }
            let changed = ui.add(slider).changed();
            changed.then_some(ControlValue::Number(value))
        }
        (ControlKind::Dropdown { options }, ControlValue::Choice(mut selected)) => {
            let before = selected;
            let selected_text = options
                .iter()
                .find(|(_, option)| *option == selected)
                .map_or("", |(text, _)| text.as_str());

            egui::ComboBox::new(control.id, label)
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for (text, option) in options {
                        ui.selectable_value(&mut selected, *option, text.as_str());
                    }
                });
            (selected != before).then_some(ControlValue::Choice(selected))
        }
        (ControlKind::Color, ControlValue::Color(mut rgb)) => {
            let changed = ui
                .horizontal(|ui| {
                    let changed = ui.color_edit_button_srgb(&mut rgb).changed();
                    ui.label(label);
                    changed
                })
                .inner;
            changed.then_some(ControlValue::Color(rgb))
        }
        (ControlKind::Checkbox, ControlValue::Flag(mut flag)) => {
            let changed = ui.checkbox(&mut flag, label).changed();
            changed.then_some(ControlValue::Flag(flag))
        }
        (ControlKind::Button, ControlValue::Pressed) => {
            ui.button(label).clicked().then_some(ControlValue::Pressed)
        }
        _ => None,
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let viewport = Self::viewport_of(ctx);
        if viewport != self.viewport {
            self.viewport = viewport;
            self.session
                .sync_viewport(&mut self.panel, viewport, &mut self.host);
        }

        if !self.session.paused {
            self.host.step();
        }
        self.update_texture(ctx);

        let mut events = Vec::new();
        egui::SidePanel::left("controls")
            .resizable(false)
            .exact_width(CONTROLS_WIDTH)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        events = self.draw_controls(ui);
                    });
            });

        for event in events {
            self.session
                .dispatch(&mut self.panel, event, self.viewport, &mut self.host);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_visuals(ui);
        });

        ctx.request_repaint();
    }
}
