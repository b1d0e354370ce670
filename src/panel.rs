//! Control-tree description of the parameter panel.
//!
//! The panel is described from the current state by [`describe_panel`] and
//! never edited in place: when a structural control changes (seed type,
//! rendering style, maximize) the active description is dropped and a new one
//! is built. The egui layer in `app` only translates descriptions into
//! widgets and widget changes into [`ControlEvent`]s.

use crate::canvas::{ContainerSize, Viewport};
use crate::types::{
    ParamRange, ParameterMetadata, ParameterValues, RenderingStyle, SeedType,
    GRADIENT_STOP_COUNT, PRESETS,
};
use crate::uniforms::DisplayUniforms;

pub const PANEL_TITLE: &str = "Parameters";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlId {
    Preset,
    F,
    K,
    DiffusionA,
    DiffusionB,
    Timestep,
    SeedType,
    Restart,
    RenderingStyle,
    StopColor(usize),
    StopThreshold(usize),
    StopEnabled(usize),
    Width,
    Height,
    Maximize,
    PausePlay,
    SaveImage,
}

#[cfg(test)]
impl ControlId {
    pub fn is_gradient_stop(self) -> bool {
        matches!(
            self,
            Self::StopColor(_) | Self::StopThreshold(_) | Self::StopEnabled(_)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlValue {
    Number(f32),
    Choice(i32),
    Color([u8; 3]),
    Flag(bool),
    Pressed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ControlKind {
    Slider {
        range: ParamRange,
        integral: bool,
    },
    Dropdown {
        options: Vec<(String, i32)>,
    },
    Color,
    Checkbox,
    Button,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Control {
    pub id: ControlId,
    pub label: String,
    pub kind: ControlKind,
}

impl Control {
    fn slider(id: ControlId, label: &str, range: ParamRange) -> Self {
        Self {
            id,
            label: label.to_owned(),
            kind: ControlKind::Slider {
                range,
                integral: false,
            },
        }
    }

    fn pixel_slider(id: ControlId, label: &str, max: u32) -> Self {
        Self {
            id,
            label: label.to_owned(),
            kind: ControlKind::Slider {
                range: ParamRange::new(1.0, max.max(1) as f32, Some(1.0)),
                integral: true,
            },
        }
    }

    fn dropdown(id: ControlId, label: &str, options: Vec<(String, i32)>) -> Self {
        Self {
            id,
            label: label.to_owned(),
            kind: ControlKind::Dropdown { options },
        }
    }

    fn simple(id: ControlId, label: &str, kind: ControlKind) -> Self {
        Self {
            id,
            label: label.to_owned(),
            kind,
        }
    }

    /// Applies the control's own constraints to an incoming value: sliders
    /// clamp (and integral ones round), dropdowns only take listed options.
    /// Values of the wrong shape are refused.
    pub fn accept(&self, value: ControlValue) -> Option<ControlValue> {
        match (&self.kind, value) {
            (ControlKind::Slider { range, integral }, ControlValue::Number(v)) => {
                let v = if *integral { v.round() } else { v };
                Some(ControlValue::Number(range.clamp(v)))
            }
            (ControlKind::Dropdown { options }, ControlValue::Choice(choice)) => options
                .iter()
                .any(|(_, option)| *option == choice)
                .then_some(value),
            (ControlKind::Color, ControlValue::Color(_))
            | (ControlKind::Checkbox, ControlValue::Flag(_))
            | (ControlKind::Button, ControlValue::Pressed) => Some(value),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PanelItem {
    Control(Control),
    Separator,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Folder {
    pub title: &'static str,
    pub items: Vec<PanelItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PanelDescription {
    pub title: &'static str,
    pub items: Vec<PanelItem>,
    pub folders: Vec<Folder>,
}

impl PanelDescription {
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.items
            .iter()
            .chain(self.folders.iter().flat_map(|folder| folder.items.iter()))
            .filter_map(|item| match item {
                PanelItem::Control(control) => Some(control),
                PanelItem::Separator => None,
            })
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls().find(|control| control.id == id)
    }
}

#[cfg(test)]
impl PanelDescription {
    pub fn contains(&self, id: ControlId) -> bool {
        self.control(id).is_some()
    }

    pub fn folder(&self, title: &str) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.title == title)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlEvent {
    pub id: ControlId,
    pub value: ControlValue,
}

impl ControlEvent {
    pub fn new(id: ControlId, value: ControlValue) -> Self {
        Self { id, value }
    }
}

/// Everything the panel is built from.
#[derive(Clone, Copy)]
pub struct PanelInputs<'a> {
    pub values: &'a ParameterValues,
    pub metadata: &'a ParameterMetadata,
    pub display: &'a DisplayUniforms,
    pub container: &'a ContainerSize,
    pub viewport: Viewport,
}

impl PanelInputs<'_> {
    /// The value a control is bound to.
    pub fn read(&self, id: ControlId) -> Option<ControlValue> {
        let values = self.values;
        let value = match id {
            ControlId::Preset => {
                ControlValue::Choice(values.preset.map_or(-1, |index| index as i32))
            }
            ControlId::F => ControlValue::Number(values.f),
            ControlId::K => ControlValue::Number(values.k),
            ControlId::DiffusionA => ControlValue::Number(values.d_a),
            ControlId::DiffusionB => ControlValue::Number(values.d_b),
            ControlId::Timestep => ControlValue::Number(values.timestep),
            ControlId::SeedType => ControlValue::Choice(values.seed_type.index()),
            ControlId::RenderingStyle => ControlValue::Choice(values.rendering_style.index()),
            ControlId::StopColor(i) => ControlValue::Color(values.gradient.get(i)?.color),
            ControlId::StopThreshold(i) => {
                ControlValue::Number(values.gradient.get(i)?.threshold)
            }
            ControlId::StopEnabled(i) => ControlValue::Flag(values.gradient.get(i)?.enabled),
            ControlId::Width => ControlValue::Number(self.container.width as f32),
            ControlId::Height => ControlValue::Number(self.container.height as f32),
            ControlId::Maximize => ControlValue::Flag(self.container.is_maximized),
            ControlId::Restart | ControlId::PausePlay | ControlId::SaveImage => {
                ControlValue::Pressed
            }
        };
        Some(value)
    }
}

pub fn describe_panel(inputs: &PanelInputs<'_>) -> PanelDescription {
    PanelDescription {
        title: PANEL_TITLE,
        items: reaction_diffusion_controls(inputs.metadata),
        folders: vec![
            seed_folder(),
            rendering_folder(inputs.display),
            canvas_size_folder(inputs.container, inputs.viewport),
            actions_folder(),
        ],
    }
}

fn reaction_diffusion_controls(metadata: &ParameterMetadata) -> Vec<PanelItem> {
    let mut presets = vec![("none".to_owned(), -1)];
    presets.extend(
        PRESETS
            .iter()
            .enumerate()
            .map(|(i, preset)| (preset.name.to_owned(), i as i32)),
    );

    vec![
        PanelItem::Control(Control::dropdown(ControlId::Preset, "Presets", presets)),
        PanelItem::Control(Control::slider(ControlId::F, "f", metadata.f)),
        PanelItem::Control(Control::slider(ControlId::K, "k", metadata.k)),
        PanelItem::Control(Control::slider(ControlId::DiffusionA, "dA", metadata.d_a)),
        PanelItem::Control(Control::slider(ControlId::DiffusionB, "dB", metadata.d_b)),
        PanelItem::Control(Control::slider(
            ControlId::Timestep,
            "Timestep",
            metadata.timestep,
        )),
    ]
}

fn seed_folder() -> Folder {
    let options = SeedType::ALL
        .iter()
        .map(|seed| (seed.label().to_owned(), seed.index()))
        .collect();

    Folder {
        title: "Seed pattern",
        items: vec![
            PanelItem::Control(Control::dropdown(ControlId::SeedType, "Type", options)),
            PanelItem::Control(Control::simple(
                ControlId::Restart,
                "⟳ Restart with this pattern",
                ControlKind::Button,
            )),
        ],
    }
}

fn rendering_folder(display: &DisplayUniforms) -> Folder {
    let options = RenderingStyle::ALL
        .iter()
        .map(|style| (style.label().to_owned(), style.index()))
        .collect();

    let mut items = vec![
        PanelItem::Control(Control::dropdown(ControlId::RenderingStyle, "Style", options)),
        PanelItem::Separator,
    ];
    items.extend(rendering_style_controls(display.rendering_style));

    Folder {
        title: "Rendering",
        items,
    }
}

/// Extra controls contributed by a rendering style. Only the gradient style
/// has any; an index outside the known styles contributes nothing.
pub fn rendering_style_controls(style_index: i32) -> Vec<PanelItem> {
    match RenderingStyle::from_index(style_index) {
        Some(RenderingStyle::Gradient) => gradient_controls(),
        Some(
            RenderingStyle::RedBlobOriginal
            | RenderingStyle::RedBlobAlt1
            | RenderingStyle::RedBlobAlt2
            | RenderingStyle::Rainbow
            | RenderingStyle::BlackAndWhite
            | RenderingStyle::Raw,
        ) => Vec::new(),
        None => {
            log::debug!("no style controls for unknown rendering style {style_index}");
            Vec::new()
        }
    }
}

fn gradient_controls() -> Vec<PanelItem> {
    let mut items = Vec::with_capacity(GRADIENT_STOP_COUNT * 4);
    for i in 0..GRADIENT_STOP_COUNT {
        if i > 0 {
            items.push(PanelItem::Separator);
        }
        items.push(PanelItem::Control(Control::simple(
            ControlId::StopColor(i),
            &format!("Color {}", i + 1),
            ControlKind::Color,
        )));
        items.push(PanelItem::Control(Control::slider(
            ControlId::StopThreshold(i),
            "Threshold",
            ParamRange::new(0.0, 1.0, None),
        )));
        items.push(PanelItem::Control(Control::simple(
            ControlId::StopEnabled(i),
            "Enabled",
            ControlKind::Checkbox,
        )));
    }
    items
}

fn canvas_size_folder(container: &ContainerSize, viewport: Viewport) -> Folder {
    let mut items = Vec::new();
    if !container.is_maximized {
        items.push(PanelItem::Control(Control::pixel_slider(
            ControlId::Width,
            "Width",
            viewport.width,
        )));
        items.push(PanelItem::Control(Control::pixel_slider(
            ControlId::Height,
            "Height",
            viewport.height,
        )));
    }
    items.push(PanelItem::Control(Control::simple(
        ControlId::Maximize,
        "Maximize",
        ControlKind::Checkbox,
    )));

    Folder {
        title: "Canvas size",
        items,
    }
}

fn actions_folder() -> Folder {
    Folder {
        title: "Actions",
        items: vec![
            PanelItem::Control(Control::simple(
                ControlId::PausePlay,
                "⏸ Pause/play",
                ControlKind::Button,
            )),
            PanelItem::Control(Control::simple(
                ControlId::SaveImage,
                "💾 Save as image",
                ControlKind::Button,
            )),
        ],
    }
}

/// The active panel. Rebuilding always disposes the current description
/// before describing the new one.
pub struct ControlPanel {
    active: PanelDescription,
    builds: u64,
    teardowns: u64,
}

impl ControlPanel {
    pub fn build(inputs: &PanelInputs<'_>) -> Self {
        Self {
            active: describe_panel(inputs),
            builds: 1,
            teardowns: 0,
        }
    }

    pub fn description(&self) -> &PanelDescription {
        &self.active
    }

    pub fn rebuild(&mut self, inputs: &PanelInputs<'_>) {
        self.teardowns += 1;
        self.active = describe_panel(inputs);
        self.builds += 1;
        log::debug!(
            "panel rebuilt with {} controls (builds {}, teardowns {})",
            self.active.controls().count(),
            self.builds,
            self.teardowns
        );
    }

    /// Routes an event through the control it addresses. Events for
    /// controls missing from the active panel are refused.
    pub fn accept(&self, event: ControlEvent) -> Option<ControlEvent> {
        let control = self.active.control(event.id)?;
        let value = control.accept(event.value)?;
        Some(ControlEvent::new(event.id, value))
    }
}

#[cfg(test)]
impl ControlPanel {
    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn teardowns(&self) -> u64 {
        self.teardowns
    }
}
