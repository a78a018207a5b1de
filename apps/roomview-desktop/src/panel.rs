use egui::Context as EguiContext;
use roomview_camera::{Camera, Projection};
use roomview_common::{Rgb, WallRole};
use roomview_config::{
    AppearanceEdit, GRADIENT_ANGLE_RANGE, OverlayPattern, PATTERN_AMOUNT_RANGE,
    PATTERN_BLUR_RANGE, PATTERN_SCALE_RANGE, PatternColor, ROOM_DIMENSION_RANGE,
    WallConfigStore,
};
use roomview_render::RenderLoop;
use roomview_scene::{SceneAssembler, SceneSettings};

/// Configuration side panel. Every widget edit becomes exactly one store
/// mutation; the panel keeps no copy of the configuration.
pub struct Panel {
    pub visible: bool,
    selected: WallRole,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel {
    pub fn new() -> Self {
        Self {
            visible: true,
            selected: WallRole::Front,
        }
    }

    pub fn show(
        &mut self,
        ctx: &EguiContext,
        store: &mut WallConfigStore,
        render_loop: &mut RenderLoop,
        assembler: &mut SceneAssembler,
        camera: &Camera,
    ) {
        if !self.visible {
            return;
        }
        egui::SidePanel::left("room_panel")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Room");
                room_section(ui, store);
                ui.separator();

                ui.heading("Walls");
                egui::ComboBox::from_label("Wall")
                    .selected_text(self.selected.label())
                    .show_ui(ui, |ui| {
                        for role in WallRole::ALL {
                            ui.selectable_value(&mut self.selected, role, role.label());
                        }
                    });
                wall_section(ui, store, self.selected);
                ui.separator();

                ui.heading("View");
                view_section(ui, render_loop, assembler, camera);
                ui.separator();
                ui.small("WASD move | Space/Shift up/down | Arrows look | F1 panel");
            });
    }
}

fn room_section(ui: &mut egui::Ui, store: &mut WallConfigStore) {
    let mut room = *store.room();
    if ui
        .add(egui::Slider::new(&mut room.length, ROOM_DIMENSION_RANGE).text("Length"))
        .changed()
    {
        store.set_room_length(room.length);
    }
    if ui
        .add(egui::Slider::new(&mut room.height, ROOM_DIMENSION_RANGE).text("Height"))
        .changed()
    {
        store.set_room_height(room.height);
    }
    if ui
        .add(egui::Slider::new(&mut room.width, ROOM_DIMENSION_RANGE).text("Width"))
        .changed()
    {
        store.set_room_width(room.width);
    }
}

fn wall_section(ui: &mut egui::Ui, store: &mut WallConfigStore, role: WallRole) {
    let mut wall = *store.wall(role);
    let mut edits = Vec::new();

    ui.horizontal(|ui| {
        ui.label("Gradient");
        let mut start = wall.color_start.to_array();
        if ui.color_edit_button_rgb(&mut start).changed() {
            edits.push(AppearanceEdit::ColorStart(Rgb::from(start)));
        }
        let mut end = wall.color_end.to_array();
        if ui.color_edit_button_rgb(&mut end).changed() {
            edits.push(AppearanceEdit::ColorEnd(Rgb::from(end)));
        }
    });
    if ui
        .add(
            egui::Slider::new(
                &mut wall.gradient_angle_degrees,
                GRADIENT_ANGLE_RANGE.start..=GRADIENT_ANGLE_RANGE.end,
            )
            .text("Angle")
            .suffix("°"),
        )
        .changed()
    {
        let wrapped = wall.gradient_angle_degrees.rem_euclid(GRADIENT_ANGLE_RANGE.end);
        edits.push(AppearanceEdit::GradientAngle(wrapped));
    }

    egui::ComboBox::from_label("Pattern")
        .selected_text(wall.overlay_pattern.label())
        .show_ui(ui, |ui| {
            for pattern in OverlayPattern::ALL {
                if ui
                    .selectable_value(&mut wall.overlay_pattern, pattern, pattern.label())
                    .changed()
                {
                    edits.push(AppearanceEdit::OverlayPattern(pattern));
                }
            }
        });

    if let Some(color) = pattern_color_editor(ui, wall.pattern_color) {
        edits.push(AppearanceEdit::PatternColor(color));
    }

    if ui
        .add(
            egui::Slider::new(&mut wall.pattern_start_scale, PATTERN_SCALE_RANGE)
                .text("Start scale"),
        )
        .changed()
    {
        edits.push(AppearanceEdit::PatternStartScale(wall.pattern_start_scale));
    }
    if ui
        .add(
            egui::Slider::new(&mut wall.pattern_end_scale, PATTERN_SCALE_RANGE).text("End scale"),
        )
        .changed()
    {
        edits.push(AppearanceEdit::PatternEndScale(wall.pattern_end_scale));
    }
    if ui
        .add(egui::Slider::new(&mut wall.pattern_amount, PATTERN_AMOUNT_RANGE).text("Amount"))
        .changed()
    {
        edits.push(AppearanceEdit::PatternAmount(wall.pattern_amount));
    }
    if ui
        .add(egui::Slider::new(&mut wall.pattern_blur, PATTERN_BLUR_RANGE).text("Blur"))
        .changed()
    {
        edits.push(AppearanceEdit::PatternBlur(wall.pattern_blur));
    }

    for edit in edits {
        store.set_wall(role, edit);
    }
}

fn pattern_color_editor(ui: &mut egui::Ui, current: PatternColor) -> Option<PatternColor> {
    let mut next = current;
    ui.horizontal(|ui| {
        ui.label("Pattern colour");
        let explicit = matches!(current, PatternColor::Rgb(_));
        let white = matches!(current, PatternColor::WhiteOpacity(_));
        if ui.radio(explicit, "RGB").clicked() && !explicit {
            next = PatternColor::Rgb(Rgb::WHITE);
        }
        if ui
            .radio(current == PatternColor::InvertedGradient, "Inverted")
            .clicked()
        {
            next = PatternColor::InvertedGradient;
        }
        if ui.radio(white, "White").clicked() && !white {
            next = PatternColor::default();
        }
    });
    match &mut next {
        PatternColor::Rgb(color) => {
            let mut rgb = color.to_array();
            if ui.color_edit_button_rgb(&mut rgb).changed() {
                *color = Rgb::from(rgb);
            }
        }
        PatternColor::WhiteOpacity(alpha) => {
            ui.add(egui::Slider::new(alpha, 0.0..=1.0).text("Opacity"));
        }
        PatternColor::InvertedGradient => {}
    }
    (next != current).then_some(next)
}

fn view_section(
    ui: &mut egui::Ui,
    render_loop: &mut RenderLoop,
    assembler: &mut SceneAssembler,
    camera: &Camera,
) {
    let light = &mut render_loop.light_position;
    ui.add(egui::Slider::new(&mut light.x, -20.0..=20.0).text("Light x"));
    ui.add(egui::Slider::new(&mut light.y, -10.0..=10.0).text("Light y"));
    ui.add(egui::Slider::new(&mut light.z, -10.0..=10.0).text("Light z"));

    ui.horizontal(|ui| {
        ui.radio_value(&mut render_loop.projection, Projection::Perspective, "Perspective");
        ui.radio_value(&mut render_loop.projection, Projection::Orthographic, "Orthographic");
    });

    let defaults = SceneSettings::default();
    let mut settings = *assembler.settings();
    let mut border = settings.border_thickness.is_some();
    if ui.checkbox(&mut border, "Room border").changed() {
        settings.border_thickness = defaults.border_thickness.filter(|_| border);
    }
    let mut marker = settings.light_marker_size.is_some();
    if ui.checkbox(&mut marker, "Light marker").changed() {
        settings.light_marker_size = defaults.light_marker_size.filter(|_| marker);
    }
    assembler.set_settings(settings);

    ui.label(format!(
        "Camera: ({:.1}, {:.1}, {:.1})  yaw {:.0}°  pitch {:.0}°",
        camera.position.x,
        camera.position.y,
        camera.position.z,
        camera.yaw.to_degrees(),
        camera.pitch.to_degrees()
    ));
}
