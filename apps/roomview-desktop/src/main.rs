mod panel;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use roomview_camera::{Camera, CameraController, ControllerSettings, Projection};
use roomview_config::{RoomConfig, WallConfigStore};
use roomview_input::InputSender;
use roomview_render::{RenderLoop, Viewport};
use roomview_render_wgpu::{GpuContext, WgpuRenderer};
use roomview_scene::{SceneAssembler, SceneSettings};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::panel::Panel;

#[derive(Parser)]
#[command(name = "roomview-desktop", about = "Fly through a procedurally shaded room")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML file with startup room and wall settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial window width in pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value = "720")]
    height: u32,

    /// Camera translation speed, units per second
    #[arg(long, default_value = "4.0")]
    move_speed: f32,

    /// Camera rotation speed, radians per second
    #[arg(long, default_value = "0.7")]
    look_speed: f32,

    /// Let pitch pass straight up or down
    #[arg(long)]
    unclamped_pitch: bool,

    /// Start with the orthographic projection
    #[arg(long)]
    orthographic: bool,
}

/// Everything that exists without a GPU.
struct AppState {
    store: WallConfigStore,
    assembler: SceneAssembler,
    controller: CameraController,
    input: InputSender,
    render_loop: RenderLoop,
    panel: Panel,
    started: Instant,
}

impl AppState {
    fn new(cli: &Cli, config: RoomConfig) -> Self {
        let mut store = WallConfigStore::new(config);
        let assembler = SceneAssembler::new(&mut store, SceneSettings::default());

        let mut settings = ControllerSettings {
            move_speed: cli.move_speed,
            look_speed: cli.look_speed,
            ..ControllerSettings::default()
        };
        if cli.unclamped_pitch {
            settings.pitch_limit = None;
        }
        let (controller, input) = CameraController::new(Camera::default(), settings);

        let mut render_loop = RenderLoop::new(Viewport::new(cli.width, cli.height));
        if cli.orthographic {
            render_loop.projection = Projection::Orthographic;
        }

        Self {
            store,
            assembler,
            controller,
            input,
            render_loop,
            panel: Panel::new(),
            started: Instant::now(),
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) {
        if pressed && !repeat && key == KeyCode::F1 {
            self.panel.visible = !self.panel.visible;
            return;
        }
        if let Some(code) = key_code_name(key) {
            self.input.key_event(code, pressed, repeat);
        }
    }

    /// Key-ups and focus loss reach the camera even when egui consumed the
    /// event, otherwise a key released over a text field stays held.
    fn release_keys(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Released,
                        ..
                    },
                ..
            } => self.handle_key(*key, false, false),
            WindowEvent::Focused(false) => {
                self.input.release_all();
            }
            _ => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        self.panel.show(
            ctx,
            &mut self.store,
            &mut self.render_loop,
            &mut self.assembler,
            self.controller.camera(),
        );
    }
}

/// Key-code names understood by [`InputSender::key_event`].
fn key_code_name(key: KeyCode) -> Option<&'static str> {
    let name = match key {
        KeyCode::KeyW => "KeyW",
        KeyCode::KeyS => "KeyS",
        KeyCode::KeyA => "KeyA",
        KeyCode::KeyD => "KeyD",
        KeyCode::Space => "Space",
        KeyCode::ShiftLeft => "ShiftLeft",
        KeyCode::ArrowUp => "ArrowUp",
        KeyCode::ArrowDown => "ArrowDown",
        KeyCode::ArrowLeft => "ArrowLeft",
        KeyCode::ArrowRight => "ArrowRight",
        _ => return None,
    };
    Some(name)
}

/// Window-bound GPU resources, created on `resumed`.
struct Gpu {
    window: Arc<Window>,
    ctx: GpuContext,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    window_size: PhysicalSize<u32>,
    egui_ctx: EguiContext,
    gpu: Option<Gpu>,
}

impl GpuApp {
    fn new(state: AppState, window_size: PhysicalSize<u32>) -> Self {
        Self {
            state,
            window_size,
            egui_ctx: EguiContext::default(),
            gpu: None,
        }
    }

    fn init_gpu(&self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title("Room View")
            .with_inner_size(self.window_size);
        let window = Arc::new(event_loop.create_window(attrs)?);
        let size = window.inner_size();

        let ctx = GpuContext::new(window.clone(), size.width, size.height)?;
        let renderer = WgpuRenderer::new(&ctx.device, ctx.format(), size.width, size.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.format(), None, 1, false);

        Ok(Gpu {
            window,
            ctx,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn redraw(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let state = &mut self.state;

        let output = match gpu.ctx.acquire() {
            Ok(Some(output)) => output,
            Ok(None) => return,
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        state.assembler.sync(&state.store);
        let now = state.started.elapsed().as_secs_f64();
        {
            let mut frame = gpu.renderer.frame(&gpu.ctx.device, &gpu.ctx.queue, &view);
            state.render_loop.tick(
                now,
                &mut state.controller,
                state.assembler.scene(),
                &mut frame,
            );
        }

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = gpu.ctx.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let device = &gpu.ctx.device;
        let queue = &gpu.ctx.queue;
        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        gpu.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state.render_loop.resize(size.width, size.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("GPU initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                self.state.release_keys(&event);
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let width = new_size.width.max(1);
                let height = new_size.height.max(1);
                if let Some(gpu) = &mut self.gpu {
                    gpu.ctx.resize(width, height);
                    gpu.renderer.resize(&gpu.ctx.device, width, height);
                }
                self.state.render_loop.resize(width, height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed, repeat);
            }
            WindowEvent::Focused(false) => self.state.release_keys(&event),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("roomview-desktop starting");

    let config = match &cli.config {
        Some(path) => RoomConfig::load(path)?,
        None => RoomConfig::default(),
    };
    for field in config.out_of_range_fields() {
        tracing::warn!(%field, "config value outside panel range");
    }

    let state = AppState::new(&cli, config);
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state, PhysicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    Ok(())
}
