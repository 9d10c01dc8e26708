use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use glam::{Vec2, Vec3};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;
use tidepool_assets::{AssetError, ChainDescription, ScenarioConfig, spawn_chain_loader};
use tidepool_ecs::{ComponentStore, Tint};
use tidepool_input::Action;
use tidepool_kernel::{FrameDriver, SimulationState};
use tidepool_render_wgpu::{OrbitCamera, SceneRenderer};
use tidepool_tools::SceneInspector;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "tidepool-desktop", about = "Interactive tidepool scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scenario file (YAML); built-in defaults are used when absent
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Equirectangular backdrop image; overrides the scenario's
    #[arg(long)]
    environment: Option<PathBuf>,

    /// Chain description (JSON); overrides the scenario's
    #[arg(long)]
    chain: Option<PathBuf>,
}

/// Application state: the frame driver plus everything display-side.
struct AppState {
    driver: FrameDriver,
    components: ComponentStore,
    camera: OrbitCamera,
    chain_rx: Option<Receiver<Result<ChainDescription, AssetError>>>,
    environment: Option<PathBuf>,
    started: Instant,
    show_overlay: bool,
    orbiting: bool,
}

impl AppState {
    fn new(cli: &Cli) -> Self {
        let scenario = match &cli.scenario {
            Some(path) => match ScenarioConfig::load(path) {
                Ok(scenario) => scenario,
                Err(e) => {
                    tracing::warn!("failed to load scenario: {e}; using defaults");
                    ScenarioConfig::default()
                }
            },
            None => ScenarioConfig::default(),
        };

        let mut state = SimulationState::default();
        let ids = state.swarm.spawn_scattered(
            scenario.bodies,
            scenario.seed,
            scenario.spread,
            Vec3::splat(scenario.half_extent),
        );
        let mut components = ComponentStore::new();
        for (index, id) in ids.iter().enumerate() {
            components.set_name(*id, format!("drifter_{index:02}"));
            components.set_tint(*id, Tint::from_id(*id));
        }
        tracing::info!(bodies = ids.len(), seed = scenario.seed, "swarm spawned");

        // Chain loads in the background; the scene runs with an empty chain
        // until (unless) it arrives.
        let chain_rx = cli
            .chain
            .clone()
            .or_else(|| scenario.chain.clone())
            .map(spawn_chain_loader);
        let environment = cli.environment.clone().or_else(|| scenario.environment.clone());

        Self {
            driver: FrameDriver::new(state),
            components,
            camera: OrbitCamera::default(),
            chain_rx,
            environment,
            started: Instant::now(),
            show_overlay: true,
            orbiting: false,
        }
    }

    /// Install any finished asset loads, then advance the simulation one
    /// tick. Runs once per redraw, before rendering.
    fn update(&mut self) {
        self.drain_chain_loads();
        let wall_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.driver.tick(wall_ms);
    }

    /// Drains the loader channel between ticks, so a tick never observes a
    /// partially installed chain.
    fn drain_chain_loads(&mut self) {
        let Some(rx) = &self.chain_rx else { return };
        match rx.try_recv() {
            Ok(Ok(description)) => {
                self.driver.state_mut().chain.install(description.joints());
                self.chain_rx = None;
            }
            Ok(Err(e)) => {
                tracing::warn!("chain description failed to load: {e}; chain stays empty");
                self.chain_rx = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.chain_rx = None;
            }
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Orbit(delta) => self.camera.orbit(delta.x, delta.y),
            Action::Zoom(lines) => self.camera.zoom(lines),
            Action::TogglePause => {
                if self.driver.is_running() {
                    self.driver.stop();
                } else {
                    self.driver.resume();
                }
            }
            Action::ToggleOverlay => self.show_overlay = !self.show_overlay,
            Action::Noop => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_overlay {
            return;
        }

        let summary = SceneInspector::summary(&self.driver);

        egui::Window::new("tidepool")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.label(format!("Ticks: {}  Sim time: {:.2}", summary.ticks, summary.sim_time));
                ui.label(format!(
                    "Bodies: {}  Joints: {}",
                    summary.body_count, summary.joint_count
                ));
                let pause_label = if summary.running { "Pause (Space)" } else { "Resume (Space)" };
                if ui.button(pause_label).clicked() {
                    self.apply(Action::TogglePause);
                }
                ui.separator();
                for (id, name) in self.components.names() {
                    if let Some(info) =
                        SceneInspector::inspect_body(self.driver.state(), *id)
                    {
                        let p = info.placement.position;
                        ui.small(format!(
                            "{}  ({:.2}, {:.2}, {:.2})",
                            name.0, p.x, p.y, p.z
                        ));
                    }
                }
                ui.separator();
                ui.small("F1: overlay | LMB drag: orbit | wheel: zoom");
            });
    }
}

fn map_key(key: KeyCode) -> Action {
    match key {
        KeyCode::Space => Action::TogglePause,
        KeyCode::F1 => Action::ToggleOverlay,
        _ => Action::Noop,
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<SceneRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Tidepool")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("tidepool_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.camera.aspect = size.width as f32 / size.height.max(1) as f32;

        let mut renderer = SceneRenderer::new(&device, surface_format, size.width, size.height);
        if let Some(path) = self.state.environment.clone() {
            if let Err(e) = renderer.install_backdrop(&device, &queue, &path) {
                tracing::warn!("backdrop failed to load: {e}; using flat clear color");
            }
        }

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state.camera.aspect =
                        config.width as f32 / config.height.max(1) as f32;
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let action = map_key(key);
                self.state.apply(action);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state.orbiting = btn_state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                self.state.apply(Action::Zoom(lines));
            }
            WindowEvent::RedrawRequested => {
                self.state.update();

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                if let Some(renderer) = &self.renderer {
                    renderer.render(
                        device,
                        queue,
                        &view,
                        &self.state.camera,
                        self.state.driver.state(),
                        &self.state.components,
                    );
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
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
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
                // Re-arm: one tick per display refresh, forever.
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.orbiting {
                self.state
                    .apply(Action::Orbit(Vec2::new(delta.0 as f32, delta.1 as f32)));
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("tidepool-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(&cli));
    event_loop.run_app(&mut app)?;

    Ok(())
}
