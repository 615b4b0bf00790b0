use std::fmt;

use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::error::{StartupError, EXIT_OK, EXIT_STARTUP_FAILURE};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState, Key};

use super::geometry::{constrain_square, initial_geometry, next_square_request};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Key whose fresh press ends the loop.
    pub quit_key: Key,
    /// Keep the window square for its whole lifetime.
    pub square: bool,
    /// Side length used when no monitor can be queried.
    pub fallback_side: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tessel".to_string(),
            quit_key: Key::Q,
            square: true,
            fallback_side: 600,
        }
    }
}

/// Why the render loop ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitReason {
    QuitKey,
    CloseRequested,
    /// The application returned `AppControl::Exit`.
    AppRequested,
    /// The surface ran out of memory mid-loop.
    SurfaceFatal,
    /// The event loop stopped without the runtime asking it to.
    EventLoopEnded,
}

impl ExitReason {
    pub fn exit_code(self) -> i32 {
        match self {
            ExitReason::SurfaceFatal => EXIT_STARTUP_FAILURE,
            _ => EXIT_OK,
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExitReason::QuitKey => "quit key pressed",
            ExitReason::CloseRequested => "window close requested",
            ExitReason::AppRequested => "application requested exit",
            ExitReason::SurfaceFatal => "surface failure",
            ExitReason::EventLoopEnded => "event loop ended",
        };
        f.write_str(s)
    }
}

/// Lifecycle of the render loop.
#[derive(Debug)]
enum LoopState {
    /// Waiting for the platform to allow window creation.
    Starting,
    Running,
    ShuttingDown(ExitReason),
    Failed(StartupError),
}

impl LoopState {
    fn is_running(&self) -> bool {
        matches!(self, LoopState::Running)
    }

    /// The loop should stop: shut down or failed to start.
    fn is_finished(&self) -> bool {
        matches!(self, LoopState::ShuttingDown(_) | LoopState::Failed(_))
    }

    /// Moves `Running` to `ShuttingDown`. Only the first reason counts.
    fn begin_shutdown(&mut self, reason: ExitReason) -> bool {
        if !self.is_running() {
            return false;
        }
        *self = LoopState::ShuttingDown(reason);
        true
    }

    fn into_result(self) -> Result<ExitReason, StartupError> {
        match self {
            LoopState::ShuttingDown(reason) => Ok(reason),
            LoopState::Failed(e) => Err(e),
            LoopState::Starting | LoopState::Running => Ok(ExitReason::EventLoopEnded),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, brings up the GPU, lets `app` set up its resources,
    /// and runs the render loop until a quit key press or a close request.
    ///
    /// Startup failures are checked in order (window system, window, GPU
    /// context, application setup); the first one aborts startup after
    /// everything created so far is dropped.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<ExitReason, StartupError>
    where
        A: CoreApp,
    {
        let event_loop =
            EventLoop::new().map_err(|e| StartupError::WindowSystem(e.to_string()))?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .map_err(|e| StartupError::WindowSystem(e.to_string()))?;

        state.state.into_result()
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    frame_index: u64,
    /// Non-square size the last square request answered.
    last_corrected: Option<PhysicalSize<u32>>,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    /// True between a successful `App::init` and `App::shutdown`.
    app_live: bool,

    // Field order is drop order: the window entry drops its GPU context
    // before the window itself.
    window: Option<WindowEntry>,
    state: LoopState,
}

impl<A> AppState<A>
where
    A: CoreApp,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            app_live: false,
            window: None,
            state: LoopState::Starting,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), StartupError> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .map(|m| (m.position(), m.size()));
        let geometry = initial_geometry(monitor, self.config.fallback_side);

        let mut attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(geometry.size);
        if let Some(position) = geometry.position {
            attrs = attrs.with_position(position);
        }

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| StartupError::Window(e.to_string()))?;
        log::info!(
            "window created: {}x{} at {:?}",
            geometry.size.width,
            geometry.size.height,
            geometry.position
        );

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            frame_index: 0,
            last_corrected: None,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .map_err(StartupError::Gpu)?;

        // On failure `entry` drops here: GPU context first, then the window.
        entry.with_gpu(|gpu| self.app.init(gpu))?;
        self.app_live = true;

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        self.state = LoopState::Running;
        log::info!("entering render loop");
        Ok(())
    }

    /// Leaves `Running`: application resources first, then the GPU context
    /// and the window.
    fn shut_down(&mut self, event_loop: &ActiveEventLoop, reason: ExitReason) {
        if !self.state.begin_shutdown(reason) {
            return;
        }
        log::info!("shutting down: {reason}");
        self.release();
        event_loop.exit();
    }

    /// Tears down in order; safe to call more than once.
    fn release(&mut self) {
        if std::mem::take(&mut self.app_live) {
            self.app.shutdown();
        }

        if let Some(entry) = self.window.take() {
            let frames = entry.with_frame_index(|n| *n);
            drop(entry);
            log::debug!("released GPU context and window after {frames} frame(s)");
        }
    }

    fn enforce_square(&mut self, size: PhysicalSize<u32>) {
        if !self.config.square {
            return;
        }
        let Some(entry) = self.window.as_mut() else { return };

        entry.with_mut(|fields| {
            let (request, corrected) = next_square_request(*fields.last_corrected, size);
            *fields.last_corrected = corrected;
            let Some(square) = request else { return };

            log::debug!(
                "window is {}x{}; requesting {}x{}",
                size.width,
                size.height,
                square.width,
                square.height
            );
            // Some: applied immediately, and a Resized event may never follow.
            if let Some(applied) = fields.window.request_inner_size(square) {
                fields.gpu.resize(applied);
                if constrain_square(applied).is_none() {
                    *fields.last_corrected = None;
                }
            }
        });
    }

    fn draw_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else { return };

        let mut control = AppControl::Continue;
        let mut surface_fatal = false;

        entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                surface_fatal: false,
            };

            control = app.on_frame(&mut ctx);
            surface_fatal = ctx.surface_fatal;

            *fields.frame_index = fields.frame_index.wrapping_add(1);
            // Transitions are per frame; held keys stay in `input_state`.
            fields.input_frame.clear();
        });

        if surface_fatal {
            self.shut_down(event_loop, ExitReason::SurfaceFatal);
        } else if control == AppControl::Exit {
            self.shut_down(event_loop, ExitReason::AppRequested);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, LoopState::Starting) {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.state = LoopState::Failed(e);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_finished() {
            event_loop.exit();
            return;
        }
        // Some platforms wake the loop before the first `resumed`.
        if !self.state.is_running() {
            return;
        }

        // Continuous redraw; presentation (FIFO) paces the loop.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if !self.state.is_running() {
            return;
        }
        let quit_key = self.config.quit_key;
        let Some(entry) = self.window.as_mut() else { return };

        let mut quit = false;
        if let Some(ev) = translate_window_event(&event) {
            entry.with_mut(|fields| {
                fields.input_state.apply_event(fields.input_frame, ev);
                quit = fields.input_frame.was_pressed(quit_key);
            });
        }
        if quit {
            log::debug!("{quit_key} pressed");
            self.shut_down(event_loop, ExitReason::QuitKey);
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shut_down(event_loop, ExitReason::CloseRequested),

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                self.enforce_square(new_size);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }

            WindowEvent::RedrawRequested => self.draw_frame(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Covers loops ended by the platform rather than by `shut_down`.
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_exits_return_zero() {
        assert_eq!(ExitReason::QuitKey.exit_code(), 0);
        assert_eq!(ExitReason::CloseRequested.exit_code(), 0);
        assert_eq!(ExitReason::AppRequested.exit_code(), 0);
    }

    #[test]
    fn surface_failure_returns_minus_one() {
        assert_eq!(ExitReason::SurfaceFatal.exit_code(), -1);
    }

    #[test]
    fn shutdown_only_leaves_running_once() {
        let mut state = LoopState::Running;
        assert!(state.begin_shutdown(ExitReason::QuitKey));
        assert!(!state.begin_shutdown(ExitReason::CloseRequested));
        assert_eq!(state.into_result().unwrap(), ExitReason::QuitKey);
    }

    #[test]
    fn loop_keeps_waiting_until_started() {
        assert!(!LoopState::Starting.is_finished());
        assert!(!LoopState::Running.is_finished());
        assert!(LoopState::ShuttingDown(ExitReason::QuitKey).is_finished());
        assert!(LoopState::Failed(StartupError::Window("denied".into())).is_finished());
    }

    #[test]
    fn shutdown_before_running_is_ignored() {
        let mut state = LoopState::Starting;
        assert!(!state.begin_shutdown(ExitReason::CloseRequested));
        assert_eq!(state.into_result().unwrap(), ExitReason::EventLoopEnded);
    }

    #[test]
    fn failed_startup_surfaces_the_error() {
        let state = LoopState::Failed(StartupError::Window("denied".into()));
        let err = state.into_result().unwrap_err();
        assert_eq!(err.exit_code(), -1);
        assert_eq!(err.to_string(), "failed to create the window: denied");
    }

    #[test]
    fn default_config_quits_on_q() {
        let config = RuntimeConfig::default();
        assert_eq!(config.quit_key, Key::Q);
        assert!(config.square);
    }

    // ── teardown ──────────────────────────────────────────────────────────

    #[derive(Default)]
    struct CountingApp {
        shutdowns: u32,
    }

    impl CoreApp for CountingApp {
        fn init(&mut self, _gpu: &Gpu<'_>) -> Result<(), StartupError> {
            Ok(())
        }

        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_, '_>) -> AppControl {
            AppControl::Continue
        }

        fn shutdown(&mut self) {
            self.shutdowns += 1;
        }
    }

    #[test]
    fn release_shuts_the_app_down_once() {
        let mut state = AppState::new(RuntimeConfig::default(), GpuInit::default(), CountingApp::default());
        state.app_live = true;

        // `shut_down` and then `exiting` both release.
        state.release();
        state.release();
        assert_eq!(state.app.shutdowns, 1);
    }

    #[test]
    fn app_that_never_initialized_is_not_shut_down() {
        let mut state = AppState::new(RuntimeConfig::default(), GpuInit::default(), CountingApp::default());
        state.release();
        assert_eq!(state.app.shutdowns, 0);
    }
}
