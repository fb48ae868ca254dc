use std::path::PathBuf;
use std::sync::Arc;

use log::{error, warn};
use tokio::runtime::Runtime;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::app::app::App;
use crate::error::SceneError;

pub struct AppHandler {
    pub app: Option<App>,
    pub asset_dir: PathBuf,
    pub runtime: Runtime,
    /// Set when startup fails; reported by `main` once the loop exits.
    pub error: Option<SceneError>,
}

impl AppHandler {
    pub fn new(asset_dir: PathBuf, runtime: Runtime) -> Self {
        Self {
            app: None,
            asset_dir,
            runtime,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: SceneError) {
        error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Cafevis - Coffee Machine Showcase")
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 800.0));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(
                    event_loop,
                    SceneError::new("create-window").with_arg("reason", e),
                );
                return;
            }
        };

        let handle = self.runtime.handle().clone();
        match self
            .runtime
            .block_on(App::new(window, handle, &self.asset_dir))
        {
            Ok(mut app) => {
                app.start_loading();
                self.app = Some(app);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(app) = &mut self.app {
            let response = app.handle_event(&event);
            if response.repaint {
                app.window.request_redraw();
            }
            if response.exit {
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(app) = &mut self.app {
            match app.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    app.reconfigure_surface();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory, exiting");
                    event_loop.exit();
                }
                Err(e) => warn!("Render error: {e:?}"),
            }
            app.window.request_redraw();
        }
    }
}
