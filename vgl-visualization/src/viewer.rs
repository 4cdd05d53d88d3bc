//! Backend-agnostic viewer: input mapping and camera control
//!
//! A windowing backend owns the event loop and forwards its callbacks to a
//! [`Viewer`]. The viewer maps each input to an [`Action`], applies it to the
//! camera and answers with a [`BackendRequest`] the backend must carry out.

use crate::camera::{ArcballCamera, Camera, Pixel};
use crate::config::ViewerConfig;
use crate::renderer::{FrameSetup, Renderer};
use bitflags::bitflags;
use vgl_core::{Mat4f, Viewport};

/// Escape key code
pub const KEY_ESCAPE: char = '\u{1b}';

bitflags! {
    /// Keyboard modifiers held during a mouse press
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Down,
    Up,
}

/// What an input event asks the viewer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Ignore,
    Quit,
    FullscreenOn,
    FullscreenOff,
    FullscreenToggle,
    /// Return the camera to its home state.
    ResetCamera,
    Zoom,
    ZoomIn,
    ZoomOut,
    /// Turn the camera without moving it.
    Pan,
    /// Slide the camera sideways without turning it.
    Move,
    Dolly,
    DollyIn,
    DollyOut,
    /// Orbit the camera around its target.
    Roll,
}

impl Action {
    pub fn is_camera_action(self) -> bool {
        matches!(
            self,
            Action::ResetCamera
                | Action::Zoom
                | Action::ZoomIn
                | Action::ZoomOut
                | Action::Pan
                | Action::Move
                | Action::Dolly
                | Action::DollyIn
                | Action::DollyOut
                | Action::Roll
        )
    }
}

/// Work the windowing backend must do after an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendRequest {
    None,
    Quit,
    EnterFullscreen,
    /// Restore the windowed size.
    LeaveFullscreen { width: u32, height: u32 },
    Redisplay,
}

/// Pointer and keyboard state as of the latest event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pub mouse: Pixel,
    pub prev_mouse: Pixel,
    pub button: Option<MouseButton>,
    pub button_state: Option<ButtonState>,
    pub key: Option<char>,
    pub modifiers: Modifiers,
}

impl InputState {
    fn track(&mut self, x: i32, y: i32) {
        self.prev_mouse = self.mouse;
        self.mouse = (x, y);
    }
}

/// Maps raw input to actions
///
/// Override individual hooks to change bindings; the defaults are
/// Esc to quit, `f` to toggle fullscreen, the wheel to dolly (zoom with
/// shift), left drag to roll (pan with shift), middle drag to move (dolly
/// with shift) and right drag to zoom.
pub trait ActionMapper {
    fn action_for_key(&mut self, key: char, _input: &InputState) -> Action {
        match key {
            KEY_ESCAPE => Action::Quit,
            'f' => Action::FullscreenToggle,
            _ => Action::Ignore,
        }
    }

    fn action_for_mouse_press(&mut self, input: &InputState) -> Action {
        if input.button_state != Some(ButtonState::Down) {
            return Action::Ignore;
        }
        let shift = input.modifiers.contains(Modifiers::SHIFT);
        match input.button {
            Some(MouseButton::WheelUp) if shift => Action::ZoomIn,
            Some(MouseButton::WheelUp) => Action::DollyIn,
            Some(MouseButton::WheelDown) if shift => Action::ZoomOut,
            Some(MouseButton::WheelDown) => Action::DollyOut,
            _ => Action::Ignore,
        }
    }

    fn action_for_mouse_drag(&mut self, input: &InputState) -> Action {
        let shift = input.modifiers.contains(Modifiers::SHIFT);
        match input.button {
            Some(MouseButton::Left) if shift => Action::Pan,
            Some(MouseButton::Left) => Action::Roll,
            Some(MouseButton::Middle) if shift => Action::Dolly,
            Some(MouseButton::Middle) => Action::Move,
            Some(MouseButton::Right) => Action::Zoom,
            _ => Action::Ignore,
        }
    }
}

/// The stock bindings
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultActionMapper;

impl ActionMapper for DefaultActionMapper {}

/// Interactive viewer state, independent of any windowing library
pub struct Viewer<R: Renderer, M: ActionMapper = DefaultActionMapper> {
    config: ViewerConfig,
    camera: Option<Box<dyn Camera>>,
    renderer: R,
    mapper: M,
    input: InputState,
    window_size: (u32, u32),
    size: (u32, u32),
    fullscreen: bool,
}

impl<R: Renderer> Viewer<R> {
    /// Viewer with an arcball camera at the configured home state.
    pub fn new(config: ViewerConfig, renderer: R) -> Self {
        let camera = ArcballCamera::new(config.camera, config.width, config.height);
        Self::with_camera(config, Some(Box::new(camera)), renderer, DefaultActionMapper)
    }
}

impl<R: Renderer, M: ActionMapper> Viewer<R, M> {
    pub fn with_camera(
        config: ViewerConfig,
        camera: Option<Box<dyn Camera>>,
        mut renderer: R,
        mapper: M,
    ) -> Self {
        renderer.setup();
        let size = (config.width, config.height);
        let mut camera = camera;
        if let Some(camera) = camera.as_mut() {
            camera.resize(size.0, size.1);
        }
        log::debug!("Created viewer \"{}\" at {}x{}", config.title, size.0, size.1);
        Self {
            config,
            camera,
            renderer,
            mapper,
            input: InputState::default(),
            window_size: size,
            size,
            fullscreen: false,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn camera(&self) -> Option<&dyn Camera> {
        self.camera.as_deref()
    }

    pub fn camera_mut(&mut self) -> Option<&mut (dyn Camera + 'static)> {
        self.camera.as_deref_mut()
    }

    /// Swap the camera, returning the previous one.
    pub fn set_camera(&mut self, camera: Option<Box<dyn Camera>>) -> Option<Box<dyn Camera>> {
        let mut camera = camera;
        if let Some(camera) = camera.as_mut() {
            camera.resize(self.size.0, self.size.1);
        }
        std::mem::replace(&mut self.camera, camera)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Current drawable size
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Size to restore when leaving fullscreen
    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Matrices and clear colour for the next frame.
    pub fn frame_setup(&self) -> FrameSetup {
        let (projection, view) = match &self.camera {
            Some(camera) => (camera.projection_matrix(), camera.view_matrix()),
            None => (Mat4f::identity(), Mat4f::identity()),
        };
        FrameSetup {
            clear_color: self.config.background,
            viewport: Viewport::with_size(self.size.0 as i32, self.size.1 as i32),
            projection,
            view,
        }
    }

    /// Draw a frame through the renderer.
    pub fn render(&mut self) -> FrameSetup {
        let frame = self.frame_setup();
        self.renderer.render(&frame);
        frame
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.fullscreen {
            self.window_size = (width, height);
        }
        self.size = (width, height);
        if let Some(camera) = self.camera.as_mut() {
            camera.resize(width, height);
        }
    }

    pub fn key_pressed(&mut self, key: char, x: i32, y: i32) -> BackendRequest {
        self.input.track(x, y);
        self.input.key = Some(key);
        let action = self.mapper.action_for_key(key, &self.input);
        self.handle_action(action)
    }

    pub fn mouse_pressed(
        &mut self,
        button: MouseButton,
        state: ButtonState,
        x: i32,
        y: i32,
        modifiers: Modifiers,
    ) -> BackendRequest {
        self.input.track(x, y);
        self.input.button = Some(button);
        self.input.button_state = Some(state);
        self.input.modifiers = modifiers;
        let action = self.mapper.action_for_mouse_press(&self.input);
        self.handle_action(action)
    }

    pub fn mouse_dragged(&mut self, x: i32, y: i32) -> BackendRequest {
        self.input.track(x, y);
        let action = self.mapper.action_for_mouse_drag(&self.input);
        self.handle_action(action)
    }

    /// Apply `action` and report what the backend should do next.
    pub fn handle_action(&mut self, action: Action) -> BackendRequest {
        if action.is_camera_action() {
            return match self.camera.as_mut() {
                Some(camera) => {
                    Self::apply_camera_action(&mut **camera, action, &self.input, &self.config, self.size.0);
                    BackendRequest::Redisplay
                }
                None => BackendRequest::None,
            };
        }

        match action {
            Action::Quit => BackendRequest::Quit,
            Action::FullscreenOn if !self.fullscreen => self.enter_fullscreen(),
            Action::FullscreenOff if self.fullscreen => self.leave_fullscreen(),
            Action::FullscreenToggle if self.fullscreen => self.leave_fullscreen(),
            Action::FullscreenToggle => self.enter_fullscreen(),
            _ => BackendRequest::None,
        }
    }

    fn enter_fullscreen(&mut self) -> BackendRequest {
        self.fullscreen = true;
        log::debug!("Entering fullscreen");
        BackendRequest::EnterFullscreen
    }

    fn leave_fullscreen(&mut self) -> BackendRequest {
        self.fullscreen = false;
        let (width, height) = self.window_size;
        log::debug!("Leaving fullscreen, restoring {}x{}", width, height);
        BackendRequest::LeaveFullscreen { width, height }
    }

    fn apply_camera_action(
        camera: &mut dyn Camera,
        action: Action,
        input: &InputState,
        config: &ViewerConfig,
        width: u32,
    ) {
        let (prev, curr) = (input.prev_mouse, input.mouse);
        let dolly = (width as f32 * config.dolly_step) as i32;
        let zoom = (width as f32 * config.zoom_step) as i32;
        match action {
            Action::ResetCamera => camera.reset(),
            Action::Pan => camera.pan(prev, curr),
            Action::Roll => camera.roll(prev, curr),
            Action::Move => camera.move_by(prev, curr),
            Action::Dolly => camera.dolly(prev, curr),
            Action::DollyIn => camera.dolly((0, 0), (dolly, 0)),
            Action::DollyOut => camera.dolly((0, 0), (-dolly, 0)),
            Action::Zoom => camera.zoom(prev, curr),
            Action::ZoomIn => camera.zoom((0, 0), (zoom, 0)),
            Action::ZoomOut => camera.zoom((0, 0), (-zoom, 0)),
            _ => {}
        }
    }
}
