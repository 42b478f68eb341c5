//! In-memory collaborators for exercising the frame contract without a GPU.
//!
//! `RecordingBackend` journals every call the coordinator makes, so ordering
//! and blend-state properties can be asserted from a single event list.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::config::Configuration;
use crate::core::{Backend, BlendMode, DrawCtx, FrameError, SurfaceCreationError, SurfaceFactory};
use crate::surface::{PresentMode, SurfaceHandle, SurfaceState};
use crate::window::{Host, HostEvent};

/// One call observed by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    BeginFrame,
    Blend(BlendMode),
    /// Emitted by drawables through [`RecordingBackend::mark`].
    Draw { label: String, blend: BlendMode },
    Present,
    Resize { width: u32, height: u32 },
    Release,
}

/// Shared event journal; clones observe the same list.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<BackendEvent>>>);

impl Journal {
    pub fn push(&self, ev: BackendEvent) {
        self.0.borrow_mut().push(ev);
    }

    pub fn events(&self) -> Vec<BackendEvent> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&BackendEvent) -> bool) -> usize {
        self.0.borrow().iter().filter(|ev| pred(ev)).count()
    }
}

/// Backend that records calls instead of touching a GPU.
#[derive(Debug)]
pub struct RecordingBackend {
    journal: Journal,
    handle: SurfaceHandle,
    blend: BlendMode,
    begin_script: VecDeque<FrameError>,
    present_script: VecDeque<FrameError>,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_handle(SurfaceHandle {
            width,
            height,
            sample_count: 1,
            present_mode: PresentMode::Vsync,
        })
    }

    pub fn with_handle(handle: SurfaceHandle) -> Self {
        Self {
            journal: Journal::default(),
            handle,
            blend: BlendMode::Disabled,
            begin_script: VecDeque::new(),
            present_script: VecDeque::new(),
        }
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    /// Makes the next `begin_frame` fail with `err`.
    pub fn fail_next_begin(&mut self, err: FrameError) {
        self.begin_script.push_back(err);
    }

    /// Makes the next `present` fail with `err`.
    pub fn fail_next_present(&mut self, err: FrameError) {
        self.present_script.push_back(err);
    }

    /// Records a draw with the blend state active at the time of the call.
    pub fn mark(&mut self, label: impl Into<String>) {
        self.journal.push(BackendEvent::Draw {
            label: label.into(),
            blend: self.blend,
        });
    }
}

impl Backend for RecordingBackend {
    fn handle(&self) -> SurfaceHandle {
        self.handle
    }

    fn begin_frame(&mut self) -> Result<(), FrameError> {
        if let Some(err) = self.begin_script.pop_front() {
            return Err(err);
        }
        self.journal.push(BackendEvent::BeginFrame);
        Ok(())
    }

    fn set_blending(&mut self, mode: BlendMode) {
        self.blend = mode;
        self.journal.push(BackendEvent::Blend(mode));
    }

    fn blending(&self) -> BlendMode {
        self.blend
    }

    fn present(&mut self) -> Result<(), FrameError> {
        if let Some(err) = self.present_script.pop_front() {
            return Err(err);
        }
        self.journal.push(BackendEvent::Present);
        Ok(())
    }

    fn resize(&mut self, surface: &SurfaceState) {
        self.handle.width = surface.width;
        self.handle.height = surface.height;
        self.journal.push(BackendEvent::Resize {
            width: surface.width,
            height: surface.height,
        });
    }

    fn release(&mut self) {
        self.journal.push(BackendEvent::Release);
    }
}

/// Factory producing [`RecordingBackend`]s that share one journal.
#[derive(Debug, Clone)]
pub struct RecordingFactory {
    journal: Journal,
    supported_samples: Vec<u32>,
    created: usize,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self {
            journal: Journal::default(),
            supported_samples: vec![1, 4],
            created: 0,
        }
    }

    /// Restricts the sample counts the simulated host accepts.
    pub fn with_supported_samples(mut self, samples: &[u32]) -> Self {
        self.supported_samples = samples.to_vec();
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    /// Number of surfaces created so far.
    pub fn created(&self) -> usize {
        self.created
    }
}

impl Default for RecordingFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceFactory for RecordingFactory {
    type Backend = RecordingBackend;

    fn create_surface(
        &mut self,
        config: &Configuration,
    ) -> Result<RecordingBackend, SurfaceCreationError> {
        if !self.supported_samples.contains(&config.sample_count) {
            return Err(SurfaceCreationError::UnsupportedSampleCount {
                requested: config.sample_count,
                supported: self.supported_samples.clone(),
            });
        }

        self.created += 1;
        let mut backend = RecordingBackend::with_handle(SurfaceHandle {
            width: config.width,
            height: config.height,
            sample_count: config.sample_count,
            present_mode: PresentMode::from_vsync(config.vsync),
        });
        backend.journal = self.journal.clone();
        Ok(backend)
    }
}

/// Drawable that marks the backend journal with its label on every call.
#[derive(Debug, Clone)]
pub struct MarkingDrawable {
    label: String,
}

impl MarkingDrawable {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl crate::core::Drawable<RecordingBackend> for MarkingDrawable {
    fn draw(&mut self, ctx: &mut DrawCtx<'_, RecordingBackend>) -> anyhow::Result<()> {
        ctx.backend.mark(self.label.clone());
        Ok(())
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Host that replays scripted event batches, one batch per pump.
///
/// Once the script runs dry it reports `CloseRequested`, so a shell driven by
/// it always terminates.
#[derive(Debug)]
pub struct ScriptedHost {
    factory: RecordingFactory,
    script: VecDeque<Vec<HostEvent>>,
    pumps: usize,
    released: bool,
}

impl ScriptedHost {
    pub fn new(factory: RecordingFactory) -> Self {
        Self {
            factory,
            script: VecDeque::new(),
            pumps: 0,
            released: false,
        }
    }

    /// Appends the events returned by the next unscripted pump.
    pub fn then(mut self, events: Vec<HostEvent>) -> Self {
        self.script.push_back(events);
        self
    }

    /// Pumps with no events, `frames` times.
    pub fn idle(mut self, frames: usize) -> Self {
        for _ in 0..frames {
            self.script.push_back(Vec::new());
        }
        self
    }

    pub fn journal(&self) -> Journal {
        self.factory.journal()
    }

    pub fn pumps(&self) -> usize {
        self.pumps
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn surfaces_created(&self) -> usize {
        self.factory.created()
    }
}

impl SurfaceFactory for ScriptedHost {
    type Backend = RecordingBackend;

    fn create_surface(
        &mut self,
        config: &Configuration,
    ) -> Result<RecordingBackend, SurfaceCreationError> {
        self.factory.create_surface(config)
    }
}

impl Host for ScriptedHost {
    fn pump_events(&mut self) -> Vec<HostEvent> {
        self.pumps += 1;
        self.script
            .pop_front()
            .unwrap_or_else(|| vec![HostEvent::CloseRequested])
    }

    fn release(&mut self) {
        self.released = true;
    }
}
