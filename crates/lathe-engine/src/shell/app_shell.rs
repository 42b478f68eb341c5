use anyhow::{Context, Result};

use crate::config::Configuration;
use crate::console::{ConsoleControl, ConsoleGuard, SystemConsole};
use crate::core::{AppControl, PassKind, RenderCoordinator};
use crate::surface::SurfaceHandle;
use crate::time::{FrameClock, SystemTimeSource, TimeSource};
use crate::window::{Host, HostEvent};

use super::state::{ShellError, ShellState};

/// The owning process: builds the surface from configuration, wires the
/// passes and runs the loop until an exit request.
///
/// Exit requests (window close, update returning `Exit`) are observed between
/// frames only; a frame that has started always presents first.
pub struct ApplicationShell<H: Host, S: TimeSource = SystemTimeSource> {
    state: ShellState,
    config: Configuration,

    host: H,
    coordinator: RenderCoordinator<H::Backend>,
    clock: FrameClock<S>,

    console_control: Option<Box<dyn ConsoleControl>>,
    console: Option<ConsoleGuard>,

    exit_requested: bool,
    frames: u64,
}

impl<H: Host> ApplicationShell<H, SystemTimeSource> {
    /// Creates a shell paced by the system clock at `config.update_rate`.
    pub fn new(config: Configuration, host: H) -> Self {
        let clock = FrameClock::new(config.update_rate);
        Self::with_parts(config, host, clock, Box::new(SystemConsole))
    }
}

impl<H: Host, S: TimeSource> ApplicationShell<H, S> {
    pub fn with_parts(
        config: Configuration,
        host: H,
        clock: FrameClock<S>,
        console: Box<dyn ConsoleControl>,
    ) -> Self {
        Self {
            state: ShellState::Created,
            config,
            host,
            coordinator: RenderCoordinator::new(),
            clock,
            console_control: Some(console),
            console: None,
            exit_requested: false,
            frames: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> ShellState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    #[inline]
    pub fn coordinator(&self) -> &RenderCoordinator<H::Backend> {
        &self.coordinator
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Frames run so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Asks the loop to stop after the current frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// `Created → Configured`: applies console visibility, creates the
    /// surface and lets `wire` register update logic and drawables.
    ///
    /// A surface creation failure is fatal: the shell releases what it
    /// acquired and moves to `Exited`.
    pub fn configure<W>(&mut self, wire: W) -> Result<SurfaceHandle>
    where
        W: FnOnce(&mut RenderCoordinator<H::Backend>),
    {
        self.check_transition(ShellState::Configured)?;

        if let Some(control) = self.console_control.take() {
            self.console = Some(ConsoleGuard::acquire(control, self.config.show_console));
        }

        let handle = match self.coordinator.configure(&self.config, &mut self.host) {
            Ok(handle) => handle,
            Err(e) => {
                self.shutdown();
                return Err(e).context("failed to create the rendering surface");
            }
        };

        wire(&mut self.coordinator);
        self.state = ShellState::Configured;
        log::info!(
            "shell configured: {} opaque / {} translucent drawables",
            self.coordinator.pass(PassKind::Opaque).len(),
            self.coordinator.pass(PassKind::Translucent).len()
        );
        Ok(handle)
    }

    /// `Configured → Running → Exited`: runs frames until an exit request or
    /// a fatal error, then releases all resources.
    pub fn run(&mut self) -> Result<()> {
        self.check_transition(ShellState::Running)?;
        self.state = ShellState::Running;
        self.clock.reset();
        log::info!("entering frame loop");

        let result = self.run_loop();
        if let Err(e) = &result {
            log::error!("frame loop terminated: {e:#}");
        }

        self.shutdown();
        result
    }

    /// Releases surface, window and console. Idempotent; `Exited` is terminal.
    pub fn shutdown(&mut self) {
        if self.state == ShellState::Exited {
            return;
        }

        self.coordinator.release();
        self.host.release();
        if let Some(mut console) = self.console.take() {
            console.release();
        }

        log::info!("shell exited after {} frames ({})", self.frames, self.state);
        self.state = ShellState::Exited;
    }

    fn run_loop(&mut self) -> Result<()> {
        while !self.exit_requested {
            let frame = self.clock.tick();

            let report = self
                .coordinator
                .run_frame(&frame)
                .with_context(|| format!("frame {} failed", frame.frame_index))?;
            self.frames += 1;

            if report.control == AppControl::Exit {
                log::info!("exit requested by update logic");
                self.exit_requested = true;
            }

            for event in self.host.pump_events() {
                match event {
                    HostEvent::Resized { width, height } => self.coordinator.on_resize(width, height),
                    HostEvent::CloseRequested => {
                        log::info!("exit requested by host");
                        self.exit_requested = true;
                    }
                    HostEvent::ContextLost(reason) => {
                        anyhow::bail!("platform context lost: {reason}")
                    }
                }
            }
        }

        Ok(())
    }

    fn check_transition(&self, to: ShellState) -> Result<(), ShellError> {
        if self.state.can_transition(to) {
            Ok(())
        } else {
            Err(ShellError::InvalidTransition { from: self.state, to })
        }
    }
}

impl<H: Host, S: TimeSource> Drop for ApplicationShell<H, S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::console::ConsoleError;
    use crate::core::{DrawCtx, PassKind, UpdateCtx};
    use crate::testing::{BackendEvent, MarkingDrawable, RecordingBackend, RecordingFactory, ScriptedHost};
    use crate::time::ManualTimeSource;

    #[derive(Clone, Default)]
    struct FakeConsole {
        calls: Rc<RefCell<Vec<bool>>>,
    }

    impl ConsoleControl for FakeConsole {
        fn set_visible(&mut self, visible: bool) -> Result<(), ConsoleError> {
            self.calls.borrow_mut().push(visible);
            Ok(())
        }
    }

    fn shell_with(
        config: Configuration,
        host: ScriptedHost,
        console: FakeConsole,
    ) -> ApplicationShell<ScriptedHost, ManualTimeSource> {
        let clock = FrameClock::with_source(config.update_rate, ManualTimeSource::new(0.0));
        ApplicationShell::with_parts(config, host, clock, Box::new(console))
    }

    fn config() -> Configuration {
        Configuration {
            width: 800,
            height: 600,
            ..Configuration::default()
        }
    }

    // ── lifecycle ────────────────────────────────────────────────────────

    #[test]
    fn runs_until_close_and_releases_everything() {
        let host = ScriptedHost::new(RecordingFactory::new()).idle(2);
        let journal = host.journal();
        let mut shell = shell_with(config(), host, FakeConsole::default());
        assert_eq!(shell.state(), ShellState::Created);

        let handle = shell
            .configure(|coord| coord.register_pass(PassKind::Opaque, MarkingDrawable::new("geo")))
            .unwrap();
        assert_eq!((handle.width, handle.height), (800, 600));
        assert_eq!(shell.state(), ShellState::Configured);

        shell.run().unwrap();
        assert_eq!(shell.state(), ShellState::Exited);
        // Two idle pumps, then the close request; the frame before it still presents.
        assert_eq!(shell.frames(), 3);
        assert_eq!(journal.count(|e| *e == BackendEvent::Present), 3);
        assert_eq!(journal.count(|e| *e == BackendEvent::Release), 1);
        assert!(shell.host().is_released());
    }

    #[test]
    fn run_before_configure_is_rejected() {
        let mut shell = shell_with(config(), ScriptedHost::new(RecordingFactory::new()), FakeConsole::default());
        let err = shell.run().unwrap_err();
        assert!(err.downcast_ref::<ShellError>().is_some());
        assert_eq!(shell.state(), ShellState::Created);
    }

    #[test]
    fn configure_twice_is_rejected() {
        let mut shell = shell_with(config(), ScriptedHost::new(RecordingFactory::new()), FakeConsole::default());
        shell.configure(|_| {}).unwrap();
        assert!(shell.configure(|_| {}).is_err());
        assert_eq!(shell.host().surfaces_created(), 1);
    }

    #[test]
    fn unsupported_sample_count_exits_without_running() {
        let host = ScriptedHost::new(RecordingFactory::new().with_supported_samples(&[1]));
        let console = FakeConsole::default();
        let cfg = Configuration {
            sample_count: 8,
            show_console: false,
            ..config()
        };
        let mut shell = shell_with(cfg, host, console.clone());

        assert!(shell.configure(|_| {}).is_err());
        assert_eq!(shell.state(), ShellState::Exited);
        assert!(shell.host().is_released());
        // Console was hidden at startup and restored on the failure path.
        assert_eq!(*console.calls.borrow(), [false, true]);
        assert!(shell.run().is_err());
    }

    #[test]
    fn drop_releases_a_configured_shell() {
        let host = ScriptedHost::new(RecordingFactory::new());
        let journal = host.journal();
        let mut shell = shell_with(config(), host, FakeConsole::default());
        shell.configure(|_| {}).unwrap();
        drop(shell);
        assert_eq!(journal.count(|e| *e == BackendEvent::Release), 1);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let host = ScriptedHost::new(RecordingFactory::new());
        let journal = host.journal();
        let mut shell = shell_with(config(), host, FakeConsole::default());
        shell.configure(|_| {}).unwrap();
        shell.shutdown();
        shell.shutdown();
        drop(shell);
        assert_eq!(journal.count(|e| *e == BackendEvent::Release), 1);
    }

    // ── exit & events ────────────────────────────────────────────────────

    #[test]
    fn update_exit_stops_after_the_current_frame() {
        let host = ScriptedHost::new(RecordingFactory::new()).idle(10);
        let journal = host.journal();
        let mut shell = shell_with(config(), host, FakeConsole::default());
        shell
            .configure(|coord| {
                coord.add_update(|ctx: &mut UpdateCtx<'_, RecordingBackend>| {
                    if ctx.frame.frame_index == 1 { AppControl::Exit } else { AppControl::Continue }
                });
            })
            .unwrap();

        shell.run().unwrap();
        assert_eq!(shell.frames(), 2);
        assert_eq!(journal.count(|e| *e == BackendEvent::Present), 2);
    }

    #[test]
    fn resize_events_reach_the_coordinator() {
        let host = ScriptedHost::new(RecordingFactory::new())
            .then(vec![HostEvent::Resized { width: 1024, height: 768 }])
            .idle(1);
        let journal = host.journal();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        let mut shell = shell_with(config(), host, FakeConsole::default());
        shell
            .configure(move |coord| {
                coord.register_named(
                    PassKind::Opaque,
                    "probe",
                    move |ctx: &mut DrawCtx<'_, RecordingBackend>| -> anyhow::Result<()> {
                        sink.borrow_mut().push((ctx.surface.width, ctx.surface.height));
                        Ok(())
                    },
                );
            })
            .unwrap();
        shell.run().unwrap();

        assert_eq!(*seen.borrow(), [(800, 600), (1024, 768), (1024, 768)]);
        assert!(journal.events().contains(&BackendEvent::Resize { width: 1024, height: 768 }));
    }

    #[test]
    fn context_loss_is_fatal_and_still_releases() {
        let host = ScriptedHost::new(RecordingFactory::new()).then(vec![HostEvent::ContextLost("gone".into())]);
        let journal = host.journal();
        let mut shell = shell_with(config(), host, FakeConsole::default());
        shell.configure(|_| {}).unwrap();

        assert!(shell.run().is_err());
        assert_eq!(shell.state(), ShellState::Exited);
        assert_eq!(journal.count(|e| *e == BackendEvent::Release), 1);
    }

    #[test]
    fn request_exit_before_run_skips_the_loop() {
        let host = ScriptedHost::new(RecordingFactory::new());
        let mut shell = shell_with(config(), host, FakeConsole::default());
        shell.configure(|_| {}).unwrap();
        shell.request_exit();
        shell.run().unwrap();
        assert_eq!(shell.frames(), 0);
        assert_eq!(shell.host().pumps(), 0);
    }
}
