//! End-to-end frame contract checks against the recording backend.

use std::cell::Cell;
use std::rc::Rc;

use lathe_engine::config::Configuration;
use lathe_engine::console::{ConsoleControl, ConsoleError};
use lathe_engine::core::{AppControl, BlendMode, DrawCtx, PassKind, RenderCoordinator, UpdateCtx};
use lathe_engine::shell::{ApplicationShell, ShellState};
use lathe_engine::testing::{
    BackendEvent, MarkingDrawable, RecordingBackend, RecordingFactory, ScriptedHost,
};
use lathe_engine::time::{FrameClock, ManualTimeSource};
use lathe_engine::window::HostEvent;

fn config_800x600() -> Configuration {
    Configuration {
        width: 800,
        height: 600,
        vsync: true,
        ..Configuration::default()
    }
}

fn draw(label: &str, blend: BlendMode) -> BackendEvent {
    BackendEvent::Draw {
        label: label.to_string(),
        blend,
    }
}

struct SilentConsole;

impl ConsoleControl for SilentConsole {
    fn set_visible(&mut self, _visible: bool) -> Result<(), ConsoleError> {
        Ok(())
    }
}

// ── coordinator ──────────────────────────────────────────────────────────

#[test]
fn three_frames_present_three_times_in_pass_order() {
    let mut factory = RecordingFactory::new();
    let journal = factory.journal();
    let mut coord = RenderCoordinator::new();
    coord.configure(&config_800x600(), &mut factory).unwrap();
    coord.register_pass(PassKind::Opaque, MarkingDrawable::new("D1"));
    coord.register_pass(PassKind::Translucent, MarkingDrawable::new("D2"));

    let mut clock = FrameClock::with_source(0.0, ManualTimeSource::new(0.0));
    for _ in 0..3 {
        let report = coord.run_frame(&clock.tick()).unwrap();
        assert!(report.presented);
        assert!(report.failures.is_empty());
    }

    let frame = vec![
        BackendEvent::BeginFrame,
        BackendEvent::Blend(BlendMode::Disabled),
        draw("D1", BlendMode::Disabled),
        BackendEvent::Blend(BlendMode::Enabled),
        draw("D2", BlendMode::Enabled),
        BackendEvent::Blend(BlendMode::Disabled),
        BackendEvent::Present,
    ];
    let expected: Vec<_> = frame.iter().cloned().cycle().take(frame.len() * 3).collect();
    assert_eq!(journal.events(), expected);
    assert_eq!(coord.frames_presented(), 3);
}

#[test]
fn failing_drawable_is_reported_and_the_frame_still_presents() {
    let mut factory = RecordingFactory::new();
    let journal = factory.journal();
    let mut coord = RenderCoordinator::new();
    coord.configure(&config_800x600(), &mut factory).unwrap();

    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    coord.register_named(
        PassKind::Opaque,
        "flaky",
        move |_ctx: &mut DrawCtx<'_, RecordingBackend>| -> anyhow::Result<()> {
            counter.set(counter.get() + 1);
            if counter.get() == 2 {
                anyhow::bail!("second invocation fails");
            }
            Ok(())
        },
    );
    coord.register_pass(PassKind::Translucent, MarkingDrawable::new("D2"));

    let mut clock = FrameClock::with_source(0.0, ManualTimeSource::new(0.0));
    let reports: Vec<_> = (0..3)
        .map(|_| coord.run_frame(&clock.tick()).unwrap())
        .collect();

    assert_eq!(reports[0].failures.len(), 0);
    assert_eq!(reports[1].failures.len(), 1);
    assert_eq!(reports[1].failures[0].label, "flaky");
    assert_eq!(reports[1].failures[0].pass, PassKind::Opaque);
    assert_eq!(reports[2].failures.len(), 0);
    assert!(reports.iter().all(|r| r.presented));

    // Later drawables still ran on the failing frame.
    assert_eq!(journal.count(|e| *e == draw("D2", BlendMode::Enabled)), 3);
    assert_eq!(calls.get(), 3);
}

#[test]
fn clock_regression_yields_a_zero_delta() {
    let source = ManualTimeSource::new(1.0);
    let mut clock = FrameClock::with_source(0.0, source.clone());

    source.set(1.016);
    let first = clock.tick();
    assert!((first.elapsed - 0.016).abs() < 1e-6);

    source.set(1.010);
    let back = clock.tick();
    assert_eq!(back.elapsed, 0.0);

    source.set(1.026);
    let next = clock.tick();
    assert!((next.elapsed - 0.016).abs() < 1e-6);
    assert_eq!(next.frame_index, 2);
}

#[test]
fn resize_takes_effect_on_the_next_frame() {
    let mut factory = RecordingFactory::new();
    let mut coord = RenderCoordinator::new();
    coord.configure(&config_800x600(), &mut factory).unwrap();

    let seen = Rc::new(Cell::new((0, 0)));
    let sink = seen.clone();
    coord.register_named(
        PassKind::Translucent,
        "probe",
        move |ctx: &mut DrawCtx<'_, RecordingBackend>| -> anyhow::Result<()> {
            sink.set((ctx.surface.width, ctx.surface.height));
            Ok(())
        },
    );

    let mut clock = FrameClock::with_source(0.0, ManualTimeSource::new(0.0));
    coord.run_frame(&clock.tick()).unwrap();
    assert_eq!(seen.get(), (800, 600));

    coord.on_resize(1920, 1080);
    coord.run_frame(&clock.tick()).unwrap();
    assert_eq!(seen.get(), (1920, 1080));
}

// ── shell ────────────────────────────────────────────────────────────────

#[test]
fn headless_shell_runs_a_full_lifecycle() {
    let host = ScriptedHost::new(RecordingFactory::new())
        .idle(1)
        .then(vec![HostEvent::Resized { width: 640, height: 480 }])
        .idle(1);
    let journal = host.journal();

    let config = config_800x600();
    let clock = FrameClock::with_source(config.update_rate, ManualTimeSource::new(0.0));
    let mut shell = ApplicationShell::with_parts(config, host, clock, Box::new(SilentConsole));

    shell
        .configure(|coord| {
            coord.register_pass(PassKind::Opaque, MarkingDrawable::new("D1"));
            coord.register_pass(PassKind::Translucent, MarkingDrawable::new("D2"));
            coord.add_update(|ctx: &mut UpdateCtx<'_, RecordingBackend>| {
                if ctx.frame.frame_index == 0 {
                    ctx.register(PassKind::Translucent, MarkingDrawable::new("late"));
                }
                AppControl::Continue
            });
        })
        .unwrap();
    shell.run().unwrap();

    assert_eq!(shell.state(), ShellState::Exited);
    assert_eq!(shell.frames(), 4);
    assert_eq!(journal.count(|e| *e == BackendEvent::Present), 4);
    // Registered during frame 0, drawn from frame 1 on.
    assert_eq!(journal.count(|e| *e == draw("late", BlendMode::Enabled)), 3);
    assert!(journal.events().contains(&BackendEvent::Resize { width: 640, height: 480 }));
    assert_eq!(journal.events().last(), Some(&BackendEvent::Release));
}
