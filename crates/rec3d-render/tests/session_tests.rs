use rec3d_render::{
    launch, Camera, ConsoleRenderer, Controls, Frame, FrameSink, HeldKeys, InputSource, Key,
    LoopState, Map, Plane, Point, RenderSettings, Session, SessionError, Vector, VectorSpace,
};
use std::collections::VecDeque;
use std::io;

/// Replays a fixed key script, then holds `Quit`.
struct Script {
    ticks: VecDeque<io::Result<HeldKeys>>,
    polls: usize,
}

impl Script {
    fn new(ticks: impl IntoIterator<Item = HeldKeys>) -> Self {
        Self {
            ticks: ticks.into_iter().map(Ok).collect(),
            polls: 0,
        }
    }

    fn failing_after(ticks: impl IntoIterator<Item = HeldKeys>) -> Self {
        let mut script = Self::new(ticks);
        script
            .ticks
            .push_back(Err(io::Error::new(io::ErrorKind::BrokenPipe, "tty gone")));
        script
    }
}

impl InputSource for Script {
    fn poll(&mut self) -> io::Result<HeldKeys> {
        self.polls += 1;
        self.ticks
            .pop_front()
            .unwrap_or_else(|| Ok(HeldKeys::none().with(Key::Quit)))
    }
}

#[derive(Default)]
struct Recorder {
    frames: Vec<Frame>,
    fail: bool,
}

impl FrameSink for Recorder {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::Other, "closed"));
        }
        self.frames.push(frame.clone());
        Ok(())
    }
}

fn renderer() -> ConsoleRenderer {
    let space = VectorSpace::standard();
    let mut map = Map::new(space);
    map.push(Plane::new(
        Point::new(10.0, 0.0, 0.0),
        Vector::new(-1.0, 0.0, 0.0),
    ));
    let camera = Camera::new(Point::origin(), Vector::new(1.0, 0.0, 0.0), 90.0, 4, space).unwrap();
    ConsoleRenderer::new(map, camera, RenderSettings::default()).unwrap()
}

fn controls() -> Controls {
    Controls {
        move_step: 1.0,
        turn_step: 10.0,
    }
}

#[test]
fn quit_on_first_tick_renders_nothing() {
    let mut input = Script::new([]);
    let mut output = Recorder::default();

    let frames = launch(renderer(), controls(), &mut input, &mut output).unwrap();

    assert_eq!(frames, 0);
    assert!(output.frames.is_empty());
    assert_eq!(input.polls, 1);
}

#[test]
fn one_frame_per_tick_until_quit() {
    let mut input = Script::new([HeldKeys::none(), HeldKeys::none(), HeldKeys::none()]);
    let mut output = Recorder::default();

    let frames = launch(renderer(), controls(), &mut input, &mut output).unwrap();

    assert_eq!(frames, 3);
    assert_eq!(output.frames.len(), 3);
    assert_eq!(output.frames[0], output.frames[2]);
}

#[test]
fn held_keys_move_the_camera_before_rendering() {
    let mut input = Script::new([
        HeldKeys::none().with(Key::Forward),
        HeldKeys::none().with(Key::Forward).with(Key::StrafeRight),
        HeldKeys::none().with(Key::Backward),
    ]);
    let mut output = Recorder::default();

    launch(renderer(), controls(), &mut input, &mut output).unwrap();

    let positions: Vec<_> = output.frames.iter().map(|frame| frame.pose.position).collect();
    assert_eq!(
        positions,
        vec![
            Point::new(1.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 1.0),
            Point::new(1.0, 0.0, 1.0),
        ]
    );
}

#[test]
fn looking_around_changes_facing_only() {
    let mut input = Script::new([
        HeldKeys::none().with(Key::LookRight),
        HeldKeys::none().with(Key::LookLeft),
        HeldKeys::none().with(Key::LookUp),
    ]);
    let mut output = Recorder::default();

    launch(renderer(), controls(), &mut input, &mut output).unwrap();

    let poses: Vec<_> = output.frames.iter().map(|frame| frame.pose).collect();
    assert!(poses.iter().all(|pose| pose.position == Point::origin()));
    assert!(poses[0].facing.point().z > 0.0);
    assert!(poses[1].facing.point().z.abs() < 1e-9);
    assert!(poses[2].facing.point().y > 0.0);
}

#[test]
fn quit_wins_over_other_keys() {
    let mut input = Script::new([HeldKeys::none().with(Key::Forward).with(Key::Quit)]);
    let mut output = Recorder::default();
    let mut session = Session::new(renderer(), controls());

    let state = session.tick(&mut input, &mut output).unwrap();

    assert_eq!(state, LoopState::Stopped);
    assert_eq!(session.frames_rendered(), 0);
    assert_eq!(session.renderer().camera().position(), Point::origin());
    assert!(output.frames.is_empty());
}

#[test]
fn stopped_session_does_not_poll_again() {
    let mut input = Script::new([]);
    let mut output = Recorder::default();
    let mut session = Session::new(renderer(), controls());

    assert_eq!(session.tick(&mut input, &mut output).unwrap(), LoopState::Stopped);
    assert_eq!(session.tick(&mut input, &mut output).unwrap(), LoopState::Stopped);
    assert_eq!(input.polls, 1);
}

#[test]
fn input_failure_stops_the_loop() {
    let mut input = Script::failing_after([HeldKeys::none()]);
    let mut output = Recorder::default();
    let mut session = Session::new(renderer(), controls());

    assert_eq!(session.tick(&mut input, &mut output).unwrap(), LoopState::Running);
    let err = session.tick(&mut input, &mut output).unwrap_err();

    assert!(matches!(err, SessionError::Input(_)));
    assert_eq!(session.state(), LoopState::Stopped);
    assert_eq!(session.frames_rendered(), 1);
}

#[test]
fn output_failure_is_reported() {
    let mut input = Script::new([HeldKeys::none()]);
    let mut output = Recorder {
        fail: true,
        ..Recorder::default()
    };

    let err = launch(renderer(), controls(), &mut input, &mut output).unwrap_err();
    assert!(matches!(err, SessionError::Output(_)));
}
