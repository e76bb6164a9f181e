//! Interactive loop: poll held keys, move the camera, render, present.
//!
//! Terminal handling lives in the binary. The loop only sees the
//! [`InputSource`] and [`FrameSink`] seams, so it can be driven by scripted
//! input in tests.

use crate::console::{ConsoleRenderer, Frame};
use crate::error::SessionError;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    LookUp,
    LookDown,
    LookLeft,
    LookRight,
    Quit,
}

impl Key {
    pub const ALL: [Key; 9] = [
        Key::Forward,
        Key::Backward,
        Key::StrafeLeft,
        Key::StrafeRight,
        Key::LookUp,
        Key::LookDown,
        Key::LookLeft,
        Key::LookRight,
        Key::Quit,
    ];

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Set of keys held during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys(u16);

impl HeldKeys {
    pub fn none() -> Self {
        Self(0)
    }

    pub fn press(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    pub fn with(mut self, key: Key) -> Self {
        self.press(key);
        self
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        Key::ALL.into_iter().filter(|key| self.is_held(*key))
    }
}

impl FromIterator<Key> for HeldKeys {
    fn from_iter<T: IntoIterator<Item = Key>>(iter: T) -> Self {
        let mut keys = Self::none();
        for key in iter {
            keys.press(key);
        }
        keys
    }
}

/// Where held keys come from. A call may block for up to one tick.
pub trait InputSource {
    fn poll(&mut self) -> io::Result<HeldKeys>;
}

/// Where finished frames go.
pub trait FrameSink {
    fn present(&mut self, frame: &Frame) -> io::Result<()>;
}

/// Per-tick movement and turning amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    pub move_step: f64,
    pub turn_step: f64,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            move_step: 0.5,
            turn_step: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

pub struct Session {
    renderer: ConsoleRenderer,
    controls: Controls,
    state: LoopState,
    frames: u64,
}

impl Session {
    pub fn new(renderer: ConsoleRenderer, controls: Controls) -> Self {
        Self {
            renderer,
            controls,
            state: LoopState::Running,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn renderer(&self) -> &ConsoleRenderer {
        &self.renderer
    }

    /// Runs one iteration. A tick that sees `Quit` stops the loop without
    /// drawing another frame; a failing input or output also stops it.
    pub fn tick(
        &mut self,
        input: &mut impl InputSource,
        output: &mut impl FrameSink,
    ) -> Result<LoopState, SessionError> {
        if self.state == LoopState::Stopped {
            return Ok(LoopState::Stopped);
        }

        let keys = match input.poll() {
            Ok(keys) => keys,
            Err(err) => {
                self.state = LoopState::Stopped;
                return Err(SessionError::Input(err));
            }
        };

        if keys.is_held(Key::Quit) {
            self.state = LoopState::Stopped;
            tracing::info!(frames = self.frames, "quit requested");
            return Ok(LoopState::Stopped);
        }

        self.apply(keys);
        let frame = self.renderer.render();
        if let Err(err) = output.present(&frame) {
            self.state = LoopState::Stopped;
            return Err(SessionError::Output(err));
        }
        self.frames += 1;

        Ok(LoopState::Running)
    }

    /// Ticks until the loop stops and returns the number of frames drawn.
    pub fn run(
        mut self,
        input: &mut impl InputSource,
        output: &mut impl FrameSink,
    ) -> Result<u64, SessionError> {
        while self.tick(input, output)? == LoopState::Running {}
        Ok(self.frames)
    }

    fn apply(&mut self, keys: HeldKeys) {
        let Controls {
            move_step,
            turn_step,
        } = self.controls;
        let camera = self.renderer.camera_mut();

        for key in keys.iter() {
            match key {
                Key::Forward => camera.move_forward(move_step),
                Key::Backward => camera.move_backward(move_step),
                Key::StrafeLeft => camera.move_left(move_step),
                Key::StrafeRight => camera.move_right(move_step),
                Key::LookUp => camera.rotate(0.0, turn_step),
                Key::LookDown => camera.rotate(0.0, -turn_step),
                Key::LookLeft => camera.rotate(-turn_step, 0.0),
                Key::LookRight => camera.rotate(turn_step, 0.0),
                Key::Quit => {}
            }
        }
        if !keys.is_empty() {
            tracing::trace!(pose = ?camera.pose(), "camera moved");
        }
    }
}

/// Entry point for the interactive loop.
pub fn launch(
    renderer: ConsoleRenderer,
    controls: Controls,
    input: &mut impl InputSource,
    output: &mut impl FrameSink,
) -> Result<u64, SessionError> {
    tracing::info!(
        width = renderer.camera().width(),
        height = renderer.camera().height(),
        primitives = renderer.map().len(),
        "session started"
    );
    let frames = Session::new(renderer, controls).run(input, output)?;
    tracing::info!(frames, "session ended");
    Ok(frames)
}
