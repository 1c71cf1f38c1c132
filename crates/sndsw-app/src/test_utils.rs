//! Test utilities for driving the event loop without a terminal
//!
//! [`ScriptedKeys`] mimics crossterm: typed input makes a socket readable,
//! and reading drains the socket into an internal buffer. [`RecordingRenderer`]
//! keeps an owned copy of every frame.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsFd, BorrowedFd};
use std::os::unix::net::UnixStream;

use sndsw_core::prelude::*;

use crate::engine::{InputEvent, KeySource, MenuRenderer};
use crate::input_key::InputKey;
use crate::menu::MenuView;

/// Fake keyboard backed by a socket pair
pub struct ScriptedKeys {
    reader: UnixStream,
    writer: UnixStream,
    typed: VecDeque<InputEvent>,
    buffered: VecDeque<InputEvent>,
}

impl ScriptedKeys {
    pub fn new() -> Self {
        let (reader, writer) = UnixStream::pair().expect("socket pair for scripted keys");
        reader
            .set_nonblocking(true)
            .expect("non-blocking scripted keys socket");
        Self {
            reader,
            writer,
            typed: VecDeque::new(),
            buffered: VecDeque::new(),
        }
    }

    /// Type one key
    pub fn press(&mut self, key: InputKey) {
        self.push_event(InputEvent::Key(key));
    }

    /// Deliver any input event
    pub fn push_event(&mut self, event: InputEvent) {
        self.typed.push_back(event);
        self.writer.write_all(&[1]).expect("signal scripted keys");
    }

    /// Events typed or buffered but not read yet
    pub fn pending(&self) -> usize {
        self.typed.len() + self.buffered.len()
    }

    fn fill_buffer(&mut self) -> Result<()> {
        let mut buf = [0u8; 64];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.buffered.extend(self.typed.drain(..));
        Ok(())
    }
}

impl Default for ScriptedKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for ScriptedKeys {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.reader.as_fd()
    }

    fn has_buffered(&self) -> Result<bool> {
        Ok(!self.buffered.is_empty())
    }

    fn read_event(&mut self) -> Result<Option<InputEvent>> {
        self.fill_buffer()?;
        Ok(self.buffered.pop_front())
    }

    fn discard_pending(&mut self) -> Result<()> {
        self.fill_buffer()?;
        self.buffered.clear();
        Ok(())
    }
}

/// Owned copy of one rendered menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub labels: Vec<String>,
    pub cursor: Option<usize>,
    pub current: Option<String>,
}

/// Renderer that remembers every frame
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: Vec<Frame>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl MenuRenderer for RecordingRenderer {
    fn render(&mut self, view: &MenuView<'_>) -> Result<()> {
        self.frames.push(Frame {
            labels: view
                .entries
                .iter()
                .map(|e| e.device.display_label().to_string())
                .collect(),
            cursor: view.cursor,
            current: view.current.map(|d| d.display_label().to_string()),
        });
        Ok(())
    }
}
