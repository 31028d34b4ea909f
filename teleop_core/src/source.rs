//! Frame sources: the boundary to whatever produces hand positions.
//!
//! A source runs on its own thread and pushes [`SourceEvent`]s down an
//! `mpsc` channel.  The receiving end is the single consumer that owns the
//! pipeline, so frames are processed strictly one at a time.  Consumers don't
//! need to know whether frames came from hardware, a recording, or the
//! simulator.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::joint::HandFrame;

#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    /// One sensor frame, ready to drive a cycle.
    Frame(HandFrame),
    /// The sensor could not be opened or the tracking stream failed.
    Unavailable(String),
    /// The operator asked to stop.
    Quit,
}

/// Anything that can deliver [`SourceEvent`]s over a channel.
///
/// `run` returns when the source is exhausted or the receiver is dropped.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<F: FrameSource>(source: F) -> Receiver<SourceEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}
