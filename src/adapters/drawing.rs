use crate::domain::ports::DrawingSession;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts start/end calls of a [`HeadlessDrawingSession`].
#[derive(Debug, Clone, Default)]
pub struct DrawingLog {
    starts: Arc<AtomicUsize>,
    ends: Arc<AtomicUsize>,
}

impl DrawingLog {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn ends(&self) -> usize {
        self.ends.load(Ordering::SeqCst)
    }
}

/// Drawing session for hosts without an interactive map, where the vertices
/// come from the command line or a test.
#[derive(Debug, Default)]
pub struct HeadlessDrawingSession {
    active: bool,
    log: DrawingLog,
}

impl HeadlessDrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> DrawingLog {
        self.log.clone()
    }
}

impl DrawingSession for HeadlessDrawingSession {
    fn start(&mut self) {
        self.active = true;
        self.log.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn end(&mut self) {
        self.active = false;
        self.log.ends.fetch_add(1, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
