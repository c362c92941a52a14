/// Visual feedback handles owned by orders
///
/// An order drags an arrow (or anything else implementing [`Feedback`]) along
/// with it and releases it exactly once, when it completes or is canceled.

use glam::DVec3;
use std::sync::{Arc, Mutex};

use crate::config::ArrowConfigData;

/// Contract for the visual object mirroring an order's start and end points
pub trait Feedback: Send + Sync {
    fn set_start(&mut self, point: DVec3);

    /// `finalize` snaps the final length; used once when the drag ends
    fn set_end(&mut self, point: DVec3, finalize: bool);

    fn release(&mut self);
}

/// Shared handles let the caller keep observing a handle it gave away
impl<T: Feedback> Feedback for Arc<Mutex<T>> {
    fn set_start(&mut self, point: DVec3) {
        if let Ok(mut inner) = self.lock() {
            inner.set_start(point);
        }
    }

    fn set_end(&mut self, point: DVec3, finalize: bool) {
        if let Ok(mut inner) = self.lock() {
            inner.set_end(point, finalize);
        }
    }

    fn release(&mut self) {
        if let Ok(mut inner) = self.lock() {
            inner.release();
        }
    }
}

/// Order-owned slot holding an optional feedback handle
///
/// The handle is taken out on release, so it sees `release()` at most once
/// and no updates afterwards.
#[derive(Default)]
pub struct FeedbackSlot {
    handle: Option<Box<dyn Feedback>>,
}

impl FeedbackSlot {
    pub fn new(handle: Option<Box<dyn Feedback>>) -> Self {
        Self { handle }
    }

    pub fn empty() -> Self {
        Self { handle: None }
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    /// Update both ends of the tether (per-tick, never finalizing)
    pub fn track(&mut self, start: DVec3, end: DVec3) {
        if let Some(handle) = self.handle.as_mut() {
            handle.set_start(start);
            handle.set_end(end, false);
        }
    }

    pub fn release(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.release();
        }
    }
}

impl std::fmt::Debug for FeedbackSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Arrow shown while an order is pending
///
/// Points are kept in world space; both initial points sit on a fixed line
/// height so the arrow lies flat over the playing field.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub start: DVec3,
    pub end: DVec3,
    pub base_length: f64,
    pub head_length: f64,
    pub line_height: f64,
    pub released: bool,
}

impl Arrow {
    /// Create an arrow of `base_length` starting at `start`, pointing along `direction`
    pub fn new(start: DVec3, direction: DVec3, base_length: f64, line_height: f64) -> Self {
        let flat_start = DVec3::new(start.x, line_height, start.z);
        let end = start + direction * base_length;

        Self {
            start: flat_start,
            end: DVec3::new(end.x, line_height, end.z),
            base_length,
            head_length: 0.2,
            line_height,
            released: false,
        }
    }

    pub fn from_config(start: DVec3, direction: DVec3, config: &ArrowConfigData) -> Self {
        let mut arrow = Self::new(start, direction, config.base_length, config.line_height);
        arrow.head_length = config.head_length;
        arrow
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Point where the two head strokes meet the shaft
    pub fn head_base(&self) -> DVec3 {
        let back = (self.start - self.end).normalize_or_zero();
        self.end + back * self.head_length
    }
}

impl Feedback for Arrow {
    fn set_start(&mut self, point: DVec3) {
        self.start = point;
    }

    fn set_end(&mut self, point: DVec3, finalize: bool) {
        if !finalize {
            self.end = point;
            return;
        }

        let flat_end = DVec3::new(point.x, self.line_height, point.z);
        match (flat_end - self.start).try_normalize() {
            Some(direction) => self.end = self.start + direction * self.base_length,
            None => self.end = flat_end,
        }
    }

    fn release(&mut self) {
        if !self.released {
            log::trace!("Arrow released at {:?} -> {:?}", self.start, self.end);
        }
        self.released = true;
    }
}
