//! Overlay surface state.
//!
//! Each surface is governed by exactly one boolean here; rendering writes
//! that boolean to the host page and nothing else may assert a conflicting
//! visibility for the same surface. Surfaces are independent: opening one
//! never implicitly closes another.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Panel,
    ReadingGuide,
    StructureMap,
    ShortcutGuide,
    ConsentBanner,
}

impl Surface {
    pub const ALL: [Surface; 5] = [
        Surface::Panel,
        Surface::ReadingGuide,
        Surface::StructureMap,
        Surface::ShortcutGuide,
        Surface::ConsentBanner,
    ];

    /// Attribute suffix used when rendering visibility to the host page.
    pub fn name(&self) -> &'static str {
        match self {
            Surface::Panel => "panel",
            Surface::ReadingGuide => "reading-guide",
            Surface::StructureMap => "structure-map",
            Surface::ShortcutGuide => "shortcut-guide",
            Surface::ConsentBanner => "consent-banner",
        }
    }

    fn index(&self) -> usize {
        Surface::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

struct PendingDismiss {
    surface: Surface,
    deadline: Instant,
    generation: u64,
}

pub struct OverlayManager {
    visible: [bool; Surface::ALL.len()],
    /// Open order; the last entry is the active (topmost) surface.
    stack: Vec<Surface>,
    /// Bumped on every transition of a surface so a scheduled auto-dismiss
    /// taken out against an earlier open can never close a later one.
    generations: [u64; Surface::ALL.len()],
    pending: Option<PendingDismiss>,
}

impl Default for OverlayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayManager {
    /// A fresh manager has every surface hidden.
    pub fn new() -> Self {
        Self {
            visible: [false; Surface::ALL.len()],
            stack: Vec::new(),
            generations: [0; Surface::ALL.len()],
            pending: None,
        }
    }

    pub fn is_open(&self, surface: Surface) -> bool {
        self.visible[surface.index()]
    }

    /// The most recently opened surface that is still visible.
    pub fn active(&self) -> Option<Surface> {
        self.stack.last().copied()
    }

    /// Show a surface. No-op when already visible.
    pub fn open(&mut self, surface: Surface) {
        if self.is_open(surface) {
            return;
        }
        self.visible[surface.index()] = true;
        self.stack.push(surface);
        self.bump(surface);
        tracing::debug!(surface = surface.name(), "overlay opened");
    }

    /// Show a surface and schedule it to auto-dismiss after `ttl`. An
    /// explicit close, or a reopen, invalidates the scheduled dismissal.
    /// At most one dismissal is tracked; scheduling another replaces it.
    pub fn open_with_auto_dismiss(&mut self, surface: Surface, ttl: Duration, now: Instant) {
        self.open(surface);
        self.pending = Some(PendingDismiss {
            surface,
            deadline: now + ttl,
            generation: self.generations[surface.index()],
        });
    }

    /// Hide a surface. No-op when already hidden.
    pub fn close(&mut self, surface: Surface) {
        if !self.is_open(surface) {
            return;
        }
        self.visible[surface.index()] = false;
        self.stack.retain(|s| *s != surface);
        self.bump(surface);
        tracing::debug!(surface = surface.name(), "overlay closed");
    }

    /// Close the active surface, if any. Both the explicit close control
    /// and the cancel key route here so the two triggers cannot diverge.
    pub fn close_active(&mut self) -> Option<Surface> {
        let surface = self.active()?;
        self.close(surface);
        Some(surface)
    }

    pub fn toggle(&mut self, surface: Surface) {
        if self.is_open(surface) {
            self.close(surface);
        } else {
            self.open(surface);
        }
    }

    /// Process a due auto-dismiss. Returns the surface that was closed, if
    /// any. Stale deadlines (the surface transitioned since scheduling) are
    /// discarded without effect.
    pub fn tick(&mut self, now: Instant) -> Option<Surface> {
        let due = matches!(&self.pending, Some(p) if now >= p.deadline);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        if pending.generation != self.generations[pending.surface.index()] {
            tracing::debug!(surface = pending.surface.name(), "discarding stale auto-dismiss");
            return None;
        }
        self.close(pending.surface);
        Some(pending.surface)
    }

    fn bump(&mut self, surface: Surface) {
        self.generations[surface.index()] += 1;
        if matches!(&self.pending, Some(p) if p.surface == surface) {
            self.pending = None;
        }
    }
}
