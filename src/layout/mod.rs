//! Collision-aware bubble placement.
//!
//! The engine owns the set of rectangles currently occupying a window and a
//! table of preferred (sticky) positions. Placement prefers, in order: the
//! caller's remembered position if it still fits, the best-scoring free slot
//! found by a grid scan, and finally a deterministic cascade that always
//! yields *some* position. Running out of free space is a degraded outcome,
//! not an error.

use std::collections::BTreeMap;

use crate::constants::{CASCADE_STEP, MAX_GRID_CANDIDATES, SPACING_BONUS_RADIUS};
use crate::geometry::{PointF, RectF};

/// Which branch of the placement algorithm produced a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    /// The sticky preferred position was still valid and used unchanged.
    Preferred,
    /// Best-scoring non-overlapping grid candidate.
    Scored,
    /// No overlap-free slot existed; deterministic cascade offset applied.
    Cascade,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: PointF,
    pub kind: PlacementKind,
}

/// Placement engine scoped to one window's bounds.
///
/// Keys identify rectangles across calls; insertion order of the active set
/// is stable, which makes resize reflow deterministic.
#[derive(Debug, Clone)]
pub struct PlacementEngine<K: Copy + Eq + Ord> {
    bounds: RectF,
    active: Vec<(K, RectF)>,
    preferred: BTreeMap<K, PointF>,
}

impl<K: Copy + Eq + Ord> PlacementEngine<K> {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            bounds: RectF::new(0.0, 0.0, width, height),
            active: Vec::new(),
            preferred: BTreeMap::new(),
        }
    }

    pub fn bounds(&self) -> RectF {
        self.bounds
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn rect_of(&self, key: K) -> Option<RectF> {
        self.active
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, rect)| *rect)
    }

    /// Compute and record a position for `key`. The rectangle is inserted
    /// into the active set and the result becomes its preferred position.
    /// Re-placing an existing key removes its old rectangle first so it never
    /// collides with itself.
    pub fn place(&mut self, key: K, width: f32, height: f32) -> Placement {
        self.remove_active(key);
        let placement = self.position_for(key, width, height);
        self.active
            .push((key, RectF::new(placement.position.x, placement.position.y, width, height)));
        self.preferred.insert(key, placement.position);
        placement
    }

    /// Insert a rectangle at an externally chosen position (e.g. after a
    /// drag) and remember it as preferred.
    pub fn occupy(&mut self, key: K, rect: RectF) {
        self.remove_active(key);
        self.active.push((key, rect));
        self.preferred.insert(key, rect.origin());
    }

    /// Drop a rectangle and its preferred position.
    pub fn remove(&mut self, key: K) {
        self.remove_active(key);
        self.preferred.remove(&key);
    }

    /// Drop every active rectangle but keep the preferred-position table, so
    /// re-inserted keys stay sticky.
    pub fn clear_active(&mut self) {
        self.active.clear();
    }

    pub fn set_preferred(&mut self, key: K, position: PointF) {
        self.preferred.insert(key, position);
        if let Some(entry) = self.active.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = entry.1.at(position);
        }
    }

    /// Update the window bounds and re-place every active rectangle in stable
    /// insertion order, so each repositioned rectangle is collision context
    /// for the ones after it. Returns `(key, old, new)` for every rectangle
    /// so callers can animate the moves.
    pub fn resize(&mut self, width: f32, height: f32) -> Vec<(K, PointF, PointF)> {
        self.bounds = RectF::new(0.0, 0.0, width, height);
        let old = std::mem::take(&mut self.active);
        let mut moves = Vec::with_capacity(old.len());
        for (key, rect) in old {
            let placement = self.position_for(key, rect.width, rect.height);
            self.active.push((key, rect.at(placement.position)));
            self.preferred.insert(key, placement.position);
            moves.push((key, rect.origin(), placement.position));
        }
        moves
    }

    /// Pure placement computation; does not mutate the active set.
    pub fn position_for(&self, key: K, width: f32, height: f32) -> Placement {
        // Sticky: a previously recorded position wins while it still fits.
        if let Some(&preferred) = self.preferred.get(&key) {
            let candidate = RectF::new(preferred.x, preferred.y, width, height);
            if self.is_free(&candidate) {
                return Placement {
                    position: preferred,
                    kind: PlacementKind::Preferred,
                };
            }
        }

        if let Some(position) = self.best_grid_position(width, height) {
            return Placement {
                position,
                kind: PlacementKind::Scored,
            };
        }

        Placement {
            position: self.cascade_position(width, height),
            kind: PlacementKind::Cascade,
        }
    }

    fn remove_active(&mut self, key: K) {
        self.active.retain(|(k, _)| *k != key);
    }

    fn is_free(&self, rect: &RectF) -> bool {
        self.bounds.encloses(rect) && !self.active.iter().any(|(_, other)| rect.intersects(other))
    }

    /// Grid scan over origins that keep the rectangle fully inside bounds,
    /// x-major. Lower score wins; the scan order is fixed, so results are
    /// deterministic, and the candidate count is capped.
    fn best_grid_position(&self, width: f32, height: f32) -> Option<PointF> {
        let step = (width.min(height) / 2.0).max(1.0);
        let max_x = self.bounds.width - width;
        let max_y = self.bounds.height - height;
        if max_x < 0.0 || max_y < 0.0 {
            return None;
        }

        let mut best: Option<(f32, PointF)> = None;
        let mut candidates = 0usize;
        let mut x = 0.0f32;
        'scan: while x <= max_x {
            let mut y = 0.0f32;
            while y <= max_y {
                let candidate = RectF::new(x, y, width, height);
                if self.is_free(&candidate) {
                    let score = self.score(&candidate);
                    if best.is_none_or(|(best_score, _)| score < best_score) {
                        best = Some((score, candidate.origin()));
                    }
                }
                candidates += 1;
                if candidates >= MAX_GRID_CANDIDATES {
                    tracing::debug!(candidates, "placement grid scan hit candidate cap");
                    break 'scan;
                }
                y += step;
            }
            x += step;
        }
        best.map(|(_, position)| position)
    }

    /// Distance from window center, minus a spacing bonus that penalizes
    /// crowding existing rectangles.
    fn score(&self, rect: &RectF) -> f32 {
        let center = rect.center();
        let mut score = center.distance_to(self.bounds.center());
        for (_, existing) in &self.active {
            let distance = center.distance_to(existing.center());
            score -= (SPACING_BONUS_RADIUS - distance).max(0.0);
        }
        score
    }

    /// Window-centered origin pushed down-right by 20 px per existing
    /// rectangle, clamped into bounds. Always terminates with a position.
    fn cascade_position(&self, width: f32, height: f32) -> PointF {
        let offset = self.active.len() as f32 * CASCADE_STEP;
        let base = RectF::new(
            self.bounds.width / 2.0 - width / 2.0 + offset,
            self.bounds.height / 2.0 - height / 2.0 + offset,
            width,
            height,
        );
        base.clamped_into(&self.bounds).origin()
    }
}
