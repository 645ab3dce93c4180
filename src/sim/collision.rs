//! Contact detection between circular bodies
//!
//! Every collidable thing (the player, enemies, collectibles) is a circle
//! with a category bitmask and a contact mask. A pair is reported when
//! either side's mask includes the other's category. The tracker remembers
//! which pairs overlapped last frame so the host gets begin/end transitions
//! instead of a contact every frame.

use std::collections::BTreeSet;

use glam::Vec2;

use super::entity::EntityId;

/// Which simulation object a body stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyId {
    Player,
    Enemy(EntityId),
    Collectible(EntityId),
}

/// A circle taking part in contact detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub category: u32,
    pub contact_mask: u32,
    pub center: Vec2,
    pub radius: f32,
}

/// Contact transition between two bodies, ordered by id
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactEvent {
    Began(Body, Body),
    Ended(Body, Body),
}

/// Circles touching or overlapping
#[inline]
pub fn circles_overlap(a_center: Vec2, a_radius: f32, b_center: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_center.distance_squared(b_center) <= reach * reach
}

/// Whether contact between `a` and `b` is of interest to either
#[inline]
pub fn should_report(a: &Body, b: &Body) -> bool {
    a.contact_mask & b.category != 0 || b.contact_mask & a.category != 0
}

/// Overlapping pairs carried from frame to frame
#[derive(Debug, Default)]
pub struct ContactTracker {
    touching: BTreeSet<(BodyId, BodyId)>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare this frame's overlaps against the last frame's.
    ///
    /// Pairs that stopped overlapping, or whose body is no longer present,
    /// produce `Ended` (only when both bodies are still present to report
    /// on). Events come out sorted by pair id.
    pub fn step(&mut self, bodies: &[Body]) -> Vec<ContactEvent> {
        let mut ordered: Vec<&Body> = bodies.iter().collect();
        ordered.sort_by_key(|b| b.id);

        let mut now = BTreeSet::new();
        let mut events = Vec::new();
        for (i, a) in ordered.iter().enumerate() {
            for b in &ordered[i + 1..] {
                if !should_report(a, b) || !circles_overlap(a.center, a.radius, b.center, b.radius) {
                    continue;
                }
                let key = (a.id, b.id);
                if !self.touching.contains(&key) {
                    events.push(ContactEvent::Began(**a, **b));
                }
                now.insert(key);
            }
        }

        for &(a_id, b_id) in self.touching.difference(&now) {
            let find = |id: BodyId| ordered.iter().find(|b| b.id == id).copied();
            if let (Some(a), Some(b)) = (find(a_id), find(b_id)) {
                events.push(ContactEvent::Ended(*a, *b));
            }
        }

        self.touching = now;
        events
    }

    pub fn touching(&self) -> impl Iterator<Item = &(BodyId, BodyId)> {
        self.touching.iter()
    }

    pub fn is_touching(&self, a: BodyId, b: BodyId) -> bool {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.touching.contains(&key)
    }

    pub fn clear(&mut self) {
        self.touching.clear();
    }
}
