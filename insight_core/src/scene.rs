// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed reconciliation of mark sets.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::{Mark, MarkId, MarkKind, MarkPayload};

/// Errors produced while reconciling a scene.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// Two marks in the same tick share an identity.
    #[error("duplicate mark id {0:?} in one tick")]
    DuplicateMark(MarkId),
}

/// A change between two consecutive ticks of a [`Scene`].
#[derive(Clone, Debug, PartialEq)]
pub enum MarkDiff {
    /// A new identity appeared.
    Enter {
        /// Mark identity.
        id: MarkId,
        /// Paint order.
        z_index: i32,
        /// State to start from.
        from: MarkPayload,
        /// Target state.
        to: MarkPayload,
    },
    /// An existing identity changed payload or paint order.
    Update {
        /// Mark identity.
        id: MarkId,
        /// New paint order.
        z_index: i32,
        /// Previous target state.
        old: MarkPayload,
        /// New target state.
        new: MarkPayload,
    },
    /// An identity disappeared.
    Exit {
        /// Mark identity.
        id: MarkId,
        /// Last target state.
        old: MarkPayload,
        /// State to animate to before removal, if any.
        to: Option<MarkPayload>,
    },
}

impl MarkDiff {
    /// The identity this diff applies to.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }

    /// The kind of the mark this diff applies to.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Enter { to, .. } => to.kind(),
            Self::Update { new, .. } => new.kind(),
            Self::Exit { old, .. } => old.kind(),
        }
    }
}

/// The previous tick's marks, keyed by identity.
#[derive(Debug, Default)]
pub struct Scene {
    marks: HashMap<MarkId, Mark>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of marks currently bound.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` when no marks are bound.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Returns the bound mark for `id`.
    pub fn get(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id)
    }

    /// Replaces the bound marks with `marks` and returns the differences.
    ///
    /// Enter and update diffs follow the order of `marks`; exit diffs are ordered by id.
    /// On error the scene is left unchanged.
    pub fn tick(&mut self, marks: Vec<Mark>) -> Result<Vec<MarkDiff>, SceneError> {
        let mut seen = HashSet::with_capacity(marks.len());
        for mark in &marks {
            if !seen.insert(mark.id) {
                return Err(SceneError::DuplicateMark(mark.id));
            }
        }

        let mut diffs = Vec::new();
        let mut next = HashMap::with_capacity(marks.len());
        for mark in marks {
            match self.marks.remove(&mark.id) {
                None => diffs.push(MarkDiff::Enter {
                    id: mark.id,
                    z_index: mark.z_index,
                    from: mark.enter.clone().unwrap_or_else(|| mark.payload.clone()),
                    to: mark.payload.clone(),
                }),
                Some(old) => {
                    if old.payload != mark.payload || old.z_index != mark.z_index {
                        diffs.push(MarkDiff::Update {
                            id: mark.id,
                            z_index: mark.z_index,
                            old: old.payload,
                            new: mark.payload.clone(),
                        });
                    }
                }
            }
            next.insert(mark.id, mark);
        }

        let mut gone: Vec<Mark> = self.marks.drain().map(|(_, mark)| mark).collect();
        gone.sort_by_key(|mark| mark.id);
        diffs.extend(gone.into_iter().map(|mark| MarkDiff::Exit {
            id: mark.id,
            old: mark.payload,
            to: mark.exit,
        }));

        self.marks = next;
        log::trace!("scene tick: {} diffs, {} marks", diffs.len(), self.marks.len());
        Ok(diffs)
    }

    /// Removes every mark, returning exit diffs.
    pub fn clear(&mut self) -> Vec<MarkDiff> {
        self.tick(Vec::new()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::Style;
    use alloc::vec;
    use kurbo::Rect;
    use peniko::Color;

    const BARS: u64 = MarkId::space("bars");

    fn bar(key: &str, height: f64) -> Mark {
        let baseline = Rect::new(0.0, 100.0, 10.0, 100.0);
        Mark::new(
            MarkId::for_key(BARS, key),
            MarkPayload::rect(
                Rect::new(0.0, 100.0 - height, 10.0, 100.0),
                Style::filled(Color::from_rgb8(0x31, 0x82, 0xbd)),
            ),
        )
        .with_zero(MarkPayload::rect(
            baseline,
            Style::filled(Color::from_rgb8(0x31, 0x82, 0xbd)),
        ))
    }

    #[test]
    fn first_tick_enters_from_zero_state() {
        let mut scene = Scene::new();
        let diffs = scene.tick(vec![bar("MOBA", 40.0)]).unwrap();
        assert_eq!(diffs.len(), 1, "one enter");
        match &diffs[0] {
            MarkDiff::Enter { from, to, .. } => {
                let MarkPayload::Rect { rect: from, .. } = from else {
                    panic!("rect expected");
                };
                let MarkPayload::Rect { rect: to, .. } = to else {
                    panic!("rect expected");
                };
                assert_eq!(from.height(), 0.0, "enters with zero height");
                assert_eq!(to.height(), 40.0, "targets full height");
            }
            other => panic!("expected enter, got {other:?}"),
        }
    }

    #[test]
    fn unchanged_marks_produce_no_diff() {
        let mut scene = Scene::new();
        scene.tick(vec![bar("MOBA", 40.0)]).unwrap();
        let diffs = scene.tick(vec![bar("MOBA", 40.0)]).unwrap();
        assert!(diffs.is_empty(), "no changes expected, got {diffs:?}");
    }

    #[test]
    fn top_n_change_updates_survivors_and_exits_the_rest() {
        let mut scene = Scene::new();
        scene
            .tick(vec![bar("MOBA", 40.0), bar("Shooter", 30.0), bar("Sports", 20.0)])
            .unwrap();
        let diffs = scene
            .tick(vec![bar("Shooter", 50.0), bar("Strategy", 10.0)])
            .unwrap();

        let shooter = MarkId::for_key(BARS, "Shooter");
        let strategy = MarkId::for_key(BARS, "Strategy");
        let moba = MarkId::for_key(BARS, "MOBA");
        let sports = MarkId::for_key(BARS, "Sports");

        assert!(
            diffs
                .iter()
                .any(|d| matches!(d, MarkDiff::Update { id, .. } if *id == shooter)),
            "survivor must update in place"
        );
        assert!(
            diffs
                .iter()
                .any(|d| matches!(d, MarkDiff::Enter { id, .. } if *id == strategy)),
            "newcomer must enter"
        );
        let exits: std::vec::Vec<_> = diffs
            .iter()
            .filter_map(|d| match d {
                MarkDiff::Exit { id, to, .. } => Some((*id, to.is_some())),
                _ => None,
            })
            .collect();
        assert_eq!(exits.len(), 2, "two identities left");
        assert!(exits.iter().all(|(_, has_zero)| *has_zero), "exit to zero");
        assert!(exits.iter().any(|(id, _)| *id == moba));
        assert!(exits.iter().any(|(id, _)| *id == sports));
        assert_eq!(scene.len(), 2, "one mark per bound identity");
    }

    #[test]
    fn duplicate_ids_are_rejected_without_touching_state() {
        let mut scene = Scene::new();
        scene.tick(vec![bar("MOBA", 40.0)]).unwrap();
        let err = scene
            .tick(vec![bar("Shooter", 1.0), bar("Shooter", 2.0)])
            .unwrap_err();
        assert_eq!(
            err,
            SceneError::DuplicateMark(MarkId::for_key(BARS, "Shooter"))
        );
        assert!(
            scene.get(MarkId::for_key(BARS, "MOBA")).is_some(),
            "previous state kept"
        );
    }

    #[test]
    fn clear_exits_everything() {
        let mut scene = Scene::new();
        scene.tick(vec![bar("MOBA", 40.0), bar("Shooter", 1.0)]).unwrap();
        let diffs = scene.clear();
        assert_eq!(diffs.len(), 2, "both marks exit");
        assert!(scene.is_empty(), "scene is empty after clear");
    }
}
