// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Playback of scene diffs over time.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::{MarkDiff, MarkId, MarkPayload, Transition};

#[derive(Clone, Debug)]
struct Track {
    z_index: i32,
    from: MarkPayload,
    to: MarkPayload,
    start: f64,
    exiting: bool,
}

impl Track {
    fn sample(&self, transition: &Transition, now: f64) -> MarkPayload {
        self.from.lerp(&self.to, transition.progress(self.start, now))
    }
}

/// A mark as it should be drawn at a given instant.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMark {
    /// Mark identity.
    pub id: MarkId,
    /// Paint order.
    pub z_index: i32,
    /// Interpolated payload.
    pub payload: MarkPayload,
}

/// Interpolates marks between reconciliation ticks.
///
/// Every diff restarts its mark's transition at the time it is applied. When a mark is
/// still moving, the new transition starts from its currently displayed state, so rapid
/// successive updates never jump.
#[derive(Debug, Default)]
pub struct Animator {
    transition: Transition,
    tracks: HashMap<MarkId, Track>,
}

impl Animator {
    /// Creates an animator using `transition` for every diff.
    pub fn new(transition: Transition) -> Self {
        Self {
            transition,
            tracks: HashMap::new(),
        }
    }

    /// The transition applied to diffs.
    pub fn transition(&self) -> Transition {
        self.transition
    }

    /// Number of marks currently displayed, including exiting ones.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Returns `true` when nothing is displayed.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Starts transitions for `diffs` at time `now` (milliseconds).
    pub fn apply(&mut self, diffs: &[MarkDiff], now: f64) {
        for diff in diffs {
            match diff {
                MarkDiff::Enter {
                    id,
                    z_index,
                    from,
                    to,
                } => {
                    let from = match self.tracks.get(id) {
                        Some(track) => track.sample(&self.transition, now),
                        None => from.clone(),
                    };
                    self.tracks.insert(
                        *id,
                        Track {
                            z_index: *z_index,
                            from,
                            to: to.clone(),
                            start: now,
                            exiting: false,
                        },
                    );
                }
                MarkDiff::Update {
                    id,
                    z_index,
                    old,
                    new,
                } => {
                    let from = match self.tracks.get(id) {
                        Some(track) => track.sample(&self.transition, now),
                        None => old.clone(),
                    };
                    self.tracks.insert(
                        *id,
                        Track {
                            z_index: *z_index,
                            from,
                            to: new.clone(),
                            start: now,
                            exiting: false,
                        },
                    );
                }
                MarkDiff::Exit { id, old, to } => match to {
                    Some(to) => {
                        let (z_index, from) = match self.tracks.get(id) {
                            Some(track) => (track.z_index, track.sample(&self.transition, now)),
                            None => (0, old.clone()),
                        };
                        self.tracks.insert(
                            *id,
                            Track {
                                z_index,
                                from,
                                to: to.clone(),
                                start: now,
                                exiting: true,
                            },
                        );
                    }
                    None => {
                        self.tracks.remove(id);
                    }
                },
            }
        }
    }

    /// Returns `true` while any transition is still running at `now`.
    pub fn is_animating(&self, now: f64) -> bool {
        self.tracks
            .values()
            .any(|track| !self.transition.is_done(track.start, now))
    }

    /// Samples the displayed state of one mark.
    pub fn sample(&self, id: MarkId, now: f64) -> Option<MarkPayload> {
        self.tracks
            .get(&id)
            .map(|track| track.sample(&self.transition, now))
    }

    /// Samples every displayed mark, ordered by paint order and then id.
    pub fn frame(&self, now: f64) -> Vec<RenderedMark> {
        let mut out: Vec<RenderedMark> = self
            .tracks
            .iter()
            .map(|(id, track)| RenderedMark {
                id: *id,
                z_index: track.z_index,
                payload: track.sample(&self.transition, now),
            })
            .collect();
        out.sort_by_key(|mark| (mark.z_index, mark.id));
        out
    }

    /// Drops exited marks whose transition has finished.
    pub fn settle(&mut self, now: f64) {
        let transition = self.transition;
        self.tracks
            .retain(|_, track| !(track.exiting && transition.is_done(track.start, now)));
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::{Mark, Scene, Style};
    use alloc::vec;
    use kurbo::Point;

    const BUBBLES: u64 = MarkId::space("bubbles");

    fn bubble(key: &str, x: f64, r: f64) -> Mark {
        let zero = MarkPayload::circle(Point::new(x, 50.0), 0.0, Style::default());
        Mark::new(
            MarkId::for_key(BUBBLES, key),
            MarkPayload::circle(Point::new(x, 50.0), r, Style::default()),
        )
        .with_zero(zero)
    }

    fn radius(payload: &MarkPayload) -> f64 {
        match payload {
            MarkPayload::Circle { radius, .. } => *radius,
            other => panic!("circle expected, got {other:?}"),
        }
    }

    #[test]
    fn enter_grows_from_zero_to_target() {
        let mut scene = Scene::new();
        let mut anim = Animator::new(Transition::default());
        let diffs = scene.tick(vec![bubble("Dota 2", 10.0, 8.0)]).unwrap();
        anim.apply(&diffs, 0.0);

        let id = MarkId::for_key(BUBBLES, "Dota 2");
        assert_eq!(radius(&anim.sample(id, 0.0).unwrap()), 0.0, "starts at zero");
        let mid = radius(&anim.sample(id, 375.0).unwrap());
        assert!(mid > 0.0 && mid < 8.0, "mid-transition radius {mid}");
        assert_eq!(radius(&anim.sample(id, 750.0).unwrap()), 8.0, "ends at target");
        assert!(anim.is_animating(700.0));
        assert!(!anim.is_animating(750.0));
    }

    #[test]
    fn exit_shrinks_then_is_removed() {
        let mut scene = Scene::new();
        let mut anim = Animator::new(Transition::default());
        anim.apply(&scene.tick(vec![bubble("Dota 2", 10.0, 8.0)]).unwrap(), 0.0);
        anim.apply(&scene.tick(vec![]).unwrap(), 1000.0);

        let id = MarkId::for_key(BUBBLES, "Dota 2");
        assert_eq!(radius(&anim.sample(id, 1000.0).unwrap()), 8.0, "starts full");
        anim.settle(1500.0);
        assert_eq!(anim.len(), 1, "still exiting");
        assert_eq!(radius(&anim.sample(id, 1750.0).unwrap()), 0.0, "shrinks to zero");
        anim.settle(1750.0);
        assert!(anim.is_empty(), "removed after exit");
    }

    #[test]
    fn interrupted_update_continues_from_displayed_state() {
        let mut scene = Scene::new();
        let mut anim = Animator::new(Transition::default().with_duration_ms(100.0));
        anim.apply(&scene.tick(vec![bubble("LoL", 0.0, 10.0)]).unwrap(), 0.0);
        anim.apply(&scene.tick(vec![bubble("LoL", 0.0, 20.0)]).unwrap(), 100.0);
        // Halfway through the update, retarget again.
        let id = MarkId::for_key(BUBBLES, "LoL");
        let shown = radius(&anim.sample(id, 150.0).unwrap());
        anim.apply(&scene.tick(vec![bubble("LoL", 0.0, 4.0)]).unwrap(), 150.0);
        assert_eq!(
            radius(&anim.sample(id, 150.0).unwrap()),
            shown,
            "no jump on retarget"
        );
        assert_eq!(radius(&anim.sample(id, 250.0).unwrap()), 4.0);
    }

    #[test]
    fn reentering_during_exit_resumes_from_current_state() {
        let mut scene = Scene::new();
        let mut anim = Animator::new(Transition::default().with_duration_ms(100.0));
        anim.apply(&scene.tick(vec![bubble("CS:GO", 0.0, 10.0)]).unwrap(), 0.0);
        anim.apply(&scene.tick(vec![]).unwrap(), 100.0);
        let id = MarkId::for_key(BUBBLES, "CS:GO");
        let shown = radius(&anim.sample(id, 150.0).unwrap());
        anim.apply(&scene.tick(vec![bubble("CS:GO", 0.0, 10.0)]).unwrap(), 150.0);
        assert_eq!(radius(&anim.sample(id, 150.0).unwrap()), shown);
        anim.settle(1000.0);
        assert_eq!(anim.len(), 1, "re-entered mark is kept");
    }

    #[test]
    fn frame_is_sorted_by_z_then_id() {
        let mut scene = Scene::new();
        let mut anim = Animator::new(Transition::immediate());
        let marks = vec![
            bubble("a", 0.0, 1.0).with_z_index(5),
            bubble("b", 0.0, 1.0).with_z_index(1),
            bubble("c", 0.0, 1.0).with_z_index(3),
        ];
        anim.apply(&scene.tick(marks).unwrap(), 0.0);
        let z: std::vec::Vec<i32> = anim.frame(0.0).iter().map(|m| m.z_index).collect();
        assert_eq!(z, vec![1, 3, 5]);
    }
}
