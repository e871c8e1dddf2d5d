// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity-keyed marks and their reconciliation.
//!
//! Charts describe what they want on screen as a flat list of [`Mark`]s. Every mark has a
//! [`MarkId`] derived from the meaning of the datum it draws (a game name, a market plus a
//! year, an axis tick label), never from its position in a list.
//!
//! [`Scene::tick`] compares one list against the previous one and yields [`MarkDiff`]s:
//! - `Enter` for new identities (starting from the mark's zero state),
//! - `Update` for identities whose geometry or style changed,
//! - `Exit` for identities that disappeared (ending at the mark's zero state).
//!
//! An [`Animator`] turns those diffs into interpolated frames over a shared [`Transition`].

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod animator;
mod mark;
mod scene;
mod tooltip;
mod transition;

pub use animator::{Animator, RenderedMark};
pub use mark::{Mark, MarkId, MarkKind, MarkPayload, Style, TextAnchor, TextBaseline};
pub use scene::{MarkDiff, Scene, SceneError};
pub use tooltip::{TOOLTIP_OFFSET, Tooltip};
pub use transition::{DEFAULT_DURATION_MS, Easing, Transition};
