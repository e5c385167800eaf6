//! The entity substrate a scenario is built in.
//!
//! - [`World`] / [`PositionLookup`] - The narrow contract the generator and
//!   the scorer rely on
//! - [`ArenaWorld`] - Pose-only implementation with disc footprints

pub use self::{arena::*, substrate::*};

mod arena;
mod substrate;
