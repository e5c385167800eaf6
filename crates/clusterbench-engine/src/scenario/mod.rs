//! Everything that decides what the initial world of an episode looks like.

pub use self::{config::*, defaults::*, generator::*, partition::*, seed::*};

mod config;
mod defaults;
mod generator;
mod partition;
mod seed;
