pub use self::{category::*, descriptor::*, geometry::*};

pub(crate) mod category;
pub(crate) mod descriptor;
pub(crate) mod geometry;
