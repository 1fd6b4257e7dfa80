//! Location types, their shape templates, and randomized placement.

mod catalog;
mod placer;
pub mod shapes;

pub use catalog::{
    AnchorRule, HookContext, LocationCatalog, LocationKind, LocationProfile, PassageHook,
    PlacementPolicy, side_door,
};
pub use placer::{Location, Proposal, Rejection, ReservedSet, commit, propose};
pub use shapes::Shape;
