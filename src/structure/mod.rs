/// Corner graph and junction detection
pub mod corner;
/// Openings and course splitting
pub mod opening;
/// Walls, courses and the structure arena
pub mod wall;

pub use corner::{Corn, CornId, CornerFrame, CornerLeg, Corns, Junction, JunctionKind};
pub use opening::Opening;
pub use wall::{
    BondId, GroupId, LayerId, Structure, WallLayer, WallLayerGroup, WallSpec, combine_walls,
};
