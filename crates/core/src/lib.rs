pub mod coord;
pub mod range;
pub mod selection;

pub use coord::SelPos;
pub use range::{resolve, Classification, RangeRect, ResolvedRange};
pub use selection::SelectionState;
