//! Element geometry and the rounding/grow transform.
//!
//! This module provides the rect model, the `GeometrySource` seam to the
//! host page, and the pure transform applied to every reported dimension.

pub mod memory;
pub mod rect;
pub mod rounding;
pub mod source;
#[cfg(feature = "web")]
pub mod web;

pub use memory::StaticGeometry;
pub use rect::ClientRect;
pub use rounding::{is_valid_unit, round, DimensionKind, GrowMultiples, RoundOp};
pub use source::GeometrySource;
#[cfg(feature = "web")]
pub use web::DomGeometry;
