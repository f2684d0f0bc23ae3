//! Turns raw PRTG objects into frames for the dashboard host.

pub mod heatmap;
pub mod table;

pub use heatmap::{heatmap_frame, shape_heatmap};
pub use table::shape_table;
