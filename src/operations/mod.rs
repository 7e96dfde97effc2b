//! Pipeline stages. Each stage is an operation struct with an `execute`
//! method; [`Bake`] chains them.

mod bake;
mod border_width;
mod deduplicate;
mod fill_holes;
mod graph;
mod reachability;

pub use bake::{Bake, BakeInput, BakeOutcome, BakeReport};
pub use border_width::AnnotateBorderWidths;
pub use deduplicate::{DedupStats, Deduplicate};
pub use fill_holes::{FillHoles, FillStats};
pub use graph::{BuildMeshGraph, MeshGraph};
pub use reachability::{FilterReachable, Reachable};
