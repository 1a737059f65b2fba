mod compare;
mod select;

pub use compare::{best_build, compare_builds, current_build, BuildComparison};
pub use select::select_best_build;
