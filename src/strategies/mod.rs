//! Opportunity strategies: pure functions from market snapshots to
//! `Opportunity` candidates

pub mod multi_leg;
pub mod spread;

pub use multi_leg::plan_multi_leg_path;
pub use spread::find_cex_cex_opportunity;
