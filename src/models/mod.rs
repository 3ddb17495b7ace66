//! Data models for the FitTrack dashboard.
//!
//! These models match the dashboard's stored JSON shapes exactly so existing data loads unchanged.

mod member;
mod package;
mod user;
pub mod wire;

pub use member::*;
pub use package::*;
pub use user::*;
