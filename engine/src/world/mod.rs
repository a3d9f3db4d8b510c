//! World Module
//!
//! The scene collaborator the motion and camera cores query: the
//! [`SceneQuery`] trait, ladder geometry, and [`BoxScene`], an in-memory
//! AABB scene implementing it.

pub mod box_scene;
pub mod ladder;
pub mod scene;

pub use box_scene::{BoxScene, SceneObject};
pub use ladder::Ladder;
pub use scene::{SceneQuery, sort_hits_by_distance};
