//! Ember Core - scene description and scene store.
//!
//! This crate provides:
//!
//! - **Scene store**: `Scene`, `Camera`, `Material`, `Sphere`
//! - **Scene language**: tokenizer, parser and file loader
//!
//! # Example
//!
//! ```ignore
//! use ember_core::load_scene;
//!
//! let scene = load_scene("scenes/world.txt")?;
//! println!("Loaded {} materials, {} spheres",
//!     scene.material_count(),
//!     scene.sphere_count());
//! ```

pub mod dsl;
pub mod error;
pub mod scene;

// Re-export commonly used types
pub use dsl::{load_scene, parse_scene};
pub use error::{SceneError, SceneResult, SyntaxError};
pub use scene::{Camera, Color, Material, MaterialId, Scene, SceneBuilder, Sphere, ValidationError};
