//! Scene file loading.

use std::path::Path;

use crate::dsl::parser::parse_into;
use crate::error::SceneResult;
use crate::scene::{Scene, SceneBuilder};

/// Load a scene file from disk.
///
/// The scene is named after the file stem.
///
/// # Example
///
/// ```ignore
/// use ember_core::load_scene;
///
/// let scene = load_scene("scenes/world.txt")?;
/// println!("Loaded {} spheres", scene.sphere_count());
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<Scene> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let scene = parse_into(&source, SceneBuilder::new().with_name(name))?;

    log::info!(
        "Loaded scene '{}' from {}: {} materials, {} spheres",
        scene.name,
        path.display(),
        scene.material_count(),
        scene.sphere_count()
    );

    Ok(scene)
}
