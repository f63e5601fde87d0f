//! Scene store for Ember.
//!
//! A [`Scene`] holds one camera, an insertion-ordered material table and an
//! ordered list of spheres. Spheres refer to their material through a
//! [`MaterialId`] handle so the geometry stays compact for the intersection
//! loop. Scenes are built through [`SceneBuilder`], which enforces every
//! invariant; once built a scene is read-only.

use std::collections::HashMap;

use ember_math::{Interval, Vec3};
use thiserror::Error;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Errors raised when a scene would violate one of its invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("scene has no camera statement")]
    MissingCamera,

    #[error("camera is declared more than once")]
    DuplicateCamera,

    #[error("aspect ratio must be positive, got {0}")]
    NonPositiveAspect(f32),

    #[error("material `{0}` is already declared")]
    DuplicateMaterial(String),

    #[error("material `{0}` is not declared")]
    UndeclaredMaterial(String),

    #[error("sphere radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("metal fuzz must be within [0, 1], got {0}")]
    FuzzOutOfRange(f32),

    #[error("refraction index must be positive, got {0}")]
    NonPositiveRefractionIndex(f32),
}

/// Result type for scene construction.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Camera placement.
///
/// The camera always looks down -Z with +Y up. The viewport is 2.0 units
/// high and sits at a focal length of 1.0 in front of the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec3,
    aspect_ratio: f32,
}

impl Camera {
    /// Fixed viewport height in world units.
    pub const VIEWPORT_HEIGHT: f32 = 2.0;

    /// Fixed distance from the origin to the viewport plane.
    pub const FOCAL_LENGTH: f32 = 1.0;

    /// Create a camera. The aspect ratio (width / height) must be positive.
    pub fn new(origin: Vec3, aspect_ratio: f32) -> ValidationResult<Self> {
        if !(aspect_ratio > 0.0) {
            return Err(ValidationError::NonPositiveAspect(aspect_ratio));
        }
        Ok(Self {
            origin,
            aspect_ratio,
        })
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Viewport width derived from the aspect ratio.
    pub fn viewport_width(&self) -> f32 {
        self.aspect_ratio * Self::VIEWPORT_HEIGHT
    }
}

/// Surface description. The set of materials is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Lambertian diffuse surface.
    Diffuse { albedo: Color },

    /// Reflective metal.
    ///
    /// `fuzz` is the roughness: 0.0 = perfect mirror, 1.0 = very rough.
    Metal { albedo: Color, fuzz: f32 },

    /// Clear refractive material such as glass (1.5) or diamond (2.4).
    Dielectric { refraction_index: f32 },
}

impl Material {
    pub fn diffuse(albedo: Color) -> Self {
        Self::Diffuse { albedo }
    }

    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Self::Metal { albedo, fuzz }
    }

    pub fn dielectric(refraction_index: f32) -> Self {
        Self::Dielectric { refraction_index }
    }

    /// Check the parameter ranges of this material.
    ///
    /// Albedo colors are deliberately left unchecked.
    pub fn validate(&self) -> ValidationResult<()> {
        match *self {
            Material::Diffuse { .. } => Ok(()),
            Material::Metal { fuzz, .. } => {
                if Interval::UNIT.contains(fuzz) {
                    Ok(())
                } else {
                    Err(ValidationError::FuzzOutOfRange(fuzz))
                }
            }
            Material::Dielectric { refraction_index } => {
                if refraction_index > 0.0 {
                    Ok(())
                } else {
                    Err(ValidationError::NonPositiveRefractionIndex(refraction_index))
                }
            }
        }
    }
}

/// Stable handle into a scene's material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(usize);

impl MaterialId {
    /// Position of the material in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: MaterialId,
}

/// A complete, validated scene.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,
    camera: Camera,
    material_names: Vec<String>,
    materials: Vec<Material>,
    spheres: Vec<Sphere>,
}

impl Scene {
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// All spheres in declaration order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Resolve a material handle.
    ///
    /// Handles are only produced by the builder of this scene, so lookups
    /// cannot fail for spheres taken from [`Scene::spheres`].
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    /// Name a material was declared with.
    pub fn material_name(&self, id: MaterialId) -> &str {
        &self.material_names[id.0]
    }

    /// Look up a material by its declared name.
    pub fn material_by_name(&self, name: &str) -> Option<&Material> {
        self.material_names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.materials[i])
    }

    /// Iterate over `(name, material)` pairs in declaration order.
    pub fn materials(&self) -> impl Iterator<Item = (&str, &Material)> {
        self.material_names
            .iter()
            .map(String::as_str)
            .zip(self.materials.iter())
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }
}

/// Incremental, validating scene construction.
///
/// Used by the DSL parser and by code that builds scenes directly.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    name: String,
    camera: Option<Camera>,
    lookup: HashMap<String, MaterialId>,
    material_names: Vec<String>,
    materials: Vec<Material>,
    spheres: Vec<Sphere>,
}

impl SceneBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scene name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Declare the camera. Only one camera may be declared.
    pub fn camera(&mut self, origin: Vec3, aspect_ratio: f32) -> ValidationResult<()> {
        if self.camera.is_some() {
            return Err(ValidationError::DuplicateCamera);
        }
        self.camera = Some(Camera::new(origin, aspect_ratio)?);
        Ok(())
    }

    /// Declare a named material and return its handle.
    pub fn material(
        &mut self,
        name: impl Into<String>,
        material: Material,
    ) -> ValidationResult<MaterialId> {
        let name = name.into();
        if self.lookup.contains_key(&name) {
            return Err(ValidationError::DuplicateMaterial(name));
        }
        material.validate()?;

        let id = MaterialId(self.materials.len());
        self.lookup.insert(name.clone(), id);
        self.material_names.push(name);
        self.materials.push(material);
        Ok(id)
    }

    /// Add a sphere using a previously declared material.
    pub fn sphere(&mut self, center: Vec3, radius: f32, material: &str) -> ValidationResult<()> {
        let material = *self
            .lookup
            .get(material)
            .ok_or_else(|| ValidationError::UndeclaredMaterial(material.to_string()))?;
        if !(radius > 0.0) {
            return Err(ValidationError::NonPositiveRadius(radius));
        }

        self.spheres.push(Sphere {
            center,
            radius,
            material,
        });
        Ok(())
    }

    /// Finish the scene. Fails if no camera was declared.
    pub fn build(self) -> ValidationResult<Scene> {
        let camera = self.camera.ok_or(ValidationError::MissingCamera)?;
        Ok(Scene {
            name: self.name,
            camera,
            material_names: self.material_names,
            materials: self.materials,
            spheres: self.spheres,
        })
    }
}
