//! Scene model: the wire types exchanged with the backend and the in-memory store.
//!
//! `Scene` mirrors the backend's `GET scene` body field-for-field (PascalCase
//! keys). `ConfigPayload` is the `POST config` body built from the current
//! scene. `SceneStore` owns the single current scene and is the only place it
//! is mutated: wholesale via [`SceneStore::replace`] after a fetch, or the
//! light alone via [`SceneStore::set_light_position`] during a drag.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::{Deserialize, Deserializer, Serialize};

use crate::transform::Point;

/// An ordered, implicitly closed vertex loop.
pub type Shape = Vec<Point>;

/// Authoritative scene snapshot as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    /// Lit percentage of the floor, computed by the backend.
    pub lit_area: f64,
    pub light: Point,
    /// Occluders; filled and stroked.
    #[serde(deserialize_with = "null_as_empty")]
    pub polygons: Vec<Shape>,
    /// Lit regions; filled, no stroke.
    #[serde(deserialize_with = "null_as_empty")]
    pub triangles: Vec<Shape>,
}

impl Scene {
    /// Parse a `GET scene` response body.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if any field is missing or mistyped.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Build the `POST config` body for this scene.
    #[must_use]
    pub fn config_payload(&self) -> ConfigPayload {
        ConfigPayload {
            light: self.light,
            polygons: self.polygons.clone(),
            scene: SceneSize { x: self.width, y: self.height },
        }
    }
}

/// Scene extent as sent in the config payload (`{"X": width, "Y": height}`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneSize {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
}

/// Body of `POST config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigPayload {
    pub light: Point,
    pub polygons: Vec<Shape>,
    pub scene: SceneSize,
}

/// Go encodes empty slices as `null` when they were never allocated.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Shape>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Shape>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Holds the current scene, or nothing before the first successful load.
#[derive(Debug, Default)]
pub struct SceneStore {
    scene: Option<Scene>,
}

impl SceneStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly fetched scene as a single unit.
    pub fn replace(&mut self, scene: Scene) {
        self.scene = Some(scene);
    }

    /// Move the light. Touches nothing else; a no-op before the first load.
    ///
    /// Returns `false` when there is no scene to update.
    pub fn set_light_position(&mut self, light: Point) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        scene.light = light;
        true
    }

    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }
}
