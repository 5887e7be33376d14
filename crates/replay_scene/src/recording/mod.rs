//! Recorded frame data
//!
//! Data model of the playback collaborator: frames hold entities, entities
//! hold typed properties, and a subset of property types describe renderable
//! shapes. The scene core only reads these values for the duration of a
//! binding pass.
//!
//! Recordings are stored as JSON:
//!
//! ```text
//! { "frames": [ { "frameId": 0, "elapsedTime": 0.0, "tag": "",
//!                 "entities": [ { "id": 1, "properties": [ ... ] } ] } ] }
//! ```

mod shapes;

pub use shapes::{ColorData, ShapeGeometry, ShapeKind, ShapeProperty, Vec3Data};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

use crate::foundation::math::Vec3;

/// Identifier of a recorded entity
pub type EntityId = u32;

/// Identifier of a recorded property (unique within a frame)
pub type PropertyId = u32;

/// Errors raised while loading recordings
#[derive(Error, Debug)]
pub enum RecordingError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single recorded property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property id
    pub id: PropertyId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Typed value
    #[serde(flatten)]
    pub value: PropertyValue,
}

/// Typed value of a property, tagged by `type` in the recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropertyValue {
    /// Nested properties
    Group {
        /// Child properties in recorded order
        value: Vec<Property>,
    },
    /// Scalar value
    Number {
        /// The scalar
        value: f32,
    },
    /// Text value
    String {
        /// The text
        value: String,
    },
    /// Boolean value
    Boolean {
        /// The flag
        value: bool,
    },
    /// Vector value
    Vec3 {
        /// The vector
        value: Vec3Data,
    },
    /// Sphere shape
    Sphere {
        /// Center
        position: Vec3Data,
        /// Radius
        radius: f32,
        /// Color
        color: ColorData,
        /// Visibility layer
        #[serde(default)]
        layer: String,
    },
    /// Capsule shape
    Capsule {
        /// Center
        position: Vec3Data,
        /// Long axis
        direction: Vec3Data,
        /// Radius of the caps
        radius: f32,
        /// Total height, caps included
        height: f32,
        /// Color
        color: ColorData,
        /// Visibility layer
        #[serde(default)]
        layer: String,
    },
    /// Axis-aligned box
    Aabb {
        /// Center
        position: Vec3Data,
        /// Full extents
        size: Vec3Data,
        /// Color
        color: ColorData,
        /// Visibility layer
        #[serde(default)]
        layer: String,
    },
    /// Oriented box
    Oobb {
        /// Center
        position: Vec3Data,
        /// Full extents
        size: Vec3Data,
        /// Local forward axis
        forward: Vec3Data,
        /// Local up axis
        up: Vec3Data,
        /// Color
        color: ColorData,
        /// Visibility layer
        #[serde(default)]
        layer: String,
    },
    /// Finite plane
    Plane {
        /// Center
        position: Vec3Data,
        /// Surface normal
        normal: Vec3Data,
        /// In-plane up vector
        up: Vec3Data,
        /// Width
        width: f32,
        /// Length
        length: f32,
        /// Color
        color: ColorData,
        /// Visibility layer
        #[serde(default)]
        layer: String,
    },
    /// Line segment
    Line {
        /// Start point
        origin: Vec3Data,
        /// End point
        destination: Vec3Data,
        /// Color
        color: ColorData,
        /// Visibility layer
        #[serde(default)]
        layer: String,
    },
}

impl Property {
    /// Create a property
    pub fn new(id: PropertyId, name: impl Into<String>, value: PropertyValue) -> Self {
        Self { id, name: name.into(), value }
    }

    /// The renderable shape carried by this property, if any
    pub fn shape(&self) -> Option<ShapeProperty<'_>> {
        ShapeProperty::from_value(&self.value)
    }
}

/// A recorded entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    /// Entity id
    pub id: EntityId,
    /// Properties in recorded order
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl Entity {
    /// Create an entity with no properties
    pub fn new(id: EntityId) -> Self {
        Self { id, properties: Vec::new() }
    }

    /// Append a property (builder style)
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// World position: the first `vec3` property named `position`, origin if absent
    pub fn position(&self) -> Vec3 {
        let mut position = None;
        visit_properties(self, |property| {
            if position.is_none() && property.name.eq_ignore_ascii_case("position") {
                if let PropertyValue::Vec3 { value } = &property.value {
                    position = Some(Vec3::from(*value));
                }
            }
        });
        position.unwrap_or_else(Vec3::zeros)
    }

    /// Display name: the first `string` property named `name`
    pub fn name(&self) -> String {
        let mut name = None;
        visit_properties(self, |property| {
            if name.is_none() && property.name.eq_ignore_ascii_case("name") {
                if let PropertyValue::String { value } = &property.value {
                    name = Some(value.clone());
                }
            }
        });
        name.unwrap_or_else(|| format!("Entity {}", self.id))
    }
}

/// Walk every property of `entity` depth-first, descending into groups
pub fn visit_properties<F>(entity: &Entity, mut visitor: F)
where
    F: FnMut(&Property),
{
    fn walk<F: FnMut(&Property)>(properties: &[Property], visitor: &mut F) {
        for property in properties {
            visitor(property);
            if let PropertyValue::Group { value } = &property.value {
                walk(value, visitor);
            }
        }
    }
    walk(&entity.properties, &mut visitor);
}

/// Entities of one recorded frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameData {
    /// Frame number assigned by the recorder
    pub frame_id: u32,
    /// Seconds since recording start
    pub elapsed_time: f32,
    /// Free-form tag
    pub tag: String,
    /// Entities keyed by id
    pub entities: BTreeMap<EntityId, Entity>,
}

impl FrameData {
    /// Add or replace an entity (builder style)
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.insert(entity.id, entity);
        self
    }
}

/// Frame as transmitted by the recorder, entities as a list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameMessage {
    /// Entities in transmission order
    pub entities: Vec<Entity>,
    /// Frame number
    pub frame_id: u32,
    /// Seconds since recording start
    pub elapsed_time: f32,
    /// Free-form tag
    pub tag: String,
}

impl From<FrameMessage> for FrameData {
    fn from(message: FrameMessage) -> Self {
        Self {
            frame_id: message.frame_id,
            elapsed_time: message.elapsed_time,
            tag: message.tag,
            entities: message.entities.into_iter().map(|entity| (entity.id, entity)).collect(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordingFile {
    #[serde(default)]
    frames: Vec<FrameMessage>,
}

/// Ordered list of recorded frames
#[derive(Debug, Clone, Default)]
pub struct Recording {
    frames: Vec<FrameData>,
}

impl Recording {
    /// Create an empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a recording from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, RecordingError> {
        let file: RecordingFile = serde_json::from_str(json)?;
        let frames = file.frames.into_iter().map(FrameData::from).collect::<Vec<_>>();
        log::info!("Loaded recording with {} frames", frames.len());
        Ok(Self { frames })
    }

    /// Load a recording from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordingError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Append a frame received from the recorder
    pub fn push_frame(&mut self, message: FrameMessage) {
        self.frames.push(message.into());
    }

    /// Frame by index
    pub fn frame(&self, index: usize) -> Option<&FrameData> {
        self.frames.get(index)
    }

    /// All frames in order
    pub fn frames(&self) -> &[FrameData] {
        &self.frames
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the recording has no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop every frame
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Every distinct shape layer present in the recording
    pub fn layers(&self) -> BTreeSet<String> {
        let mut layers = BTreeSet::new();
        for entity in self.frames.iter().flat_map(|frame| frame.entities.values()) {
            visit_properties(entity, |property| {
                if let Some(shape) = property.shape() {
                    layers.insert(shape.layer.to_string());
                }
            });
        }
        layers
    }
}
