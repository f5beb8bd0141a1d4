//! This module maps reconstructed boxes onto entries of a custom level
//! document.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::geometry::OrientedBox;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<Vector3<f64>> for Vec3 {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// A rotation as the level format writes it, with `w` last.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl From<UnitQuaternion<f64>> for Quat {
    fn from(q: UnitQuaternion<f64>) -> Self {
        Self {
            x: q.i,
            y: q.j,
            z: q.k,
            w: q.w,
        }
    }
}

/// How an entry's placement is derived from its box.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Placement {
    /// Size, position and rotation all come from the box.
    Geometry,
    /// Only the position comes from the box.
    Fixed { size: Vec3 },
}

fn placement(type_name: &str) -> Option<Placement> {
    match type_name {
        "Icy" | "Metal" | "Glass" | "Grabbable" | "Spikes" | "Jumpy" | "GravityField" => {
            Some(Placement::Geometry)
        }
        "[CameraRig]" => Some(Placement::Fixed {
            size: Vec3::new(1.0, 1.0, 1.0),
        }),
        "Finishline" => Some(Placement::Fixed {
            size: Vec3::new(0.5, 1.0, 0.5),
        }),
        _ => None,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct LevelEntry {
    #[serde(rename = "Type")]
    pub type_name: String,
    pub size: Vec3,
    pub position: Vec3,
    pub rotation: Quat,
    pub lock_x: bool,
    pub lock_y: bool,
    pub lock_z: bool,
}

impl LevelEntry {
    /// Build the entry for a box, or `None` if its type is not a level
    /// object.
    pub fn from_oriented_box(obb: &OrientedBox) -> Option<Self> {
        let (size, rotation) = match placement(&obb.type_name)? {
            Placement::Geometry => (obb.size.into(), obb.rotation.into()),
            Placement::Fixed { size } => (size, Quat::identity()),
        };
        Some(Self {
            type_name: obb.type_name.clone(),
            size,
            position: obb.center.into(),
            rotation,
            lock_x: false,
            lock_y: false,
            lock_z: false,
        })
    }
}

/// The sign the level opens with. It is not derived from the mesh.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct LevelSettings {
    #[serde(rename = "Type")]
    pub type_name: String,
    pub size: Vec3,
    pub position: Vec3,
    pub rotation: Quat,
    pub lock_x: bool,
    pub lock_y: bool,
    pub lock_z: bool,
    pub checkpoints: u32,
    pub gamemode: u32,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            type_name: "LevelSign".to_string(),
            size: Vec3::new(1.0, 0.949999988079071, 1.0),
            position: Vec3::new(0.05000000074505806, 0.6000000238418579, -0.6000000238418579),
            rotation: Quat::identity(),
            lock_x: false,
            lock_y: false,
            lock_z: false,
            checkpoints: 4,
            gamemode: 0,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LevelDocument {
    #[serde(rename = "LevelArray")]
    pub entries: Vec<LevelEntry>,
    #[serde(rename = "MovingArray")]
    pub moving: Vec<serde_json::Value>,
    #[serde(rename = "LevelSettings")]
    pub settings: LevelSettings,
    #[serde(rename = "SignsArray")]
    pub signs: Vec<serde_json::Value>,
}

impl LevelDocument {
    pub fn from_oriented_boxes<'a, I>(boxes: I, settings: LevelSettings) -> Self
    where
        I: IntoIterator<Item = &'a OrientedBox>,
    {
        let entries = boxes
            .into_iter()
            .filter_map(|obb| {
                let entry = LevelEntry::from_oriented_box(obb);
                if entry.is_none() {
                    log::debug!("dropping box of unknown type {:?}", obb.type_name);
                }
                entry
            })
            .collect();
        Self {
            entries,
            moving: Vec::new(),
            settings,
            signs: Vec::new(),
        }
    }

    /// The document as compact JSON, the form the game loads.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
