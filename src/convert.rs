//! This module turns the text of one OBJ document into a level document.

use rayon::prelude::*;

use crate::config::{BlockErrorPolicy, Config};
use crate::error::ConvertError;
use crate::geometry::OrientedBox;
use crate::level::LevelDocument;
use crate::obj::{parse_object_blocks, ObjectBlock};

pub fn convert_document(text: &str, config: &Config) -> Result<LevelDocument, ConvertError> {
    let blocks = parse_object_blocks(text)?;

    let results: Vec<Result<OrientedBox, ConvertError>> = blocks
        .par_iter()
        .filter_map(reconstruct_block)
        .collect();

    let mut boxes = Vec::with_capacity(results.len());
    for result in results {
        match (result, config.block_errors) {
            (Ok(obb), _) => boxes.push(obb),
            (Err(e), BlockErrorPolicy::Skip) => log::warn!("skipping {}", e),
            (Err(e), BlockErrorPolicy::Abort) => return Err(e),
        }
    }

    Ok(LevelDocument::from_oriented_boxes(
        &boxes,
        config.level_settings.clone(),
    ))
}

/// Objects that are not made of 8 vertices are not boxes and are left out.
fn reconstruct_block(block: &ObjectBlock) -> Option<Result<OrientedBox, ConvertError>> {
    let corners = match block.corners() {
        Some(corners) => corners,
        None => {
            log::debug!(
                "skipping object {:?} with {} vertices",
                block.object_name,
                block.vertices.len()
            );
            return None;
        }
    };
    Some(
        OrientedBox::from_corners(&block.material_name, corners).map_err(|source| {
            ConvertError::Geometry {
                object: block.object_name.clone(),
                source,
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::level::{Quat, Vec3};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    const CUBE: &str = "\
o Cube
usemtl Icy.002
v 1 1 1
v -1 1 1
v -1 -1 1
v 1 -1 1
v 1 1 -1
v -1 1 -1
v -1 -1 -1
v 1 -1 -1
";

    const SHEARED: &str = "\
o Sheared
usemtl Metal.004
v 0 0 0
v 1 0 0
v 0 0 1
v 1 0 1
v 0.5 1 0
v 1.5 1 0
v 0.5 1 1
v 1.5 1 1
";

    fn block(name: &str, material: &str, size: Vector3<f64>, offset: Vector3<f64>) -> String {
        let mut text = format!("o {}\nusemtl {}\n", name, material);
        for &sx in &[-0.5, 0.5] {
            for &sy in &[-0.5, 0.5] {
                for &sz in &[-0.5, 0.5] {
                    let p = Vector3::new(sx * size.x, sy * size.y, sz * size.z) + offset;
                    // The file has Z up.
                    text.push_str(&format!("v {} {} {}\n", p.x, p.z, p.y));
                }
            }
        }
        text
    }

    #[test]
    fn sample_cube() {
        let blocks = parse_object_blocks(CUBE).unwrap();
        let corners = blocks[0].corners().unwrap();
        let obb = OrientedBox::from_corners(&blocks[0].material_name, corners).unwrap();

        assert_eq!(obb.type_name, "Icy");
        assert_relative_eq!(obb.center, Vector3::zeros(), epsilon = 1e-12);
        assert_relative_eq!(obb.size, Vector3::new(2.0, 2.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(obb.rotation.into_inner().norm(), 1.0, epsilon = 1e-12);
        // The first corner's frame is a symmetry of the cube rather than the
        // identity, so compare the placed corners instead.
        for placed in obb.corners() {
            assert!(corners.iter().any(|c| (c - placed).norm() < 1e-9));
        }
    }

    #[test]
    fn document_from_mixed_objects() {
        let text = [
            block("Floor", "Metal.001", Vector3::new(10.0, 1.0, 10.0), Vector3::new(0.0, -0.5, 0.0)),
            "o Triangle\nusemtl Glass\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n".to_string(),
            block("Prop", "Foo", Vector3::new(1.0, 1.0, 1.0), Vector3::zeros()),
            block("Goal", "Finishline.002", Vector3::new(3.0, 3.0, 3.0), Vector3::new(4.0, 1.0, -2.0)),
            block("Rig", "[CameraRig]", Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 2.0, 0.0)),
        ]
        .concat();

        let doc = convert_document(&text, &Config::default()).unwrap();

        let types: Vec<&str> = doc.entries.iter().map(|e| e.type_name.as_str()).collect();
        assert_eq!(types, ["Metal", "Finishline", "[CameraRig]"]);

        let floor = &doc.entries[0];
        assert_relative_eq!(floor.position.y, -0.5, epsilon = 1e-12);
        let mut size = [floor.size.x, floor.size.y, floor.size.z];
        size.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(size, [1.0, 10.0, 10.0]);

        let goal = &doc.entries[1];
        assert_eq!(goal.size, Vec3::new(0.5, 1.0, 0.5));
        assert_eq!(goal.position, Vec3::new(4.0, 1.0, -2.0));
        assert_eq!(goal.rotation, Quat::identity());

        assert_eq!(doc.entries[2].size, Vec3::new(1.0, 1.0, 1.0));
        assert!(doc.moving.is_empty());
        assert!(doc.signs.is_empty());
        assert_eq!(doc.settings, Config::default().level_settings);
    }

    #[test]
    fn geometry_error_aborts_by_default() {
        let text = format!("{}{}", CUBE, SHEARED);
        match convert_document(&text, &Config::default()) {
            Err(ConvertError::Geometry { object, source }) => {
                assert_eq!(object, "Sheared");
                assert_eq!(
                    source,
                    GeometryError::PerpendicularCount {
                        found: 1,
                        material: "Metal.004".to_string()
                    }
                );
            }
            other => panic!("expected a geometry error, got {:?}", other),
        }
    }

    #[test]
    fn geometry_error_can_be_skipped() {
        let config = Config {
            block_errors: BlockErrorPolicy::Skip,
            ..Config::default()
        };
        let text = format!("{}{}", SHEARED, CUBE);
        let doc = convert_document(&text, &config).unwrap();
        assert_eq!(doc.entries.len(), 1);
        assert_eq!(doc.entries[0].type_name, "Icy");
    }

    #[test]
    fn parse_error_aborts_regardless_of_policy() {
        let config = Config {
            block_errors: BlockErrorPolicy::Skip,
            ..Config::default()
        };
        let text = format!("{}o Broken\nv 1 2\n", CUBE);
        assert!(matches!(
            convert_document(&text, &config),
            Err(ConvertError::Parse(_))
        ));
    }

    #[test]
    fn empty_input() {
        let doc = convert_document("", &Config::default()).unwrap();
        assert!(doc.entries.is_empty());
        assert!(doc.to_json().unwrap().starts_with(r#"{"LevelArray":[],"MovingArray":[],"#));
    }
}
