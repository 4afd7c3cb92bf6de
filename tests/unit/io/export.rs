//! Tests for brick export records and JSON output

#[cfg(test)]
mod tests {
    use brickbond::bond::BrickKind;
    use brickbond::io::export::{BrickExport, BrickRecord};
    use brickbond::placement::{BrickPlacement, find_neighbors};
    use brickbond::structure::{CornId, GroupId};
    use nalgebra::{Point3, UnitQuaternion, Vector3};
    use std::f64::consts::FRAC_PI_2;
    use std::fs;
    use tempfile::TempDir;

    fn placements() -> Vec<BrickPlacement> {
        let brick = |id: usize, x: f64, wall: Option<GroupId>, corner: Option<CornId>| {
            BrickPlacement {
                id,
                kind: if corner.is_some() {
                    BrickKind::Corner
                } else {
                    BrickKind::Whole
                },
                wall,
                corner,
                size: Vector3::new(2.0, 1.0, 0.5),
                position: Point3::new(x, 0.0, 0.25),
                rotation: UnitQuaternion::identity(),
            }
        };
        vec![
            brick(0, 0.0, Some(GroupId(3)), None),
            brick(1, 2.0, None, Some(CornId(0))),
        ]
    }

    #[test]
    fn test_record_fields() {
        let mut placement = placements().remove(0);
        placement.rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let record = BrickRecord::new(&placement, None);

        assert_eq!(record.id, 0);
        assert_eq!(record.kind, "whole");
        assert_eq!(record.wall, Some(3));
        assert_eq!(record.shape, [2.0, 1.0, 0.5]);
        assert_eq!(record.position, [0.0, 0.0, 0.25]);
        assert_eq!(record.rotation[0], 0.0);
        assert_eq!(record.rotation[2], 0.707107);
        assert_eq!(record.rotation[3], 0.707107);
        assert!(record.neighbors.is_empty());
        assert!(record.depends_on.is_empty());
    }

    // Tests that neighbor lists are keyed by side name
    #[test]
    fn test_export_with_neighbors() {
        let placements = placements();
        let neighbors = find_neighbors(&placements);
        let export = BrickExport::new(0.5, &placements, Some(&neighbors));

        assert_eq!(export.score, 0.5);
        assert_eq!(export.bricks.len(), 2);
        let first = &export.bricks[0];
        assert_eq!(first.neighbors.get("RIGHT"), Some(&vec![1]));
        assert_eq!(first.neighbors.len(), 1);
        let corner = &export.bricks[1];
        assert_eq!(corner.kind, "corner");
        assert_eq!(corner.wall, None);
        assert_eq!(corner.neighbors.get("LEFT"), Some(&vec![0]));
    }

    // Tests the written document and omission of empty optional fields
    #[test]
    fn test_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("house_bricks.json");
        let export = BrickExport::new(0.0, &placements(), None);
        export.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let bricks = value["bricks"].as_array().unwrap();
        assert_eq!(bricks.len(), 2);
        assert!(bricks[1].get("wall").is_none());
        assert!(bricks[1].get("neighbors").is_none());
        assert_eq!(bricks[0]["wall"], 3);

        let read_back: BrickExport = serde_json::from_str(&text).unwrap();
        assert_eq!(read_back, export);
    }

    #[test]
    fn test_save_to_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("out.json");
        let export = BrickExport::new(0.0, &[], None);
        assert!(export.save(&path).is_err());
    }
}
