//! Tests for reading wall descriptions from JSON

#[cfg(test)]
mod tests {
    use brickbond::BondError;
    use brickbond::bond::BondKind;
    use brickbond::io::input::{
        RotationDescription, StructureDescription, WallDescription, load_description, load_walls,
    };
    use std::f64::consts::FRAC_PI_2;
    use std::fs;
    use tempfile::TempDir;

    const L_CORNER: &str = r#"{
        "walls": [
            {
                "id": "outer",
                "rotation": { "quaternion": [0.0, 0.0, 0.0, 1.0] },
                "translation": [4.5, 0.0, 0.5],
                "length": 10.0,
                "width": 1.0,
                "height": 1.0,
                "module": { "length": 2.0, "width": 1.0, "height": 0.5 },
                "bond": "StretchedBond"
            },
            {
                "id": "side",
                "rotation": { "matrix": [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]] },
                "translation": [0.0, 5.5, 0.5],
                "length": 10.0,
                "width": 1.0,
                "height": 1.0,
                "module": { "length": 2.0, "width": 1.0, "height": 0.5, "grid": [1.0, 0.5, 0.5] },
                "bond": "StretchedBond",
                "openings": [
                    {
                        "translation": [0.0, 0.0, -0.25],
                        "length": 2.0,
                        "width": 1.0,
                        "height": 0.5,
                        "lintel": { "length": 3.0, "width": 1.0, "height": 0.5 }
                    }
                ],
                "reversed": true
            }
        ]
    }"#;

    fn parse() -> StructureDescription {
        serde_json::from_str(L_CORNER).unwrap()
    }

    // Tests both rotation forms and the optional fields
    #[test]
    fn test_parse_description() {
        let description = parse();
        assert_eq!(description.walls.len(), 2);

        let outer = &description.walls[0];
        assert_eq!(outer.id, "outer");
        assert_eq!(outer.bond, BondKind::Stretched);
        assert!(outer.openings.is_empty());
        assert!(!outer.reversed);
        assert!(matches!(outer.rotation, RotationDescription::Quaternion { .. }));

        let side = &description.walls[1];
        assert!(matches!(side.rotation, RotationDescription::Matrix { .. }));
        assert_eq!(side.module.grid, Some([1.0, 0.5, 0.5]));
        assert!(side.openings[0].lintel.is_some());
        assert!(side.reversed);
    }

    // Tests conversion of the matrix form into the same rotation as a yaw
    // Verified by reading the matrix column-major
    #[test]
    fn test_matrix_rotation() {
        let description = parse();
        let rotation = description.walls[1].rotation.to_unit_quaternion().unwrap();
        let (_, _, yaw) = rotation.euler_angles();
        assert!((yaw - FRAC_PI_2).abs() < 1e-9);

        let identity = RotationDescription::default().to_unit_quaternion().unwrap();
        assert!(identity.angle() < 1e-12);
    }

    #[test]
    fn test_invalid_rotations() {
        let zero = RotationDescription::Quaternion {
            quaternion: [0.0; 4],
        };
        assert!(matches!(
            zero.to_unit_quaternion(),
            Err(BondError::InvalidParameter { parameter: "rotation", .. })
        ));

        let scaled = RotationDescription::Matrix {
            matrix: [[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        };
        assert!(scaled.to_unit_quaternion().is_err());

        let reflection = RotationDescription::Matrix {
            matrix: [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        };
        assert!(reflection.to_unit_quaternion().is_err());
    }

    #[test]
    fn test_to_spec() {
        let description = parse();
        let specs = description.to_specs().unwrap();
        assert_eq!(specs.len(), 2);

        let side = &specs[1];
        assert_eq!(side.name, "side");
        assert_eq!(side.openings.len(), 1);
        assert!(side.openings[0].lintel.is_some());
        assert_eq!(side.module.grid(), [1.0, 0.5, 0.5]);
        assert!(side.reversed);
    }

    #[test]
    fn test_invalid_wall_rejected() {
        let mut wall: WallDescription = parse().walls.remove(0);
        wall.width = -1.0;
        assert!(matches!(
            wall.to_spec(),
            Err(BondError::InvalidParameter { parameter: "width", .. })
        ));
    }

    #[test]
    fn test_unknown_bond_rejected() {
        let text = L_CORNER.replacen("StretchedBond", "FlemishBond", 1);
        assert!(serde_json::from_str::<StructureDescription>(&text).is_err());
    }

    // Tests reading from disk and the errors for missing or malformed files
    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("house.json");
        fs::write(&path, L_CORNER).unwrap();

        assert_eq!(load_description(&path).unwrap(), parse());
        assert_eq!(load_walls(&path).unwrap().len(), 2);

        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            load_walls(&missing),
            Err(BondError::FileSystem { operation: "read", .. })
        ));

        let broken = temp_dir.path().join("broken.json");
        fs::write(&broken, "{ \"walls\": [ {").unwrap();
        assert!(matches!(
            load_walls(&broken),
            Err(BondError::Serialization { .. })
        ));
    }
}
