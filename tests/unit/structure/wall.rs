//! Tests for wall layering, trimming and wall merging

#[cfg(test)]
mod tests {
    use brickbond::BondError;
    use brickbond::bond::{BondKind, Side};
    use brickbond::structure::{GroupId, LayerId, Opening, Structure, combine_walls};
    use nalgebra::Vector3;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use crate::unit::test_wall;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_validate() {
        let mut wall = test_wall(0.0, [0.0, 0.0, 0.5], 10.0, BondKind::Stretched);
        assert!(wall.validate().is_ok());

        wall.length = 0.0;
        assert!(matches!(
            wall.validate(),
            Err(BondError::InvalidParameter { parameter: "length", .. })
        ));

        wall.length = 10.0;
        wall.height = f64::NAN;
        assert!(Structure::from_walls([wall]).is_err());
    }

    #[test]
    fn test_endpoints() {
        let wall = test_wall(FRAC_PI_2, [0.0, 5.5, 0.5], 10.0, BondKind::Stretched);
        let (start, end) = wall.endpoints();
        assert!(close(start.x, 0.0) && close(start.y, 0.5));
        assert!(close(end.x, 0.0) && close(end.y, 10.5));
        assert!(close(wall.axis().y, 1.0));
    }

    // Tests course stacking, tiers and the shared bond table
    #[test]
    fn test_layering() {
        let low = test_wall(0.0, [0.0, 0.0, 0.5], 10.0, BondKind::Stretched);
        let high = test_wall(FRAC_PI_2, [20.0, 0.0, 1.0], 6.0, BondKind::Stretched);
        let structure = Structure::from_walls([low, high]).expect("Walls should be valid");

        assert_eq!(structure.groups().len(), 2);
        assert_eq!(structure.layers().len(), 4);
        assert_eq!(structure.bonds().len(), 1);

        let tiers: Vec<usize> = structure.layers().iter().map(|l| l.tier).collect();
        assert_eq!(tiers, vec![0, 1, 1, 2]);

        let group = structure.group(GroupId(1)).expect("Second wall should exist");
        assert_eq!(group.layers, vec![LayerId(2), LayerId(3)]);
        let top = structure.layer(LayerId(3)).expect("Top course should exist");
        assert_eq!(top.course, 1);
        assert_eq!(top.translation.z, 0.25);
        assert!(close(structure.layer_center(top).z, 1.25));
    }

    #[test]
    fn test_distinct_bonds() {
        let a = test_wall(0.0, [0.0, 0.0, 0.5], 10.0, BondKind::Stretched);
        let b = test_wall(0.0, [0.0, 5.0, 0.5], 10.0, BondKind::Head);
        let structure = Structure::from_walls([a, b]).expect("Walls should be valid");
        assert_eq!(structure.bonds().len(), 2);
        assert_eq!(
            structure.bond_of_layer(LayerId(2)).map(|bond| bond.kind()),
            Some(BondKind::Head)
        );
    }

    // Tests that trims shift the layer center and restore exactly
    // Verified by shifting the center the wrong way on right trims
    #[test]
    fn test_reduce_and_restore() {
        let wall = test_wall(0.0, [0.0, 0.0, 0.5], 10.0, BondKind::Stretched);
        let mut structure = Structure::from_walls([wall]).expect("Wall should be valid");
        let layer = structure.layer_mut(LayerId(0)).expect("Layer should exist");

        layer.reduce_length(1.5, Side::Left).expect("Trim should fit");
        layer.reduce_length(0.5, Side::Right).expect("Trim should fit");
        assert_eq!(layer.length, 8.0);
        assert_eq!(layer.start_x(), -3.5);
        assert_eq!(layer.end_x(), 4.5);
        assert_eq!(layer.trim(Side::Left), 1.5);
        assert_eq!(layer.untrimmed_span(), (-5.0, 5.0));

        layer.reduce_length(-2.0, Side::Left).expect("Negative trims are ignored");
        assert_eq!(layer.length, 8.0);

        let too_long = layer.reduce_length(8.0, Side::Right);
        assert!(matches!(too_long, Err(BondError::InvalidLength { .. })));

        assert!(structure.is_trimmed());
        structure.restore_trims();
        assert!(!structure.is_trimmed());
        let layer = structure.layer(LayerId(0)).expect("Layer should exist");
        assert_eq!(layer.length, 10.0);
        assert_eq!(layer.translation.x, 0.0);
    }

    #[test]
    fn test_cover_and_restore() {
        let wall = test_wall(0.0, [0.0, 0.0, 0.5], 2.0, BondKind::Stretched);
        let mut structure = Structure::from_walls([wall]).expect("Wall should be valid");
        let layer = structure.layer_mut(LayerId(0)).expect("Layer should exist");
        assert!(!layer.is_covered());

        layer.cover();
        assert!(layer.is_covered());
        assert_eq!(layer.length, 2.0);
        assert!(structure.is_trimmed());

        structure.restore_trims();
        assert!(!structure.is_trimmed());
        let layer = structure.layer(LayerId(0)).expect("Layer should exist");
        assert!(!layer.is_covered());
    }

    #[test]
    fn test_connect_moves_between_ends() {
        let wall = test_wall(0.0, [0.0, 0.0, 0.5], 10.0, BondKind::Stretched);
        let mut structure = Structure::from_walls([wall]).expect("Wall should be valid");
        let layer = structure.layer_mut(LayerId(0)).expect("Layer should exist");

        layer.connect(Side::Left, LayerId(7));
        assert!(layer.is_connected(Side::Left));
        layer.connect(Side::Right, LayerId(7));
        assert!(!layer.is_connected(Side::Left));
        assert!(layer.connections(Side::Right).contains(&LayerId(7)));
    }

    // Tests the bond origin for forward and reversed walls
    #[test]
    fn test_x_offset() {
        let mut wall = test_wall(0.0, [0.0, 0.0, 0.5], 10.0, BondKind::Stretched);
        wall.openings
            .push(Opening::new(Vector3::new(1.0, 0.0, -0.25), 2.0, 1.0, 0.5));
        let forward = Structure::from_walls([wall.clone()]).expect("Wall should be valid");
        wall.reversed = true;
        let reversed = Structure::from_walls([wall]).expect("Wall should be valid");

        let offsets = |structure: &Structure| -> Vec<f64> {
            let group = structure.group(GroupId(0)).expect("Wall should exist");
            structure
                .layers()
                .iter()
                .map(|layer| group.x_offset(layer))
                .collect()
        };
        assert_eq!(offsets(&forward), vec![0.0, 7.0, 0.0]);
        assert_eq!(offsets(&reversed), vec![5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_plan_offset_assignment() {
        let wall = test_wall(0.0, [0.0, 0.0, 0.5], 10.0, BondKind::Stretched);
        let mut structure = Structure::from_walls([wall]).expect("Wall should be valid");
        let top = structure.layer(LayerId(1)).cloned().expect("Layer should exist");
        let group = structure.group_mut(GroupId(0)).expect("Wall should exist");

        group.set_plan_offset(1).expect("First assignment should succeed");
        assert_eq!(group.plan_course(&top), 2);
        assert!(matches!(
            group.set_plan_offset(0),
            Err(BondError::DoubleAssignment { .. })
        ));

        structure.reset_assignments();
        let group = structure.group(GroupId(0)).expect("Wall should exist");
        assert!(!group.touched);
        assert_eq!(group.plan_offset, 0);
    }

    #[test]
    fn test_walls_compatible() {
        let walls = [
            test_wall(0.0, [0.0, 0.0, 0.5], 10.0, BondKind::Stretched),
            test_wall(FRAC_PI_2, [0.0, 5.0, 0.5], 10.0, BondKind::Head),
            test_wall(FRAC_PI_4, [9.0, 9.0, 0.5], 10.0, BondKind::Stretched),
        ];
        let structure = Structure::from_walls(walls).expect("Walls should be valid");
        assert!(structure.walls_compatible(GroupId(0), GroupId(1)));
        assert!(!structure.walls_compatible(GroupId(0), GroupId(2)));
        assert!(!structure.walls_compatible(GroupId(0), GroupId(9)));
    }

    // Tests merging of collinear neighbors and their openings
    // Verified by skipping the opening shift
    #[test]
    fn test_combine_walls() {
        let mut first = test_wall(0.0, [2.5, 0.0, 0.5], 5.0, BondKind::Stretched);
        first
            .openings
            .push(Opening::new(Vector3::new(0.0, 0.0, -0.25), 1.0, 1.0, 0.5));
        let second = test_wall(0.0, [7.5, 0.0, 0.5], 5.0, BondKind::Stretched);
        let apart = test_wall(0.0, [20.0, 0.0, 0.5], 5.0, BondKind::Stretched);

        let combined = combine_walls(vec![second, apart, first]);
        assert_eq!(combined.len(), 2);
        let merged = combined
            .iter()
            .find(|wall| close(wall.length, 10.0))
            .expect("Adjacent walls should merge");
        assert!(close(merged.translation.x, 5.0));
        assert_eq!(merged.openings.len(), 1);
        assert!(merged.openings.iter().all(|o| close(o.translation.x, -2.5)));

        let other_bond = test_wall(0.0, [7.5, 0.0, 0.5], 5.0, BondKind::Head);
        let first = test_wall(0.0, [2.5, 0.0, 0.5], 5.0, BondKind::Stretched);
        assert_eq!(combine_walls(vec![first, other_bond]).len(), 2);
    }
}
