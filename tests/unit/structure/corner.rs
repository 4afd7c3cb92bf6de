//! Tests for corner detection, junction classification and corner frames

#[cfg(test)]
mod tests {
    use brickbond::BondError;
    use brickbond::bond::{BondKind, Side};
    use brickbond::structure::corner::is_same_corner;
    use brickbond::geometry::BrickModule;
    use brickbond::structure::{
        CornId, Corns, GroupId, JunctionKind, LayerId, Structure, WallSpec,
    };
    use nalgebra::Point3;
    use std::collections::BTreeSet;
    use std::f64::consts::{FRAC_PI_2, PI};

    use crate::unit::{l_corner_walls, test_wall};

    fn layers(ids: &[usize]) -> BTreeSet<LayerId> {
        ids.iter().copied().map(LayerId).collect()
    }

    fn detect(walls: Vec<WallSpec>) -> (Structure, Corns) {
        let mut structure = Structure::from_walls(walls).expect("Walls should be valid");
        let corns = Corns::detect(&mut structure);
        (structure, corns)
    }

    // Tests one corner per tier and the connections it records
    #[test]
    fn test_l_corner_detection() {
        let (structure, corns) = detect(l_corner_walls(BondKind::Stretched));

        assert_eq!(corns.len(), 2);
        assert!(corns.junctions.is_empty());
        assert_eq!(corns.find(&layers(&[0, 2])), Some(CornId(0)));
        assert_eq!(corns.find(&layers(&[1, 3])), Some(CornId(1)));

        let corner = corns.get(CornId(0)).expect("Corner should exist");
        assert_eq!(corner.kind(), JunctionKind::Corner);
        assert_eq!(corner.tier, 0);
        assert!((corner.point - Point3::new(0.0, 0.0, 0.25)).norm() < 1e-6);
        assert_eq!(
            corner.wall_ids(&structure),
            [GroupId(0), GroupId(1)].into_iter().collect()
        );

        let first = structure.layer(LayerId(0)).expect("Layer should exist");
        assert!(first.left_connections.contains(&LayerId(2)));
        assert!(!first.is_connected(Side::Right));
        assert_eq!(
            corns.corner_at(&structure, LayerId(2), Side::Left),
            Some(CornId(0))
        );
        assert_eq!(corns.corner_at(&structure, LayerId(2), Side::Right), None);
        assert_eq!(structure.connected_groups(), vec![GroupId(0), GroupId(1)]);
    }

    #[test]
    fn test_vertical_neighbors_and_wall_pairs() {
        let (structure, corns) = detect(l_corner_walls(BondKind::Stretched));

        assert_eq!(corns.above(&structure, CornId(0)), Some(CornId(1)));
        assert_eq!(corns.below(&structure, CornId(1)), Some(CornId(0)));
        assert_eq!(corns.below(&structure, CornId(0)), None);
        assert_eq!(corns.above(&structure, CornId(1)), None);

        let pairs = corns.by_wall_pair(&structure);
        assert_eq!(pairs.len(), 1);
        assert_eq!(
            pairs.get(&(GroupId(0), GroupId(1))),
            Some(&vec![CornId(0), CornId(1)])
        );
    }

    // Tests that a course ending against another course's side is a T-joint
    #[test]
    fn test_t_joint() {
        let mut walls = l_corner_walls(BondKind::Stretched);
        walls.push(test_wall(FRAC_PI_2, [5.0, 5.5, 0.5], 10.0, BondKind::Stretched));
        let (structure, corns) = detect(walls);

        assert_eq!(corns.len(), 2);
        assert_eq!(corns.junctions.len(), 2);
        let junction = corns.junctions.first().expect("Junction should exist");
        assert_eq!(junction.kind, JunctionKind::TJoint);
        assert_eq!(junction.through, LayerId(0));
        assert_eq!(junction.other, LayerId(4));
        assert!((junction.point.x - 5.0).abs() < 1e-6);

        let stem = structure.layer(LayerId(4)).expect("Layer should exist");
        assert!(!stem.is_connected(Side::Left));
        assert!(!stem.is_connected(Side::Right));
    }

    #[test]
    fn test_crossing() {
        let mut walls = l_corner_walls(BondKind::Stretched);
        walls.push(test_wall(FRAC_PI_2, [5.0, 0.0, 0.5], 10.0, BondKind::Stretched));
        let (_, corns) = detect(walls);

        assert_eq!(corns.len(), 2);
        assert!(
            corns
                .junctions
                .iter()
                .all(|junction| junction.kind == JunctionKind::Crossing)
        );
        assert_eq!(corns.junctions.len(), 2);
    }

    // Tests that a third course ending at a corner makes it unsolvable
    // Verified by recording connections before merging corners
    #[test]
    fn test_three_courses_at_one_point() {
        let mut walls = l_corner_walls(BondKind::Stretched);
        walls.push(test_wall(PI, [-5.5, 0.0, 0.5], 10.0, BondKind::Stretched));
        let (structure, corns) = detect(walls);

        assert_eq!(corns.len(), 2);
        let corner = corns.get(CornId(0)).expect("Corner should exist");
        assert_eq!(corner.layers, layers(&[0, 2, 4]));
        assert_eq!(corner.kind(), JunctionKind::TJoint);
        assert!(!corner.is_solvable());
        assert!(corns.by_wall_pair(&structure).is_empty());
        assert!(structure.connected_groups().is_empty());
    }

    #[test]
    fn test_incompatible_walls_are_ignored() {
        let mut walls = l_corner_walls(BondKind::Stretched);
        if let Some(wall) = walls.get_mut(1) {
            wall.module = BrickModule::uniform(3.0, 1.0, 0.5);
        }
        let (_, corns) = detect(walls);
        assert!(corns.is_empty());
    }

    // Tests the frame anchored on the course that contains the corner point
    #[test]
    fn test_frame() {
        let (structure, mut corns) = detect(l_corner_walls(BondKind::Stretched));
        corns.freeze(&structure).expect("Corners should have frames");

        let corner = corns.get(CornId(0)).expect("Corner should exist");
        assert_eq!(corner.main_layer, Some(LayerId(0)));
        let frame = corner.frame.as_ref().expect("Frame should be pinned");
        assert!(!frame.mirrored);
        assert!(frame.yaw.abs() < 1e-9);
        assert_eq!(frame.legs.first().map(|leg| leg.layer), Some(LayerId(0)));

        let main = frame.leg(LayerId(0)).expect("Main leg should exist");
        assert_eq!(main.side, Side::Left);
        assert!((main.setback + 0.5).abs() < 1e-9);
        assert!(main.angle.abs() < 1e-9);

        let secondary = frame.leg(LayerId(2)).expect("Secondary leg should exist");
        assert_eq!(secondary.side, Side::Left);
        assert!((secondary.setback - 0.5).abs() < 1e-9);
        assert!((secondary.angle - FRAC_PI_2).abs() < 1e-9);
    }

    // Tests a secondary course on the frame's negative y side
    // Verified by not negating mirrored leg angles
    #[test]
    fn test_mirrored_frame() {
        let walls = vec![
            test_wall(0.0, [4.5, 0.0, 0.5], 10.0, BondKind::Stretched),
            test_wall(FRAC_PI_2, [0.0, -5.5, 0.5], 10.0, BondKind::Stretched),
        ];
        let (structure, mut corns) = detect(walls);
        corns.freeze(&structure).expect("Corners should have frames");

        let frame = corns
            .get(CornId(0))
            .and_then(|corner| corner.frame.as_ref())
            .expect("Frame should be pinned");
        assert!(frame.mirrored);
        let secondary = frame.leg(LayerId(2)).expect("Secondary leg should exist");
        assert_eq!(secondary.side, Side::Right);
        assert!((secondary.angle - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_freeze_rejects_detached_corner() {
        let (structure, _) = detect(l_corner_walls(BondKind::Stretched));
        let mut corns = Corns::new();
        corns.insert(Point3::new(50.0, 50.0, 0.25), 0, [LayerId(0), LayerId(2)]);

        let result = corns.freeze(&structure);
        assert!(matches!(
            result,
            Err(BondError::ModelingData { corner: CornId(0), .. })
        ));
    }

    #[test]
    fn test_insert_merges_coincident_points() {
        let mut corns = Corns::new();
        let a = corns.insert(Point3::new(1.0, 1.0, 0.0), 0, [LayerId(0), LayerId(1)]);
        let b = corns.insert(Point3::new(1.00005, 1.0, 0.0), 0, [LayerId(1), LayerId(2)]);
        let c = corns.insert(Point3::new(1.0, 1.0, 0.0), 1, [LayerId(3), LayerId(4)]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(corns.ids().count(), 2);
        assert_eq!(corns.get(a).map(|corner| corner.layers.len()), Some(3));
        assert!(is_same_corner(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(0.0, 0.0, 1e-5),
            1e-4
        ));
    }

    #[test]
    fn test_corner_plan_offset_assignment() {
        let (_, mut corns) = detect(l_corner_walls(BondKind::Stretched));
        let corner = corns.get_mut(CornId(1)).expect("Corner should exist");
        corner.set_plan_offset(CornId(1), 1).expect("First assignment should succeed");
        assert!(matches!(
            corner.set_plan_offset(CornId(1), 0),
            Err(BondError::DoubleAssignment { .. })
        ));

        corns.reset_assignments();
        assert!(corns.corners().iter().all(|corner| !corner.touched));
    }
}
