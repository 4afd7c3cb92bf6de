//! Tests for face adjacency and laying order between placed bricks

#[cfg(test)]
mod tests {
    use brickbond::bond::{BondKind, BrickKind};
    use brickbond::placement::{Aabb, BrickPlacement, BrickPlacer, Direction, find_neighbors};
    use brickbond::structure::{Corns, Structure};
    use nalgebra::{Point3, UnitQuaternion, Vector3};
    use std::f64::consts::FRAC_PI_2;

    use crate::unit::test_wall;

    fn brick(id: usize, position: [f64; 3], yaw: f64) -> BrickPlacement {
        BrickPlacement {
            id,
            kind: BrickKind::Whole,
            wall: None,
            corner: None,
            size: Vector3::new(2.0, 1.0, 0.5),
            position: Point3::from(position),
            rotation: UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw),
        }
    }

    #[test]
    fn test_direction_names() {
        let names: Vec<&str> = Direction::ALL.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["TOP", "BOTTOM", "LEFT", "RIGHT", "FRONT", "BACK"]);
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    // Tests bounds of a quarter-turned brick
    #[test]
    fn test_rotated_bounds() {
        let aabb = Aabb::of(&brick(0, [0.0, 0.0, 0.0], FRAC_PI_2));
        assert!((aabb.min.x + 0.5).abs() < 1e-9);
        assert!((aabb.max.y - 1.0).abs() < 1e-9);
        assert!((aabb.max.z - 0.25).abs() < 1e-9);
    }

    // Tests face contact on each axis and rejection of edge-only contact
    // Verified by allowing zero-length overlaps
    #[test]
    fn test_touching() {
        let base = Aabb::of(&brick(0, [0.0, 0.0, 0.0], 0.0));
        let right = Aabb::of(&brick(1, [2.0, 0.0, 0.0], 0.0));
        let behind = Aabb::of(&brick(2, [0.0, 1.0, 0.0], 0.0));
        let above = Aabb::of(&brick(3, [1.0, 0.0, 0.5], 0.0));
        let diagonal = Aabb::of(&brick(4, [2.0, 1.0, 0.0], 0.0));
        let apart = Aabb::of(&brick(5, [2.5, 0.0, 0.0], 0.0));

        assert_eq!(base.touching(&right), Some(Direction::Right));
        assert_eq!(right.touching(&base), Some(Direction::Left));
        assert_eq!(base.touching(&behind), Some(Direction::Back));
        assert_eq!(behind.touching(&base), Some(Direction::Front));
        assert_eq!(base.touching(&above), Some(Direction::Top));
        assert_eq!(base.touching(&diagonal), None);
        assert_eq!(base.touching(&apart), None);
    }

    #[test]
    fn test_find_neighbors() {
        let bricks = vec![
            brick(0, [0.0, 0.0, 0.0], 0.0),
            brick(1, [2.0, 0.0, 0.0], 0.0),
            brick(2, [1.0, 0.0, 0.5], 0.0),
        ];
        let neighbors = find_neighbors(&bricks);
        assert_eq!(neighbors.len(), 3);

        let first = neighbors.first().expect("First brick should have neighbor lists");
        let top = neighbors.get(2).expect("Top brick should have neighbor lists");
        assert_eq!(first.on(Direction::Right), &[1]);
        assert_eq!(first.on(Direction::Top), &[2]);
        assert!(first.depends_on.is_empty());
        assert_eq!(top.on(Direction::Bottom), &[0, 1]);
        assert_eq!(top.depends_on, vec![0, 1]);
        assert!(top.on(Direction::Left).is_empty());
    }

    // Tests laying dependencies across the courses of a running bond
    #[test]
    fn test_running_bond_dependencies() {
        let wall = test_wall(0.0, [0.0, 0.0, 0.5], 10.0, BondKind::Stretched);
        let mut structure = Structure::from_walls([wall]).expect("Wall should be valid");
        let corns = Corns::detect(&mut structure);
        let placements = BrickPlacer::default().place(&structure, &corns);
        let neighbors = find_neighbors(&placements);

        let lists = |id: usize| neighbors.get(id).expect("Brick should have neighbor lists");
        assert_eq!(lists(0).on(Direction::Right), &[1]);
        assert_eq!(lists(0).on(Direction::Top), &[5, 9]);
        assert_eq!(lists(5).depends_on, vec![0, 1]);
        assert_eq!(lists(9).depends_on, vec![0]);
        assert_eq!(lists(9).on(Direction::Right), &[5]);
        assert!(lists(4).on(Direction::Right).is_empty());
    }
}
