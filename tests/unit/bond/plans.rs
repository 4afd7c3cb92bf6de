//! Tests for bond kinds, their names and generated plans

#[cfg(test)]
mod tests {
    use brickbond::BondError;
    use brickbond::bond::BondKind;
    use nalgebra::Vector3;
    use brickbond::geometry::BrickModule;
    use std::str::FromStr;

    fn module() -> BrickModule {
        BrickModule::uniform(2.0, 1.0, 0.5)
    }

    // Tests the names used in wall descriptions
    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&BondKind::Gothic).expect("Bond kind should serialize");
        assert_eq!(json, "\"GothicBond\"");

        let parsed: BondKind =
            serde_json::from_str("\"CrossBond\"").expect("Bond kind should deserialize");
        assert_eq!(parsed, BondKind::Cross);

        for kind in BondKind::ALL {
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(BondKind::from_str("stretchedbond").ok(), Some(BondKind::Stretched));
        assert_eq!(BondKind::from_str("BLOCKBOND").ok(), Some(BondKind::Block));

        let error = BondKind::from_str("FlemishBond");
        assert!(matches!(error, Err(BondError::InvalidParameter { parameter: "bond", .. })));
    }

    // Tests the vertical and horizontal repetition of each plan
    // Verified by dropping the shifted course of the cross bond
    #[test]
    fn test_plan_shapes() {
        let module = module();
        let courses = |kind: BondKind| kind.plan(&module).len();
        assert_eq!(courses(BondKind::Stretched), 2);
        assert_eq!(courses(BondKind::Head), 2);
        assert_eq!(courses(BondKind::Block), 2);
        assert_eq!(courses(BondKind::Cross), 4);
        assert_eq!(courses(BondKind::Gothic), 2);

        let gothic = BondKind::Gothic.plan(&module);
        assert!(gothic.iter().all(|course| course.len() == 3));
        let block = BondKind::Block.plan(&module);
        assert_eq!(block.first().map(Vec::len), Some(1));
        assert_eq!(block.get(1).map(Vec::len), Some(2));
    }

    #[test]
    fn test_thickness() {
        let module = module();
        assert_eq!(BondKind::Stretched.thickness(&module), 1.0);
        for kind in [BondKind::Head, BondKind::Cross, BondKind::Gothic, BondKind::Block] {
            assert_eq!(kind.thickness(&module), 2.0);
        }
    }

    // Tests the number of corner variants per bond
    // Verified by dropping the closer variants of the head bond
    #[test]
    fn test_every_bond_has_corner_variants() {
        let module = module();
        for kind in BondKind::ALL {
            let corner = kind.corner_plan(&module);
            let expected = match kind {
                BondKind::Head | BondKind::Gothic => 4,
                BondKind::Stretched | BondKind::Cross | BondKind::Block => 2,
            };
            assert_eq!(corner.len(), expected, "{kind}");
            assert!(corner.iter().all(|variant| !variant.is_empty()));
        }
    }

    // Tests that half-width corner courses use queen closers
    #[test]
    fn test_head_corner_closers() {
        let module = module();
        let plan = BondKind::Head.corner_plan(&module);
        let sizes: Vec<Vec<Vector3<f64>>> = plan
            .iter()
            .map(|variant| {
                variant
                    .iter()
                    .map(|template| template.evaluate(&Vector3::zeros(), &module).size)
                    .collect()
            })
            .collect();

        let closer = Vector3::new(2.0, 0.5, 0.5);
        let closers = |variant: usize| {
            sizes
                .get(variant)
                .map_or(0, |sizes| sizes.iter().filter(|&&size| size == closer).count())
        };
        assert_eq!(closers(0), 0);
        assert_eq!(closers(1), 2);
        assert_eq!(closers(2), 0);
        assert_eq!(closers(3), 2);
    }
}
