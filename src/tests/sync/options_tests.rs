    use super::*;
    use crate::model::Dashboard;

    fn targets(urls: &[&str]) -> ValidTargets {
        let dashboards: Vec<Dashboard> = urls.iter().map(|u| Dashboard::new(u)).collect();
        ValidTargets::from_dashboards(&dashboards)
    }

    #[test]
    fn overview_first_refresh_last_catalog_order_kept() {
        assert_eq!(
            build_options(&targets(&["energy", "map", "lovelace", "refresh", "energy"])),
            vec!["lovelace", "energy", "map", "refresh"]
        );
    }

    #[test]
    fn empty_catalog_still_offers_overview() {
        assert_eq!(
            build_options(&ValidTargets::default()),
            vec!["lovelace", "refresh"]
        );
    }
