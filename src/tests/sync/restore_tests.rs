    use super::*;

    fn opts() -> Vec<String> {
        ["lovelace", "energy", "map", "refresh"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn sentinel_restores_saved_selection_when_still_offered() {
        assert_eq!(choose_restore(Some("refresh"), Some("map"), &opts()), "map");
    }

    #[test]
    fn sentinel_without_usable_history_falls_back_to_overview() {
        assert_eq!(choose_restore(Some("refresh"), None, &opts()), "lovelace");
        assert_eq!(
            choose_restore(Some("refresh"), Some("gone"), &opts()),
            "lovelace"
        );
    }

    #[test]
    fn offered_value_is_kept_over_history() {
        assert_eq!(choose_restore(Some("energy"), Some("map"), &opts()), "energy");
    }

    #[test]
    fn removed_value_uses_history_then_overview() {
        assert_eq!(choose_restore(Some("old"), Some("map"), &opts()), "map");
        assert_eq!(choose_restore(Some("old"), Some("old"), &opts()), "lovelace");
        assert_eq!(choose_restore(None, None, &opts()), "lovelace");
    }
