use material_review_core::state_machine::{
    is_sme_required, ActionConfig, SmeFallback, SmeRequirementPolicy,
};

#[test]
fn test_default_fallback_requires_sme_for_any_action() {
    assert!(is_sme_required(Some("keep_no_change"), None));
    assert!(is_sme_required(Some("scrap"), None));
    assert!(!is_sme_required(None, None));
    assert!(!is_sme_required(Some(""), None));
}

#[test]
fn test_config_overrides_both_fallbacks() {
    let skip = ActionConfig::requiring_sme(false);
    let fallbacks = [
        SmeFallback::AlwaysRequired,
        SmeFallback::AllowList {
            actions: vec!["scrap".to_string()],
        },
    ];

    for fallback in fallbacks {
        let policy = SmeRequirementPolicy::new(fallback);
        assert!(!policy.is_sme_required(Some("scrap"), Some(&skip)));
    }
}

#[test]
fn test_config_without_flag_means_not_required() {
    let config: ActionConfig = serde_json::from_value(serde_json::json!({ "label": "Scrap" })).unwrap();
    assert!(!config.requires_sme);
    assert!(!is_sme_required(Some("scrap"), Some(&config)));
}
