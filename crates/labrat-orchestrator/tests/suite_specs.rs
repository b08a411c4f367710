//! The repository's own spec tree must stay runnable: every spec file
//! parses, names a registered journey, and lands in the expected order.

use labrat_orchestrator::{compute_order, JourneyRegistry, OrderConfig, SpecFile};
use std::path::Path;

fn repo_spec_root() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../specs"))
}

#[test]
fn repo_specs_follow_the_documented_order() {
    let order = compute_order(repo_spec_root(), &OrderConfig::default());
    assert_eq!(
        order,
        vec![
            "login.spec.yaml",
            "home.spec.yaml",
            "admin/organization-management.spec.yaml",
            "admin/provider-management.spec.yaml",
            "admin/menu-config.spec.yaml",
            "admin/user-management.spec.yaml",
            "reports/routine-report.spec.yaml",
            "validation.spec.yaml",
        ]
    );
}

#[test]
fn repo_specs_parse_and_bind_to_builtin_journeys() {
    let registry = JourneyRegistry::builtin();
    let order = compute_order(repo_spec_root(), &OrderConfig::default());
    assert!(!order.is_empty());

    for rel in order {
        let spec = SpecFile::from_file(&repo_spec_root().join(&rel))
            .unwrap_or_else(|e| panic!("{} failed to parse: {}", rel, e));
        registry
            .get(&spec.journey)
            .unwrap_or_else(|e| panic!("{} names an unregistered journey: {}", rel, e));
    }
}

#[test]
fn smoke_tag_covers_the_critical_path() {
    let order = compute_order(repo_spec_root(), &OrderConfig::default());
    let smoke: Vec<String> = order
        .into_iter()
        .filter(|rel| {
            SpecFile::from_file(&repo_spec_root().join(rel))
                .map(|s| s.has_tag("smoke"))
                .unwrap_or(false)
        })
        .collect();
    assert_eq!(smoke, vec!["login.spec.yaml", "home.spec.yaml"]);
}
