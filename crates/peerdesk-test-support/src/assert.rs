//! Leaf-level assertions over configuration snapshots.

use peerdesk_config::{ConfigField, DesktopConfig};

/// Leaves whose value differs between `before` and `after`, in table order.
#[must_use]
pub fn changed_leaves(before: &DesktopConfig, after: &DesktopConfig) -> Vec<ConfigField> {
    ConfigField::ALL
        .into_iter()
        .filter(|field| field.differs(before, after))
        .collect()
}

/// Assert that exactly the leaves in `expected` differ between the snapshots.
///
/// # Panics
///
/// Panics with the list of differing leaves when it does not match `expected`.
#[track_caller]
pub fn assert_only_changed(
    before: &DesktopConfig,
    after: &DesktopConfig,
    expected: &[ConfigField],
) {
    let mut expected = expected.to_vec();
    expected.sort_by_key(|field| table_index(*field));
    let actual = changed_leaves(before, after);
    assert!(
        actual == expected,
        "changed leaves {:?}, expected {:?}",
        paths(&actual),
        paths(&expected)
    );
}

fn table_index(field: ConfigField) -> usize {
    ConfigField::ALL
        .iter()
        .position(|candidate| *candidate == field)
        .unwrap_or(usize::MAX)
}

fn paths(fields: &[ConfigField]) -> Vec<&'static str> {
    fields.iter().map(|field| field.path()).collect()
}
