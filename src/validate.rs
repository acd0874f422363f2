//! Validation of a machine against an expected snapshot.
//!
//! Validation is one-sided: only what the expected snapshot lists is checked.
//! Software installed on top of it is never reported.

use crate::compose::Composer;
use crate::diff::Entry;
use crate::model::{Inventory, Snapshot};
use crate::probe::ScanContext;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// An expected entry whose installed version differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub key: String,
    pub expected: String,
    pub found: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}, found {}", self.key, self.expected, self.found)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCheck {
    pub missing: Vec<Entry>,
    pub mismatched: Vec<Mismatch>,
}

impl CategoryCheck {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

/// Per-category result of validating a machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub package_managers: CategoryCheck,
    pub runtimes: CategoryCheck,
    pub tools: CategoryCheck,
    pub editor_extensions: CategoryCheck,
}

impl Validation {
    pub fn outcome(&self) -> Outcome {
        if self.categories().iter().all(|(_, check)| check.is_clean()) {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome() == Outcome::Pass
    }

    /// Each category with its display label, in report order.
    pub fn categories(&self) -> [(&'static str, &CategoryCheck); 4] {
        [
            ("Package Managers", &self.package_managers),
            ("Runtimes", &self.runtimes),
            ("Tools", &self.tools),
            ("Editor Extensions", &self.editor_extensions),
        ]
    }
}

fn check_items<T: Inventory>(expected: &[T], actual: &[T], compare_versions: bool) -> CategoryCheck {
    let installed: HashMap<&str, &T> = actual.iter().map(|item| (item.key(), item)).collect();
    let mut check = CategoryCheck::default();

    for item in expected {
        let Some(found) = installed.get(item.key()) else {
            check.missing.push(Entry::of(item));
            continue;
        };

        if !compare_versions {
            continue;
        }
        if let (Some(want), Some(have)) = (item.version(), found.version()) {
            if want != have {
                check.mismatched.push(Mismatch {
                    key: item.key().to_string(),
                    expected: want.to_string(),
                    found: have.to_string(),
                });
            }
        }
    }

    check
}

/// Checks `actual` against `expected` without scanning.
pub fn reconcile(expected: &Snapshot, actual: &Snapshot) -> Validation {
    Validation {
        package_managers: check_items(&expected.package_managers, &actual.package_managers, true),
        runtimes: check_items(&expected.runtimes, &actual.runtimes, true),
        tools: check_items(&expected.tools, &actual.tools, true),
        editor_extensions: check_items(expected.extensions(), actual.extensions(), false),
    }
}

/// Scans the machine and checks it against `expected`.
pub async fn validate(expected: &Snapshot, composer: &Composer, ctx: &ScanContext) -> Validation {
    let actual = composer.compose(ctx).await;
    reconcile(expected, &actual)
}
