use crate::diff::Differences;
use crate::model::Snapshot;
use crate::validate::Validation;
use std::fmt::Write;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN_BOLD: &str = "\x1b[1;36m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

struct Painter {
    color: bool,
}

impl Painter {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }
}

fn write_section<T: ToString>(
    out: &mut String,
    painter: &Painter,
    code: &str,
    heading: String,
    marker: char,
    items: &[T],
) {
    if items.is_empty() {
        return;
    }

    let _ = writeln!(out, "{}", painter.paint(code, &heading));
    for item in items {
        let line = format!("  {} {}", marker, item.to_string());
        let _ = writeln!(out, "{}", painter.paint(code, &line));
    }
    let _ = writeln!(out);
}

/// Renders `compare` output: additions, then removals, then version changes.
pub fn render_differences(
    labels: (&str, &str),
    baseline: &Snapshot,
    current: &Snapshot,
    diff: &Differences,
    color: bool,
) -> String {
    let painter = Painter { color };
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", painter.paint(CYAN_BOLD, "Environment Comparison"));
    let header_a = format!("  File 1: {} ({})", labels.0, baseline.timestamp.to_rfc3339());
    let header_b = format!("  File 2: {} ({})", labels.1, current.timestamp.to_rfc3339());
    let _ = writeln!(out, "{}", painter.paint(DIM, &header_a));
    let _ = writeln!(out, "{}", painter.paint(DIM, &header_b));
    let _ = writeln!(out);

    for (label, category) in diff.categories() {
        write_section(&mut out, &painter, GREEN, format!("Added {}:", label), '+', &category.added);
    }
    for (label, category) in diff.categories() {
        write_section(&mut out, &painter, RED, format!("Removed {}:", label), '-', &category.removed);
    }
    for (label, category) in diff.categories() {
        write_section(
            &mut out,
            &painter,
            YELLOW,
            format!("Changed {}:", label),
            '~',
            &category.changed,
        );
    }

    if diff.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            painter.paint(GREEN, "No differences found between the two environments")
        );
    }

    out
}

/// Renders `validate` output: missing entries, then version mismatches.
pub fn render_validation(
    label: &str,
    expected: &Snapshot,
    validation: &Validation,
    color: bool,
) -> String {
    let painter = Painter { color };
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", painter.paint(CYAN_BOLD, "Environment Validation"));
    let header = format!("  Expected: {} ({})", label, expected.timestamp.to_rfc3339());
    let _ = writeln!(out, "{}", painter.paint(DIM, &header));
    let _ = writeln!(out);

    for (name, check) in validation.categories() {
        write_section(&mut out, &painter, RED, format!("Missing {}:", name), '-', &check.missing);
    }
    for (name, check) in validation.categories() {
        write_section(
            &mut out,
            &painter,
            YELLOW,
            format!("Version mismatch in {}:", name),
            '~',
            &check.mismatched,
        );
    }

    if validation.passed() {
        let _ = writeln!(
            out,
            "{}",
            painter.paint(GREEN, "Environment matches the expected configuration")
        );
    } else {
        let _ = writeln!(
            out,
            "{}",
            painter.paint(YELLOW, "Environment does not match the expected configuration")
        );
        let _ = writeln!(out, "Run the generated setup script to install missing components");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use crate::model::{Binary, PackageManager, SystemInfo};
    use crate::validate::reconcile;

    fn with_managers(managers: &[(&str, &str)]) -> Snapshot {
        let mut snapshot = Snapshot::new(SystemInfo::default());
        snapshot.package_managers = managers
            .iter()
            .map(|(n, v)| PackageManager::new(*n, *v))
            .collect();
        snapshot
    }

    #[test]
    fn test_render_differences_plain() {
        let a = with_managers(&[("npm", "9.0.0"), ("brew", "4.1.0")]);
        let b = with_managers(&[("npm", "9.1.0"), ("yarn", "1.22.0")]);

        let text = render_differences(("a.json", "b.json"), &a, &b, &diff(&a, &b), false);
        assert!(text.contains("Added Package Managers:\n  + yarn (1.22.0)\n"));
        assert!(text.contains("Removed Package Managers:\n  - brew (4.1.0)\n"));
        assert!(text.contains("Changed Package Managers:\n  ~ npm: 9.0.0 → 9.1.0\n"));
        assert!(!text.contains("Runtimes"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_render_no_differences() {
        let a = with_managers(&[("npm", "9.0.0")]);
        let text = render_differences(("a", "a"), &a, &a, &diff(&a, &a), true);
        assert!(text.contains("No differences found"));
        assert!(text.contains(RESET));
    }

    #[test]
    fn test_render_validation_failure() {
        let mut expected = with_managers(&[("npm", "10.2.0")]);
        expected.runtimes = vec![Binary::new("deno", "1.40.0", "")];
        let actual = with_managers(&[("npm", "10.5.0")]);

        let validation = reconcile(&expected, &actual);
        let text = render_validation("env.json", &expected, &validation, false);
        assert!(text.contains("Missing Runtimes:\n  - deno (1.40.0)\n"));
        assert!(text.contains(
            "Version mismatch in Package Managers:\n  ~ npm: expected 10.2.0, found 10.5.0\n"
        ));
        assert!(text.contains("does not match"));
    }
}
