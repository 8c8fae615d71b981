//! Dotted version comparison
//!
//! Versions published by module authors are loose: "1.02", "2.0", "3.1 BETA".
//! They are compared component by component as numbers, with the shorter
//! sequence padded with zeros. A trailing alphabetic qualifier is ignored.

use std::cmp::Ordering;

/// Compare two dotted version strings.
///
/// Examples:
/// - "1.2.0" < "1.10.0"
/// - "2.0" == "2.0.0"
/// - "1.5 BETA" == "1.5"
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a = numeric_components(a);
    let b = numeric_components(b);
    let len = a.len().max(b.len());

    (0..len)
        .map(|i| {
            let left = a.get(i).copied().unwrap_or("0");
            let right = b.get(i).copied().unwrap_or("0");
            compare_numeric(left, right)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Whether `remote` is strictly newer than `installed`
pub fn is_newer(remote: &str, installed: &str) -> bool {
    compare_versions(remote, installed) == Ordering::Greater
}

/// Split a version into its numeric components.
///
/// Each component contributes its leading digits (leading zeros removed);
/// a component without digits counts as zero.
fn numeric_components(version: &str) -> Vec<&str> {
    let version = version.trim();
    let version = version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version);

    version
        .split('.')
        .map(|component| {
            let component = component.trim_start();
            let digits_end = component
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(component.len());
            let digits = component[..digits_end].trim_start_matches('0');
            if digits.is_empty() { "0" } else { digits }
        })
        .collect()
}

/// Compare two digit strings without leading zeros, of any length.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.0", "1.10.0", Ordering::Less)]
    #[case("2.0", "2.0.0", Ordering::Equal)]
    #[case("1.02", "1.2", Ordering::Equal)]
    #[case("1.1", "1.0", Ordering::Greater)]
    #[case("1.0.1", "1", Ordering::Greater)]
    #[case("3.10", "3.9", Ordering::Greater)]
    #[case("1.5 BETA", "1.5", Ordering::Equal)]
    #[case("1.6 beta", "1.5", Ordering::Greater)]
    #[case("1.5BETA", "1.6", Ordering::Less)]
    #[case("v2.1", "2.1", Ordering::Equal)]
    #[case("99999999999999999999.1", "99999999999999999998.9", Ordering::Greater)]
    #[case("", "0", Ordering::Equal)]
    fn compare_versions_orders_numerically(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare_versions(a, b), expected);
        assert_eq!(compare_versions(b, a), expected.reverse());
    }

    #[rstest]
    #[case("1.1", "1.0", true)]
    #[case("1.0", "1.0", false)]
    #[case("1.0", "1.1", false)]
    #[case("2.0.0", "2.0", false)]
    fn is_newer_requires_strictly_greater(
        #[case] remote: &str,
        #[case] installed: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(is_newer(remote, installed), expected);
    }
}
