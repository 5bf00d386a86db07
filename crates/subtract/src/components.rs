//! Subtraction of named heating and cooling components
//!
//! The total heating or cooling of a run is the sum of many named agents,
//! e.g. `"H  1 0.0"` or `"FF H 0.0"`. The components of the small grid are
//! removed from the large grid before the rate is summed again, so that only
//! the contribution of what the large grid adds (usually metals) remains.

// crate modules
use crate::align::Alignment;

// standard library
use std::collections::{BTreeMap, BTreeSet};

// external crates
use log::{debug, trace};

/// Named contributions at a single temperature, in file order
pub type Components = Vec<(String, f64)>;

/// Rules deciding which components survive a subtraction
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRules {
    /// Fields whose result should only keep what the small grid lacks
    pub metals_only: BTreeSet<String>,
    /// Components never carried into the result, by field
    pub denylist: BTreeMap<String, BTreeSet<String>>,
}

impl Default for ComponentRules {
    fn default() -> Self {
        let metals_only = ["cooling", "heating"].into_iter().map(String::from).collect();

        let mut denylist = BTreeMap::new();
        denylist.insert(
            "cooling".to_string(),
            ["CT C 0.0", "hvFB 0.0"].into_iter().map(String::from).collect(),
        );

        Self {
            metals_only,
            denylist,
        }
    }
}

impl ComponentRules {
    /// Check if a field only keeps components missing from the small grid
    pub fn is_metals_only(&self, field: &str) -> bool {
        self.metals_only.contains(field)
    }

    /// Check a component name against the field denylist, ignoring padding
    pub fn is_denied(&self, field: &str, component: &str) -> bool {
        self.denylist
            .get(field)
            .is_some_and(|names| names.contains(component.trim()))
    }
}

/// Result of subtracting components for every large sample
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentSubtraction {
    /// Scaled sum of the positive contributions, unset where unaligned
    pub totals: Vec<Option<f64>>,
    /// Every contribution kept, including negative ones
    pub components: Vec<Components>,
}

/// Subtract the small grid components from the large grid components
///
/// For each aligned sample `q` of the large grid:
///
/// - denylisted components are always left out
/// - components in both grids are subtracted, unless the field is
///   metals-only in which case they are left out
/// - components only in the large grid are kept as they are for
///   metals-only fields and left out otherwise
///
/// Contributions that come out negative are kept in the component list but
/// not added to the total. The total is then scaled by
/// `large_total[q] / large_unscaled[q]` to recover the normalisation of the
/// large grid rates. Samples with a zero unscaled rate are left unset.
pub fn subtract_components(
    field: &str,
    large_total: &[f64],
    large_unscaled: &[f64],
    large_components: &[Components],
    small_components: &[Components],
    alignment: &Alignment,
    rules: &ComponentRules,
) -> ComponentSubtraction {
    let metals_only = rules.is_metals_only(field);
    let mut result = ComponentSubtraction::default();

    for (q, w) in alignment.matches.iter().enumerate() {
        let Some(w) = *w else {
            result.totals.push(None);
            result.components.push(Components::new());
            continue;
        };

        let small: BTreeMap<&str, f64> = small_components[w]
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();

        let mut kept = Components::new();
        for (name, value) in last_by_name(&large_components[q]) {
            if rules.is_denied(field, name) {
                trace!("{field} {name:?} denied");
                continue;
            }
            let contribution = match (small.get(name), metals_only) {
                (Some(s), false) => value - s,
                (None, true) => value,
                _ => continue,
            };
            kept.push((name.to_string(), contribution));
        }

        let sum: f64 = kept.iter().map(|(_, v)| *v).filter(|v| *v > 0.0).sum();
        let total = if large_unscaled[q] == 0.0 {
            debug!("{field} has a zero unscaled rate at sample {q}");
            None
        } else {
            Some(sum * large_total[q] / large_unscaled[q])
        };

        result.totals.push(total);
        result.components.push(kept);
    }

    result
}

/// Components with repeated names collapsed onto the last value
///
/// Each name stays at the position it was first seen.
fn last_by_name(components: &Components) -> Vec<(&str, f64)> {
    let mut positions: BTreeMap<&str, usize> = BTreeMap::new();
    let mut unique: Vec<(&str, f64)> = Vec::with_capacity(components.len());
    for (name, value) in components {
        match positions.get(name.as_str()) {
            Some(&i) => unique[i].1 = *value,
            None => {
                positions.insert(name.as_str(), unique.len());
                unique.push((name.as_str(), *value));
            }
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align;

    fn components(pairs: &[(&str, f64)]) -> Components {
        pairs.iter().map(|(n, v)| (n.to_string(), *v)).collect()
    }

    #[test]
    fn default_rules() {
        let rules = ComponentRules::default();
        assert!(rules.is_metals_only("cooling"));
        assert!(rules.is_metals_only("heating"));
        assert!(!rules.is_metals_only("mmw"));
        assert!(rules.is_denied("cooling", "  CT C 0.0 "));
        assert!(!rules.is_denied("heating", "CT C 0.0"));
    }

    #[test]
    fn metals_only_keeps_large_only_components() {
        let large = vec![components(&[
            ("H  1 0.0", 5.0),
            ("Fe 2 0.0", 2.0),
            ("CT C 0.0", 1.0),
            ("O  3 0.0", -0.5),
        ])];
        let small = vec![components(&[("H  1 0.0", 4.0)])];
        let alignment = align(&[100.0], &[100.0]);

        let result = subtract_components(
            "cooling",
            &[8.0],
            &[4.0],
            &large,
            &small,
            &alignment,
            &ComponentRules::default(),
        );

        // shared and denied components removed, negative kept but not summed
        assert_eq!(
            result.components[0],
            components(&[("Fe 2 0.0", 2.0), ("O  3 0.0", -0.5)])
        );
        assert_eq!(result.totals, vec![Some(2.0 * 8.0 / 4.0)]);
    }

    #[test]
    fn other_fields_subtract_shared_components() {
        let large = vec![components(&[("a", 5.0), ("b", 2.0), ("c", 1.0)])];
        let small = vec![components(&[("a", 1.0), ("b", 3.0)])];
        let alignment = align(&[1.0], &[1.0]);

        let result = subtract_components(
            "lines",
            &[1.0],
            &[1.0],
            &large,
            &small,
            &alignment,
            &ComponentRules::default(),
        );

        assert_eq!(result.components[0], components(&[("a", 4.0), ("b", -1.0)]));
        assert_eq!(result.totals, vec![Some(4.0)]);
    }

    #[test]
    fn uses_aligned_small_sample() {
        let large = vec![components(&[("a", 5.0)]), components(&[("a", 7.0)])];
        let small = vec![
            components(&[("a", 100.0)]),
            components(&[("a", 1.0)]),
            components(&[("a", 2.0)]),
        ];
        let alignment = align(&[2.0, 3.0], &[1.0, 2.0, 3.0]);
        let rules = ComponentRules {
            metals_only: BTreeSet::new(),
            denylist: BTreeMap::new(),
        };

        let result =
            subtract_components("x", &[1.0, 1.0], &[1.0, 1.0], &large, &small, &alignment, &rules);
        assert_eq!(result.totals, vec![Some(4.0), Some(5.0)]);
    }

    #[test]
    fn repeated_component_uses_last_value() {
        let large = vec![components(&[
            ("Fe 2 0.0", 2.0),
            ("H  1 0.0", 1.0),
            ("Fe 2 0.0", 3.0),
        ])];
        let small = vec![components(&[])];
        let alignment = align(&[1.0], &[1.0]);

        let result = subtract_components(
            "cooling",
            &[1.0],
            &[1.0],
            &large,
            &small,
            &alignment,
            &ComponentRules::default(),
        );
        assert_eq!(
            result.components[0],
            components(&[("Fe 2 0.0", 3.0), ("H  1 0.0", 1.0)])
        );
        assert_eq!(result.totals, vec![Some(4.0)]);
    }

    #[test]
    fn unaligned_and_unscaled_samples() {
        let large = vec![components(&[("a", 5.0)]), components(&[("a", 7.0)])];
        let small = vec![components(&[])];
        let alignment = align(&[1.0, 2.0], &[2.0]);

        let result = subtract_components(
            "cooling",
            &[1.0, 1.0],
            &[1.0, 0.0],
            &large,
            &small,
            &alignment,
            &ComponentRules::default(),
        );
        assert_eq!(result.totals, vec![None, None]);
        assert!(result.components[0].is_empty());
    }
}
