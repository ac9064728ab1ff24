use super::bond::BondKey;
use std::collections::HashMap;

/// Occurrence counts of bond observations, grouped by residue name.
///
/// Tables from independent workers are combined with [`BondCountTable::merge`],
/// which only ever adds counts. Merging is commutative and associative, so the
/// order in which partial tables arrive does not affect the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BondCountTable {
    groups: HashMap<String, HashMap<BondKey, u64>>,
}

impl BondCountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of a group together with all of its bonds.
    ///
    /// The group gets an entry even if it has no bonds.
    pub fn record<I>(&mut self, group: &str, bonds: I)
    where
        I: IntoIterator<Item = BondKey>,
    {
        let group_bonds = self.group_entry(group);
        for bond in bonds {
            *group_bonds.entry(bond).or_insert(0) += 1;
        }
    }

    pub fn add(&mut self, group: &str, bond: BondKey, count: u64) {
        *self.group_entry(group).entry(bond).or_insert(0) += count;
    }

    pub fn count(&self, group: &str, bond: &BondKey) -> u64 {
        self.groups
            .get(group)
            .and_then(|bonds| bonds.get(bond))
            .copied()
            .unwrap_or(0)
    }

    pub fn group(&self, name: &str) -> Option<&HashMap<BondKey, u64>> {
        self.groups.get(name)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &HashMap<BondKey, u64>)> {
        self.groups
            .iter()
            .map(|(name, bonds)| (name.as_str(), bonds))
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of distinct (group, bond) entries.
    pub fn bond_count(&self) -> usize {
        self.groups.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Adds all counts of `other` to this table.
    pub fn merge(&mut self, other: BondCountTable) {
        for (group, bonds) in other.groups {
            let group_bonds = self.groups.entry(group).or_default();
            for (bond, count) in bonds {
                *group_bonds.entry(bond).or_insert(0) += count;
            }
        }
    }

    /// Sums any number of tables into one. An empty input yields an empty table.
    pub fn merged<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = BondCountTable>,
    {
        tables.into_iter().fold(Self::new(), |mut acc, table| {
            acc.merge(table);
            acc
        })
    }

    /// Keeps only bonds seen at least `threshold` times.
    ///
    /// Groups without any remaining bond are dropped entirely.
    pub fn filtered(&self, threshold: u64) -> Self {
        let groups = self
            .groups
            .iter()
            .filter_map(|(group, bonds)| {
                let kept: HashMap<BondKey, u64> = bonds
                    .iter()
                    .filter(|&(_, &count)| count >= threshold)
                    .map(|(bond, &count)| (bond.clone(), count))
                    .collect();
                (!kept.is_empty()).then(|| (group.clone(), kept))
            })
            .collect();
        Self { groups }
    }

    fn group_entry(&mut self, group: &str) -> &mut HashMap<BondKey, u64> {
        self.groups.entry(group.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::bond::BondOrder;

    fn bond(a: &str, b: &str, order: i32) -> BondKey {
        BondKey::new(a, b, BondOrder(order))
    }

    fn table(entries: &[(&str, BondKey, u64)]) -> BondCountTable {
        let mut table = BondCountTable::new();
        for (group, key, count) in entries {
            table.add(group, key.clone(), *count);
        }
        table
    }

    fn sample_tables() -> Vec<BondCountTable> {
        vec![
            table(&[
                ("GLY", bond("N", "CA", 1), 2),
                ("GLY", bond("CA", "C", 1), 1),
            ]),
            table(&[
                ("GLY", bond("CA", "N", 1), 3),
                ("ALA", bond("CA", "CB", 1), 4),
            ]),
            table(&[
                ("HEM", bond("FE", "NA", 1), 1),
                ("ALA", bond("C", "O", 2), 5),
                ("GLY", bond("C", "O", 2), 1),
            ]),
        ]
    }

    #[test]
    fn record_counts_each_bond_once_per_occurrence() {
        let mut table = BondCountTable::new();
        table.record("GLY", [bond("N", "CA", 1), bond("CA", "C", 1)]);
        table.record("GLY", [bond("CA", "N", 1)]);

        assert_eq!(table.count("GLY", &bond("N", "CA", 1)), 2);
        assert_eq!(table.count("GLY", &bond("C", "CA", 1)), 1);
        assert_eq!(table.count("GLY", &bond("C", "O", 2)), 0);
        assert_eq!(table.count("ALA", &bond("N", "CA", 1)), 0);
    }

    #[test]
    fn record_creates_entry_for_group_without_bonds() {
        let mut table = BondCountTable::new();
        table.record("HOH", std::iter::empty());

        assert_eq!(table.group_count(), 1);
        assert!(table.group("HOH").unwrap().is_empty());
        assert_eq!(table.bond_count(), 0);
    }

    #[test]
    fn merge_sums_counts_of_identical_keys() {
        let merged = BondCountTable::merged(sample_tables());

        assert_eq!(merged.count("GLY", &bond("N", "CA", 1)), 5);
        assert_eq!(merged.count("GLY", &bond("CA", "C", 1)), 1);
        assert_eq!(merged.count("GLY", &bond("C", "O", 2)), 1);
        assert_eq!(merged.count("ALA", &bond("CA", "CB", 1)), 4);
        assert_eq!(merged.count("ALA", &bond("C", "O", 2)), 5);
        assert_eq!(merged.count("HEM", &bond("FE", "NA", 1)), 1);
        assert_eq!(merged.group_count(), 3);
        assert_eq!(merged.bond_count(), 6);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        let merged = BondCountTable::merged(Vec::new());
        assert!(merged.is_empty());
    }

    #[test]
    fn merge_is_commutative() {
        let tables = sample_tables();
        let expected = BondCountTable::merged(tables.clone());
        let permutations = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        for permutation in permutations {
            let reordered = permutation.iter().map(|&i| tables[i].clone());
            assert_eq!(BondCountTable::merged(reordered), expected);
        }
    }

    #[test]
    fn merge_is_associative() {
        let [a, b, c]: [BondCountTable; 3] = sample_tables().try_into().unwrap();

        let flat = BondCountTable::merged([a.clone(), b.clone(), c.clone()]);
        let left = BondCountTable::merged([
            BondCountTable::merged([a.clone(), b.clone()]),
            c.clone(),
        ]);
        let right = BondCountTable::merged([a, BondCountTable::merged([b, c])]);

        assert_eq!(flat, left);
        assert_eq!(flat, right);
    }

    #[test]
    fn filter_drops_rare_bonds_and_empty_groups() {
        let merged = BondCountTable::merged(sample_tables());
        let filtered = merged.filtered(4);

        assert_eq!(filtered.count("GLY", &bond("N", "CA", 1)), 5);
        assert_eq!(filtered.count("GLY", &bond("CA", "C", 1)), 0);
        assert_eq!(filtered.count("ALA", &bond("CA", "CB", 1)), 4);
        assert!(filtered.group("HEM").is_none());
        assert_eq!(filtered.group_count(), 2);
    }

    #[test]
    fn filter_with_zero_threshold_only_drops_groups_without_bonds() {
        let mut merged = BondCountTable::merged(sample_tables());
        merged.record("HOH", std::iter::empty());

        let filtered = merged.filtered(0);

        assert!(filtered.group("HOH").is_none());
        merged.groups.remove("HOH");
        assert_eq!(filtered, merged);
    }

    #[test]
    fn filter_is_idempotent() {
        let merged = BondCountTable::merged(sample_tables());
        for threshold in 0..7 {
            let once = merged.filtered(threshold);
            assert_eq!(once.filtered(threshold), once);
        }
    }

    #[test]
    fn filter_is_monotonic_in_threshold() {
        let merged = BondCountTable::merged(sample_tables());
        for low in 0..7 {
            for high in low..7 {
                let loose = merged.filtered(low);
                let strict = merged.filtered(high);
                for (group, bonds) in strict.groups() {
                    for (key, &count) in bonds {
                        assert_eq!(loose.count(group, key), count);
                    }
                }
            }
        }
    }

    #[test]
    fn filter_above_all_counts_yields_empty_table() {
        let merged = BondCountTable::merged(sample_tables());
        assert!(merged.filtered(100).is_empty());
    }
}
