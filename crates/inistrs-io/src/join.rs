//! Inner join of the six component tables on element id.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::component::{Component, ComponentTable};
use crate::error::{InistrsError, Result};

/// Full stress tensor of one element, values in canonical component order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinedRecord {
    pub element_id: u64,
    pub values: [f64; 6],
}

impl JoinedRecord {
    pub fn value(&self, component: Component) -> f64 {
        self.values[component.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JoinOutcome {
    /// Records in the order their ids first appear in the XX table.
    pub records: Vec<JoinedRecord>,
    /// Ids present in at least one table but missing from another, ascending.
    pub dropped: Vec<u64>,
}

/// Join the six tables, given in canonical order, on element id.
///
/// An element is kept only when all six tables carry it. Any id repeated
/// within one table fails the join.
pub fn join_tables(tables: &[ComponentTable]) -> Result<JoinOutcome> {
    if tables.len() != Component::ALL.len() {
        return Err(InistrsError::Config(format!(
            "expected {} component tables, got {}",
            Component::ALL.len(),
            tables.len()
        )));
    }
    for (position, (table, expected)) in tables.iter().zip(Component::ALL).enumerate() {
        if table.component != expected {
            return Err(InistrsError::ComponentMismatch {
                position,
                expected,
                found: table.component,
            });
        }
    }

    let indexed = tables
        .iter()
        .map(index_table)
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(tables[0].len());
    let mut kept = BTreeSet::new();
    for row in &tables[0].rows {
        let mut values = [0.0; 6];
        let complete = indexed.iter().enumerate().all(|(i, index)| match index.get(&row.element_id) {
            Some(value) => {
                values[i] = *value;
                true
            }
            None => false,
        });
        if complete {
            kept.insert(row.element_id);
            records.push(JoinedRecord {
                element_id: row.element_id,
                values,
            });
        }
    }

    let dropped: Vec<u64> = indexed
        .iter()
        .flat_map(|index| index.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|id| !kept.contains(id))
        .collect();

    if !dropped.is_empty() {
        warn!(
            dropped = dropped.len(),
            "elements missing from at least one component table were left out"
        );
        debug!(ids = ?dropped, "dropped element ids");
    }
    debug!(records = records.len(), "joined component tables");

    Ok(JoinOutcome { records, dropped })
}

fn index_table(table: &ComponentTable) -> Result<BTreeMap<u64, f64>> {
    let mut first_lines = BTreeMap::new();
    let mut index = BTreeMap::new();
    for row in &table.rows {
        if let Some(first_line) = first_lines.insert(row.element_id, row.line) {
            return Err(InistrsError::DuplicateKey {
                component: table.component,
                element_id: row.element_id,
                first_line,
                line: row.line,
            });
        }
        index.insert(row.element_id, row.value);
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentRow;

    fn table(component: Component, rows: &[(u64, f64)]) -> ComponentTable {
        ComponentTable {
            component,
            rows: rows
                .iter()
                .enumerate()
                .map(|(i, &(element_id, value))| ComponentRow {
                    element_id,
                    value,
                    line: i + 1,
                })
                .collect(),
        }
    }

    /// Six tables with the same ids, component `k` holding `id * 10 + k`.
    fn uniform(ids: &[u64]) -> Vec<ComponentTable> {
        Component::ALL
            .into_iter()
            .map(|c| {
                let rows: Vec<(u64, f64)> = ids
                    .iter()
                    .map(|&id| (id, (id * 10 + c.index() as u64) as f64))
                    .collect();
                table(c, &rows)
            })
            .collect()
    }

    #[test]
    fn joins_identical_id_sets() {
        let outcome = join_tables(&uniform(&[3, 1, 2])).expect("join");

        assert_eq!(outcome.records.len(), 3);
        assert!(outcome.dropped.is_empty());
        let ids: Vec<u64> = outcome.records.iter().map(|r| r.element_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let rec = &outcome.records[1];
        assert_eq!(rec.values, [10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        assert_eq!(rec.value(Component::Zx), 15.0);
    }

    #[test]
    fn order_follows_reference_table_not_others() {
        let mut tables = uniform(&[1, 2, 3]);
        tables[4].rows.reverse();
        let outcome = join_tables(&tables).unwrap();
        let ids: Vec<u64> = outcome.records.iter().map(|r| r.element_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(outcome.records[2].value(Component::Yz), 34.0);
    }

    #[test]
    fn element_missing_from_one_table_is_dropped() {
        let mut tables = uniform(&[1, 2, 3, 4]);
        tables[3].rows.retain(|r| r.element_id != 4);

        let outcome = join_tables(&tables).expect("missing ids are not an error");
        let ids: Vec<u64> = outcome.records.iter().map(|r| r.element_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(outcome.dropped, vec![4]);
    }

    #[test]
    fn ids_absent_from_reference_are_reported_as_dropped() {
        let mut tables = uniform(&[1, 2]);
        tables[5].rows.push(ComponentRow {
            element_id: 9,
            value: 1.0,
            line: 3,
        });

        let outcome = join_tables(&tables).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.dropped, vec![9]);
    }

    #[test]
    fn duplicate_id_fails() {
        let mut tables = uniform(&[1, 2]);
        tables[2] = table(Component::Zz, &[(1, 0.5), (2, 0.5), (1, 0.7)]);

        let err = join_tables(&tables).expect_err("duplicate id");
        match err {
            InistrsError::DuplicateKey {
                component,
                element_id,
                first_line,
                line,
            } => {
                assert_eq!(component, Component::Zz);
                assert_eq!(element_id, 1);
                assert_eq!(first_line, 1);
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_in_reference_table_fails() {
        let mut tables = uniform(&[1]);
        tables[0] = table(Component::Xx, &[(1, 1.0), (1, 2.0)]);
        assert!(matches!(
            join_tables(&tables),
            Err(InistrsError::DuplicateKey { component: Component::Xx, .. })
        ));
    }

    #[test]
    fn tables_out_of_order_are_rejected() {
        let mut tables = uniform(&[1]);
        tables.swap(1, 2);
        let err = join_tables(&tables).expect_err("YY and ZZ swapped");
        assert!(matches!(
            err,
            InistrsError::ComponentMismatch {
                position: 1,
                expected: Component::Yy,
                found: Component::Zz
            }
        ));

        assert!(matches!(join_tables(&tables[..5]), Err(InistrsError::Config(_))));
    }

    #[test]
    fn empty_tables_join_to_nothing() {
        let outcome = join_tables(&uniform(&[])).unwrap();
        assert_eq!(outcome, JoinOutcome::default());
    }
}
