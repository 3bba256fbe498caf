//! Task assignment ledger.
//!
//! # Responsibility
//! - Hold the authoritative `(employee, project, task) -> hours` mapping.
//! - Answer sum queries along the employee, task and project axes.
//!
//! # Invariants
//! - No stored entry has zero hours; writing zero removes the key.
//! - Iteration order is the key order (employee, project, task), so every
//!   derived result is deterministic.
//! - The ledger performs no reference or ceiling validation; the company
//!   services do that before writing.

use crate::model::employee::EmployeeId;
use crate::model::project::ProjectId;
use crate::model::task::TaskId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Composite key of one assignment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AssignmentKey {
    pub employee_id: EmployeeId,
    pub project_id: ProjectId,
    pub task_id: TaskId,
}

impl AssignmentKey {
    pub fn new(employee_id: EmployeeId, project_id: ProjectId, task_id: TaskId) -> Self {
        Self {
            employee_id,
            project_id,
            task_id,
        }
    }

    pub fn is_task(&self, project_id: ProjectId, task_id: TaskId) -> bool {
        self.project_id == project_id && self.task_id == task_id
    }
}

impl Display for AssignmentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "employee={} project={} task={}",
            self.employee_id, self.project_id, self.task_id
        )
    }
}

/// Sparse hour ledger keyed by `AssignmentKey`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentLedger {
    entries: BTreeMap<AssignmentKey, u32>,
}

impl AssignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hours at `key`, or 0 when absent.
    pub fn get(&self, key: &AssignmentKey) -> u32 {
        self.entries.get(key).copied().unwrap_or(0)
    }

    /// Replaces hours at `key`; zero removes the entry. Returns the old value.
    pub fn put(&mut self, key: AssignmentKey, hours: u32) -> u32 {
        let previous = if hours == 0 {
            self.entries.remove(&key)
        } else {
            self.entries.insert(key, hours)
        };
        previous.unwrap_or(0)
    }

    pub fn remove(&mut self, key: &AssignmentKey) -> Option<u32> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssignmentKey, u32)> + '_ {
        self.entries.iter().map(|(key, hours)| (*key, *hours))
    }

    pub fn employee_total(&self, employee_id: EmployeeId) -> u32 {
        self.employee_entries(employee_id)
            .map(|(_, hours)| hours)
            .sum()
    }

    pub fn task_total(&self, project_id: ProjectId, task_id: TaskId) -> u32 {
        self.iter()
            .filter(|(key, _)| key.is_task(project_id, task_id))
            .map(|(_, hours)| hours)
            .sum()
    }

    pub fn project_total(&self, project_id: ProjectId) -> u32 {
        self.project_entries(project_id)
            .map(|(_, hours)| hours)
            .sum()
    }

    pub fn employee_project_total(&self, employee_id: EmployeeId, project_id: ProjectId) -> u32 {
        self.employee_entries(employee_id)
            .filter(|(key, _)| key.project_id == project_id)
            .map(|(_, hours)| hours)
            .sum()
    }

    /// Entries of one employee; a contiguous key range.
    pub fn employee_entries(
        &self,
        employee_id: EmployeeId,
    ) -> impl Iterator<Item = (AssignmentKey, u32)> + '_ {
        let start = AssignmentKey::new(employee_id, ProjectId::MIN, TaskId::MIN);
        let end = AssignmentKey::new(employee_id, ProjectId::MAX, TaskId::MAX);
        self.entries
            .range(start..=end)
            .map(|(key, hours)| (*key, *hours))
    }

    pub fn project_entries(
        &self,
        project_id: ProjectId,
    ) -> impl Iterator<Item = (AssignmentKey, u32)> + '_ {
        self.iter().filter(move |(key, _)| key.project_id == project_id)
    }

    pub fn task_entries(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> impl Iterator<Item = (AssignmentKey, u32)> + '_ {
        self.iter()
            .filter(move |(key, _)| key.is_task(project_id, task_id))
    }

    /// Per-employee sums over the whole ledger.
    pub fn employee_totals(&self) -> BTreeMap<EmployeeId, u32> {
        let mut totals = BTreeMap::new();
        for (key, hours) in self.iter() {
            *totals.entry(key.employee_id).or_insert(0) += hours;
        }
        totals
    }

    /// Per-task sums over the whole ledger.
    pub fn task_totals(&self) -> BTreeMap<(ProjectId, TaskId), u32> {
        let mut totals = BTreeMap::new();
        for (key, hours) in self.iter() {
            *totals.entry((key.project_id, key.task_id)).or_insert(0) += hours;
        }
        totals
    }

    /// Removes every entry matching `predicate`; returns the removed keys.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<AssignmentKey>
    where
        F: FnMut(&AssignmentKey) -> bool,
    {
        let removed: Vec<AssignmentKey> = self
            .entries
            .keys()
            .filter(|key| predicate(key))
            .copied()
            .collect();
        for key in &removed {
            self.entries.remove(key);
        }
        removed
    }

    /// Full copy of the mapping.
    pub fn snapshot(&self) -> BTreeMap<AssignmentKey, u32> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{AssignmentKey, AssignmentLedger};

    fn key(employee_id: u32, project_id: u32, task_id: u32) -> AssignmentKey {
        AssignmentKey::new(employee_id, project_id, task_id)
    }

    #[test]
    fn put_zero_removes_entry() {
        let mut ledger = AssignmentLedger::new();
        assert_eq!(ledger.put(key(1, 1, 1), 8), 0);
        assert_eq!(ledger.put(key(1, 1, 1), 0), 8);
        assert!(ledger.is_empty());
        assert_eq!(ledger.get(&key(1, 1, 1)), 0);
    }

    #[test]
    fn sums_follow_each_axis() {
        let mut ledger = AssignmentLedger::new();
        ledger.put(key(1, 1, 1), 5);
        ledger.put(key(1, 1, 2), 3);
        ledger.put(key(1, 2, 1), 4);
        ledger.put(key(2, 1, 1), 7);

        assert_eq!(ledger.employee_total(1), 12);
        assert_eq!(ledger.employee_total(2), 7);
        assert_eq!(ledger.task_total(1, 1), 12);
        assert_eq!(ledger.project_total(1), 15);
        assert_eq!(ledger.employee_project_total(1, 1), 8);
        assert_eq!(ledger.employee_totals().get(&1), Some(&12));
        assert_eq!(ledger.task_totals().get(&(2, 1)), Some(&4));
    }

    #[test]
    fn employee_range_does_not_leak_neighbours() {
        let mut ledger = AssignmentLedger::new();
        ledger.put(key(1, u32::MAX, u32::MAX), 2);
        ledger.put(key(2, 0, 0), 9);
        ledger.put(key(3, 0, 0), 1);
        let entries: Vec<_> = ledger.employee_entries(2).collect();
        assert_eq!(entries, vec![(key(2, 0, 0), 9)]);
    }

    #[test]
    fn remove_where_reports_removed_keys() {
        let mut ledger = AssignmentLedger::new();
        ledger.put(key(1, 1, 1), 5);
        ledger.put(key(2, 1, 1), 5);
        ledger.put(key(1, 2, 1), 5);
        let removed = ledger.remove_where(|k| k.employee_id == 1);
        assert_eq!(removed, vec![key(1, 1, 1), key(1, 2, 1)]);
        assert_eq!(ledger.len(), 1);
    }
}
