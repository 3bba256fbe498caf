//! Process-level owner of companies.
//!
//! # Responsibility
//! - Hold every live company in an arena keyed by `CompanyHandle`.
//! - Replace a company from storage only after a complete load.
//!
//! # Invariants
//! - Handles are never reused within one session.
//! - A failed load leaves the addressed company untouched.

use crate::company::Company;
use crate::config::CoreConfig;
use crate::store::{self, StoreResult};
use log::info;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Opaque id of a company inside one `Session`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompanyHandle(u64);

impl Display for CompanyHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "company#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct Session {
    config: CoreConfig,
    companies: BTreeMap<CompanyHandle, Company>,
    next_handle: u64,
}

impl Session {
    /// Companies loaded into this session use `config`.
    pub fn new(config: CoreConfig) -> Self {
        Self {
            config,
            companies: BTreeMap::new(),
            next_handle: 1,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn insert(&mut self, company: Company) -> CompanyHandle {
        let handle = CompanyHandle(self.next_handle.max(1));
        self.next_handle = handle.0 + 1;
        self.companies.insert(handle, company);
        handle
    }

    pub fn get(&self, handle: CompanyHandle) -> Option<&Company> {
        self.companies.get(&handle)
    }

    pub fn get_mut(&mut self, handle: CompanyHandle) -> Option<&mut Company> {
        self.companies.get_mut(&handle)
    }

    /// Removes a company and hands it back.
    pub fn destroy(&mut self, handle: CompanyHandle) -> Option<Company> {
        let removed = self.companies.remove(&handle);
        if removed.is_some() {
            info!(
                "event=company_destroy module=session status=ok handle={}",
                handle
            );
        }
        removed
    }

    pub fn handles(&self) -> impl Iterator<Item = CompanyHandle> + '_ {
        self.companies.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// Loads a new company from `path` and registers it.
    pub fn open(&mut self, path: &Path) -> StoreResult<CompanyHandle> {
        let company = store::load_company(path, self.config.clone())?;
        Ok(self.insert(company))
    }

    /// Replaces the company at `handle` with the one stored at `path`.
    /// Inserts it when `handle` is not live. Nothing changes on error.
    pub fn load_company(&mut self, handle: CompanyHandle, path: &Path) -> StoreResult<()> {
        let loaded = store::load_company(path, self.config.clone())?;
        self.companies.insert(handle, loaded);
        self.next_handle = self.next_handle.max(handle.0 + 1);
        info!(
            "event=company_replace module=session status=ok handle={} path={}",
            handle,
            path.display()
        );
        Ok(())
    }

    pub fn save_company(&self, handle: CompanyHandle, path: &Path) -> StoreResult<bool> {
        match self.companies.get(&handle) {
            Some(company) => {
                store::save_company(company, path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::company::Company;
    use crate::config::CoreConfig;
    use crate::store::StoreError;

    #[test]
    fn handles_are_not_reused() {
        let mut session = Session::new(CoreConfig::default());
        let first = session.insert(Company::new("A", "x", "y", 2000).unwrap());
        session.destroy(first).unwrap();
        let second = session.insert(Company::new("B", "x", "y", 2000).unwrap());
        assert_ne!(first, second);
        assert!(session.get(first).is_none());
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn failed_load_keeps_existing_company() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.txt");
        std::fs::write(&bad, "STAFFING_DATA v1\nCOMPANY|Acme|x|y|1500\n").unwrap();

        let mut session = Session::new(CoreConfig::default());
        let handle = session.insert(Company::new("Keep", "x", "y", 2000).unwrap());
        let err = session.load_company(handle, &bad).unwrap_err();
        assert!(matches!(err, StoreError::Model { line: 2, .. }));
        assert_eq!(session.get(handle).unwrap().name(), "Keep");
    }
}
