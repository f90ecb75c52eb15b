//! In-memory document store.

use std::collections::HashMap;
use std::sync::Mutex;

use petrel_core::{Package, PackageSummary, PackageVersion};

use crate::error::{DbError, Result};
use crate::DbController;

/// A `Mutex<HashMap>`-backed [`DbController`] driver.
///
/// Suitable for tests and single-process embedding; nothing survives the
/// process.
#[derive(Default)]
pub struct MemoryDb {
    packages: Mutex<HashMap<String, Package>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_package<T>(&self, name: &str, f: impl FnOnce(&mut Package) -> Result<T>) -> Result<T> {
        let mut packages = self.packages.lock().unwrap();
        let package = packages
            .get_mut(name)
            .ok_or_else(|| DbError::PackageNotFound(name.to_string()))?;
        f(package)
    }
}

fn set_ref(list: &mut Vec<PackageVersion>, entry: &PackageVersion, expect_existing: bool) -> Result<()> {
    match list.iter_mut().find(|v| v.version == entry.version) {
        Some(slot) => {
            if !expect_existing {
                // add on an existing key
                return Err(DbError::DuplicateVersion {
                    name: String::new(),
                    version: entry.version.clone(),
                });
            }
            *slot = entry.clone();
        }
        None => {
            if expect_existing {
                return Err(DbError::VersionNotFound {
                    name: String::new(),
                    version: entry.version.clone(),
                });
            }
            list.push(entry.clone());
        }
    }
    Ok(())
}

fn drop_ref(list: &mut Vec<PackageVersion>, key: &str) -> bool {
    let before = list.len();
    list.retain(|v| v.version != key);
    list.len() != before
}

fn fill_name(err: DbError, name: &str) -> DbError {
    match err {
        DbError::DuplicateVersion { version, .. } => DbError::DuplicateVersion {
            name: name.to_string(),
            version,
        },
        DbError::VersionNotFound { version, .. } => DbError::VersionNotFound {
            name: name.to_string(),
            version,
        },
        other => other,
    }
}

impl DbController for MemoryDb {
    fn add_package(&self, package: &Package) -> Result<()> {
        let mut packages = self.packages.lock().unwrap();
        if packages.contains_key(&package.name) {
            return Err(DbError::DuplicatePackage(package.name.clone()));
        }
        packages.insert(package.name.clone(), package.clone());
        Ok(())
    }

    fn remove_package(&self, name: &str, owner: &str) -> Result<()> {
        let mut packages = self.packages.lock().unwrap();
        let package = packages
            .get(name)
            .ok_or_else(|| DbError::PackageNotFound(name.to_string()))?;
        if package.owner != owner {
            return Err(DbError::NotOwner {
                name: name.to_string(),
                owner: owner.to_string(),
            });
        }
        packages.remove(name);
        Ok(())
    }

    fn get_package(&self, name: &str) -> Result<Option<Package>> {
        Ok(self.packages.lock().unwrap().get(name).cloned())
    }

    fn get_all_package_names(&self) -> Result<Vec<String>> {
        let packages = self.packages.lock().unwrap();
        let mut names: Vec<String> = packages.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn get_user_packages(&self, owner: &str) -> Result<Vec<PackageSummary>> {
        let packages = self.packages.lock().unwrap();
        let mut summaries: Vec<PackageSummary> = packages
            .values()
            .filter(|p| p.owner == owner)
            .map(Package::summary)
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    fn has_version(&self, name: &str, version: &str) -> Result<bool> {
        self.with_package(name, |p| Ok(p.versions.iter().any(|v| v.version == version)))
    }

    fn add_version(&self, name: &str, version: &PackageVersion) -> Result<()> {
        self.with_package(name, |p| set_ref(&mut p.versions, version, false))
            .map_err(|e| fill_name(e, name))
    }

    fn update_version(&self, name: &str, version: &PackageVersion) -> Result<()> {
        self.with_package(name, |p| set_ref(&mut p.versions, version, true))
            .map_err(|e| fill_name(e, name))
    }

    fn remove_version(&self, name: &str, version: &str) -> Result<()> {
        if version.starts_with('~') {
            return self.remove_branch(name, version);
        }
        self.with_package(name, |p| {
            if drop_ref(&mut p.versions, version) {
                Ok(())
            } else {
                Err(DbError::VersionNotFound {
                    name: name.to_string(),
                    version: version.to_string(),
                })
            }
        })
    }

    fn has_branch(&self, name: &str, branch: &str) -> Result<bool> {
        self.with_package(name, |p| Ok(p.branches.iter().any(|v| v.version == branch)))
    }

    fn add_branch(&self, name: &str, branch: &PackageVersion) -> Result<()> {
        self.with_package(name, |p| set_ref(&mut p.branches, branch, false))
            .map_err(|e| fill_name(e, name))
    }

    fn update_branch(&self, name: &str, branch: &PackageVersion) -> Result<()> {
        self.with_package(name, |p| set_ref(&mut p.branches, branch, true))
            .map_err(|e| fill_name(e, name))
    }

    fn remove_branch(&self, name: &str, branch: &str) -> Result<()> {
        self.with_package(name, |p| {
            if drop_ref(&mut p.branches, branch) {
                Ok(())
            } else {
                Err(DbError::VersionNotFound {
                    name: name.to_string(),
                    version: branch.to_string(),
                })
            }
        })
    }

    fn set_package_categories(&self, name: &str, categories: &[String]) -> Result<()> {
        self.with_package(name, |p| {
            p.categories = categories.to_vec();
            Ok(())
        })
    }

    fn set_package_errors(&self, name: &str, errors: &[String]) -> Result<()> {
        self.with_package(name, |p| {
            p.errors = errors.to_vec();
            Ok(())
        })
    }

    fn search_packages(&self, keywords: &[String]) -> Result<Vec<PackageSummary>> {
        let keywords: Vec<String> = keywords
            .iter()
            .filter(|k| !k.is_empty())
            .map(|k| k.to_lowercase())
            .collect();
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let packages = self.packages.lock().unwrap();
        let mut matches: Vec<PackageSummary> = packages
            .values()
            .filter(|p| {
                let description = p
                    .latest()
                    .and_then(|v| v.description())
                    .unwrap_or_default()
                    .to_lowercase();
                keywords
                    .iter()
                    .any(|k| p.name.contains(k) || description.contains(k))
            })
            .map(Package::summary)
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matches)
    }
}
