//! Version admission: the only paths that write refs to the store.
//!
//! Invariant: the cached view is invalidated before every store write, so
//! a concurrent reader either sees the pre-write value or misses and
//! reloads. It never observes a stale view after the write commits.

use chrono::{DateTime, Utc};
use petrel_core::{validate_package_info, PackageRef, PackageVersion};
use serde_json::Value;

use crate::error::Result;
use crate::registry::RegistryInner;

/// Admit one ref under a package, adding or updating as needed.
///
/// Returns `true` for a new admission, `false` for an update of an
/// already-stored ref; the persistent effect is the same either way.
pub(crate) fn add_or_update_version(
    inner: &RegistryInner,
    name: &str,
    ref_str: &str,
    date: DateTime<Utc>,
    sha: Option<String>,
    mut info: Value,
) -> Result<bool> {
    inner.cache.invalidate(name);

    let parsed = PackageRef::parse(ref_str)?;
    let release = match &parsed {
        PackageRef::Release(version) => Some(version),
        PackageRef::Branch(_) => None,
    };
    validate_package_info(&mut info, Some(name), release)?;

    let entry = PackageVersion {
        version: parsed.as_key(),
        date,
        sha,
        info,
    };

    let added = if parsed.is_branch() {
        if inner.db.has_branch(name, &entry.version)? {
            inner.db.update_branch(name, &entry)?;
            false
        } else {
            inner.db.add_branch(name, &entry)?;
            true
        }
    } else {
        if inner.db.has_version(name, &entry.version)? {
            inner.db.update_version(name, &entry)?;
            false
        } else {
            inner.db.add_version(name, &entry)?;
            true
        }
    };
    Ok(added)
}

/// Drop a stored ref (release or branch, by key prefix).
pub(crate) fn remove_version(inner: &RegistryInner, name: &str, key: &str) -> Result<()> {
    inner.cache.invalidate(name);
    inner.db.remove_version(name, key)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use petrel_core::ValidationError;
    use petrel_db::DbController;
    use serde_json::json;

    use super::*;
    use crate::error::RegistryError;
    use crate::test_utils::{info_doc, TestSetup};

    fn admit(setup: &TestSetup, ref_str: &str, info: Value) -> Result<bool> {
        add_or_update_version(&setup.registry.inner, "foo", ref_str, Utc::now(), None, info)
    }

    fn empty_package(setup: &TestSetup) {
        setup
            .db
            .add_package(&petrel_core::Package::new(
                "foo".into(),
                "u1".into(),
                setup.remote(),
            ))
            .unwrap();
    }

    #[test]
    fn test_release_add_then_update() {
        let setup = TestSetup::new();
        empty_package(&setup);

        assert!(admit(&setup, "0.1.0", info_doc("foo")).unwrap());
        assert!(!admit(&setup, "0.1.0", info_doc("foo")).unwrap());

        let pack = setup.db.get_package("foo").unwrap().unwrap();
        assert_eq!(pack.versions.len(), 1);
        assert!(pack.branches.is_empty());
    }

    #[test]
    fn test_branch_add_then_update() {
        let setup = TestSetup::new();
        empty_package(&setup);

        assert!(admit(&setup, "~master", info_doc("foo")).unwrap());
        assert!(!admit(&setup, "~master", info_doc("foo")).unwrap());

        let pack = setup.db.get_package("foo").unwrap().unwrap();
        assert_eq!(pack.branches.len(), 1);
        assert!(pack.versions.is_empty());
    }

    #[test]
    fn test_malformed_refs_are_rejected() {
        let setup = TestSetup::new();
        empty_package(&setup);

        for bad in ["~~locked", "v0.1.0", "master"] {
            let err = admit(&setup, bad, info_doc("foo")).unwrap_err();
            assert!(
                matches!(
                    err,
                    RegistryError::Validation(ValidationError::InvalidRef(_))
                ),
                "{bad} should be an invalid ref"
            );
        }
    }

    #[test]
    fn test_name_mismatch_is_rejected() {
        let setup = TestSetup::new();
        empty_package(&setup);

        let err = admit(&setup, "0.1.0", info_doc("bar")).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(ValidationError::NameMismatch { .. })
        ));
        assert!(setup
            .db
            .get_package("foo")
            .unwrap()
            .unwrap()
            .versions
            .is_empty());
    }

    #[test]
    fn test_admission_invalidates_cache_even_on_failure() {
        let setup = TestSetup::new();
        empty_package(&setup);
        setup.registry.inner.cache.insert("foo", json!({"stale": true}));

        let _ = admit(&setup, "0.1.0", json!({"name": "foo"}));
        assert!(setup.registry.inner.cache.get("foo").is_none());
    }

    #[test]
    fn test_remove_version_invalidates_cache() {
        let setup = TestSetup::new();
        empty_package(&setup);
        admit(&setup, "0.1.0", info_doc("foo")).unwrap();

        setup.registry.inner.cache.insert("foo", json!({"stale": true}));
        remove_version(&setup.registry.inner, "foo", "0.1.0").unwrap();

        assert!(setup.registry.inner.cache.get("foo").is_none());
        assert!(!setup.db.has_version("foo", "0.1.0").unwrap());
    }

    #[test]
    fn test_setup_is_send() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        let setup = TestSetup::new();
        assert_send_sync(&setup.registry);
        let _: Arc<dyn DbController> = setup.db.clone();
    }
}
