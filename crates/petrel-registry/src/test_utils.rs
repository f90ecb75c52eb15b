//! Stub collaborators for engine tests.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use petrel_core::{Package, PackageSummary, PackageVersion, RemoteRepository};
use petrel_db::{DbController, DbError, MemoryDb};
use petrel_vcs::{CommitInfo, Repository, RepositoryProvider, VcsError};
use serde_json::{json, Value};

use crate::registry::Registry;

pub(crate) fn commit(sha: &str, secs: i64) -> CommitInfo {
    CommitInfo {
        sha: sha.to_string(),
        date: Utc.timestamp_opt(secs, 0).unwrap(),
    }
}

/// A minimal valid package description.
pub(crate) fn info_doc(name: &str) -> Value {
    json!({
        "name": name,
        "description": "a stub package",
        "license": "MIT",
    })
}

/// The descriptor used for every test package.
pub(crate) fn stub_remote() -> RemoteRepository {
    RemoteRepository::Github {
        owner: "stub".into(),
        project: "stub".into(),
    }
}

/// Poll until `condition` holds; panics after a few seconds.
pub(crate) fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("condition not reached within timeout");
}

#[derive(Default)]
struct StubState {
    tags: Vec<(String, CommitInfo)>,
    branches: Vec<(String, CommitInfo)>,
    files: HashMap<String, Vec<u8>>,
    fail_tags: bool,
    read_delay: Option<Duration>,
}

/// A scriptable in-memory repository shared with the code under test.
#[derive(Default)]
pub(crate) struct StubRepository {
    state: Mutex<StubState>,
}

impl StubRepository {
    pub(crate) fn set_tags(&self, tags: Vec<(String, CommitInfo)>) {
        self.state.lock().unwrap().tags = tags;
    }

    pub(crate) fn set_branches(&self, branches: Vec<(String, CommitInfo)>) {
        self.state.lock().unwrap().branches = branches;
    }

    /// Place a `package.json` at the given commit.
    pub(crate) fn put_file(&self, sha: &str, info: &Value) {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(sha.to_string(), serde_json::to_vec(info).unwrap());
    }

    pub(crate) fn set_fail_tags(&self, fail: bool) {
        self.state.lock().unwrap().fail_tags = fail;
    }

    pub(crate) fn set_read_delay(&self, delay: Duration) {
        self.state.lock().unwrap().read_delay = Some(delay);
    }
}

/// Handle implementing the capability over the shared stub.
struct StubHandle(Arc<StubRepository>);

impl Repository for StubHandle {
    fn get_tags(&self) -> petrel_vcs::Result<Vec<(String, CommitInfo)>> {
        let state = self.0.state.lock().unwrap();
        if state.fail_tags {
            return Err(VcsError::HttpError {
                status: 500,
                url: "https://git.example.com/stub/tags".into(),
            });
        }
        Ok(state.tags.clone())
    }

    fn get_branches(&self) -> petrel_vcs::Result<Vec<(String, CommitInfo)>> {
        Ok(self.0.state.lock().unwrap().branches.clone())
    }

    fn read_file(&self, sha: &str, _path: &str, sink: &mut dyn Write) -> petrel_vcs::Result<()> {
        let delay = self.0.state.lock().unwrap().read_delay;
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        let state = self.0.state.lock().unwrap();
        let bytes = state.files.get(sha).ok_or(VcsError::HttpError {
            status: 404,
            url: format!("https://git.example.com/stub/raw/{sha}"),
        })?;
        sink.write_all(bytes)?;
        Ok(())
    }

    fn get_download_url(&self, ref_name: &str) -> String {
        format!(
            "https://git.example.com/stub/archive/{}.zip",
            ref_name.strip_prefix('~').unwrap_or(ref_name)
        )
    }
}

/// Store wrapper whose `get_package` can be made to fail, for driving the
/// reconciler's load-failure path.
pub(crate) struct FlakyDb {
    pub(crate) inner: MemoryDb,
    fail_get: Mutex<bool>,
}

impl FlakyDb {
    pub(crate) fn new() -> Self {
        Self {
            inner: MemoryDb::new(),
            fail_get: Mutex::new(false),
        }
    }

    pub(crate) fn set_fail_get(&self, fail: bool) {
        *self.fail_get.lock().unwrap() = fail;
    }
}

impl DbController for FlakyDb {
    fn add_package(&self, package: &Package) -> petrel_db::Result<()> {
        self.inner.add_package(package)
    }

    fn remove_package(&self, name: &str, owner: &str) -> petrel_db::Result<()> {
        self.inner.remove_package(name, owner)
    }

    fn get_package(&self, name: &str) -> petrel_db::Result<Option<Package>> {
        if *self.fail_get.lock().unwrap() {
            return Err(DbError::Backend("connection reset".into()));
        }
        self.inner.get_package(name)
    }

    fn get_all_package_names(&self) -> petrel_db::Result<Vec<String>> {
        self.inner.get_all_package_names()
    }

    fn get_user_packages(&self, owner: &str) -> petrel_db::Result<Vec<PackageSummary>> {
        self.inner.get_user_packages(owner)
    }

    fn has_version(&self, name: &str, version: &str) -> petrel_db::Result<bool> {
        self.inner.has_version(name, version)
    }

    fn add_version(&self, name: &str, version: &PackageVersion) -> petrel_db::Result<()> {
        self.inner.add_version(name, version)
    }

    fn update_version(&self, name: &str, version: &PackageVersion) -> petrel_db::Result<()> {
        self.inner.update_version(name, version)
    }

    fn remove_version(&self, name: &str, version: &str) -> petrel_db::Result<()> {
        self.inner.remove_version(name, version)
    }

    fn has_branch(&self, name: &str, branch: &str) -> petrel_db::Result<bool> {
        self.inner.has_branch(name, branch)
    }

    fn add_branch(&self, name: &str, branch: &PackageVersion) -> petrel_db::Result<()> {
        self.inner.add_branch(name, branch)
    }

    fn update_branch(&self, name: &str, branch: &PackageVersion) -> petrel_db::Result<()> {
        self.inner.update_branch(name, branch)
    }

    fn remove_branch(&self, name: &str, branch: &str) -> petrel_db::Result<()> {
        self.inner.remove_branch(name, branch)
    }

    fn set_package_categories(&self, name: &str, categories: &[String]) -> petrel_db::Result<()> {
        self.inner.set_package_categories(name, categories)
    }

    fn set_package_errors(&self, name: &str, errors: &[String]) -> petrel_db::Result<()> {
        self.inner.set_package_errors(name, errors)
    }

    fn search_packages(&self, keywords: &[String]) -> petrel_db::Result<Vec<PackageSummary>> {
        self.inner.search_packages(keywords)
    }
}

/// Provider resolving every descriptor to the one shared stub.
pub(crate) struct StubProvider {
    repo: Arc<StubRepository>,
    fail: Mutex<bool>,
}

impl StubProvider {
    pub(crate) fn new(repo: Arc<StubRepository>) -> Self {
        Self {
            repo,
            fail: Mutex::new(false),
        }
    }

    pub(crate) fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

impl RepositoryProvider for StubProvider {
    fn open(&self, _remote: &RemoteRepository) -> petrel_vcs::Result<Box<dyn Repository>> {
        if *self.fail.lock().unwrap() {
            return Err(VcsError::HttpError {
                status: 503,
                url: "https://git.example.com/stub".into(),
            });
        }
        Ok(Box::new(StubHandle(Arc::clone(&self.repo))))
    }
}

/// A registry wired to a stub repository and the in-memory store.
pub(crate) struct TestSetup {
    pub(crate) registry: Registry,
    pub(crate) stub: Arc<StubRepository>,
    pub(crate) provider: Arc<StubProvider>,
    pub(crate) db: Arc<MemoryDb>,
}

impl TestSetup {
    pub(crate) fn new() -> Self {
        let db = Arc::new(MemoryDb::new());
        let stub = Arc::new(StubRepository::default());
        let provider = Arc::new(StubProvider::new(Arc::clone(&stub)));
        let registry = Registry::new(db.clone(), provider.clone());
        Self {
            registry,
            stub,
            provider,
            db,
        }
    }

    pub(crate) fn remote(&self) -> RemoteRepository {
        stub_remote()
    }
}
