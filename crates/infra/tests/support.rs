use std::sync::Arc;

use cadence_domain::{ActorId, InstructorId};
use cadence_infra::database::{DbManager, SqliteAccessPolicy, SqliteAvailabilityGateway};
use tempfile::TempDir;

pub const INSTRUCTOR: &str = "mem_cello_7";
pub const OWNER: &str = "usr_7";
pub const ORGANIZATION: &str = "org_conservatory";

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with migrations applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("cadence-test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("schema migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    pub fn gateway(&self) -> SqliteAvailabilityGateway {
        SqliteAvailabilityGateway::new(Arc::clone(&self.manager))
    }

    pub fn policy(&self) -> SqliteAccessPolicy {
        SqliteAccessPolicy::new(Arc::clone(&self.manager))
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

pub fn instructor() -> InstructorId {
    InstructorId::new(INSTRUCTOR)
}

pub fn owner() -> ActorId {
    ActorId::new(OWNER)
}
