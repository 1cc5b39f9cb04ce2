//! Membership-backed implementation of the `AccessPolicy` port.
//!
//! An actor owns the instructor membership they were registered with and may
//! always edit it. Admins of the instructor's organization may edit too.
//! Everyone else is view-only.

use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::AccessPolicy;
use cadence_domain::{ActorCapability, ActorId, CadenceError, InstructorId, Result};
use rusqlite::{params, OptionalExtension};
use tokio::task;

use super::manager::{map_sql_error, DbManager};
use crate::errors::InfraError;

/// Role an actor holds within an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipRole {
    Admin,
    Member,
}

impl MembershipRole {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

/// SQLite access policy.
pub struct SqliteAccessPolicy {
    db: Arc<DbManager>,
}

impl SqliteAccessPolicy {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Register (or re-register) who owns an instructor membership and which
    /// organization it belongs to. The stored timezone is left untouched.
    pub async fn register_instructor(
        &self,
        instructor: &InstructorId,
        owner: &ActorId,
        organization: &str,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);
        let instructor = instructor.clone();
        let owner = owner.clone();
        let organization = organization.to_owned();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO instructors (id, owner_actor_id, organization_id) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                     owner_actor_id = excluded.owner_actor_id,
                     organization_id = excluded.organization_id",
                params![instructor.as_str(), owner.as_str(), organization],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(|e| CadenceError::from(InfraError::from(e)))?
    }

    /// Grant `actor` a role in `organization`, replacing any previous role.
    pub async fn add_membership(
        &self,
        actor: &ActorId,
        organization: &str,
        role: MembershipRole,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);
        let actor = actor.clone();
        let organization = organization.to_owned();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO memberships (actor_id, organization_id, role) VALUES (?1, ?2, ?3)
                 ON CONFLICT(actor_id, organization_id) DO UPDATE SET role = excluded.role",
                params![actor.as_str(), organization, role.as_str()],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(|e| CadenceError::from(InfraError::from(e)))?
    }
}

#[async_trait]
impl AccessPolicy for SqliteAccessPolicy {
    async fn resolve_capability(
        &self,
        actor: &ActorId,
        instructor: &InstructorId,
    ) -> Result<ActorCapability> {
        let db = Arc::clone(&self.db);
        let actor = actor.clone();
        let instructor = instructor.clone();

        task::spawn_blocking(move || -> Result<ActorCapability> {
            let conn = db.get_connection()?;
            let row = conn
                .query_row(
                    "SELECT owner_actor_id, organization_id FROM instructors WHERE id = ?1",
                    params![instructor.as_str()],
                    |row| Ok((row.get::<_, Option<String>>(0)?, row.get::<_, Option<String>>(1)?)),
                )
                .optional()
                .map_err(map_sql_error)?;

            let Some((owner, organization)) = row else {
                return Ok(ActorCapability::ViewOnly);
            };
            if owner.as_deref() == Some(actor.as_str()) {
                return Ok(ActorCapability::Owner);
            }
            let Some(organization) = organization else {
                return Ok(ActorCapability::ViewOnly);
            };

            let role = conn
                .query_row(
                    "SELECT role FROM memberships WHERE actor_id = ?1 AND organization_id = ?2",
                    params![actor.as_str(), organization],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .map_err(map_sql_error)?;

            Ok(match role.as_deref() {
                Some("admin") => ActorCapability::OrganizationAdmin,
                _ => ActorCapability::ViewOnly,
            })
        })
        .await
        .map_err(|e| CadenceError::from(InfraError::from(e)))?
    }
}
