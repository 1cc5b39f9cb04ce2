//! Identity types threaded through every availability operation
//!
//! The core performs no authorization itself. An identity gateway resolves
//! the actor's capability once, and the resulting [`EditContext`] is passed
//! explicitly into each entry point.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::impl_label_conversions;

/// Organization-scoped membership that owns one weekly availability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstructorId(String);

impl InstructorId {
    /// Wrap an opaque membership id. No format is enforced.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw id, as stored and sent over the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstructorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstructorId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The authenticated user performing an edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Wrap an opaque user id.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the actor may do with the instructor's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorCapability {
    /// The instructor editing their own hours.
    Owner,
    /// An administrator of the instructor's organization.
    OrganizationAdmin,
    /// Anyone else: may read, may not write.
    ViewOnly,
}

impl_label_conversions!(ActorCapability {
    Owner => "owner",
    OrganizationAdmin => "organization_admin",
    ViewOnly => "view_only",
});

impl ActorCapability {
    /// Owners and organization admins may write; viewers may not.
    pub const fn can_edit(self) -> bool {
        matches!(self, Self::Owner | Self::OrganizationAdmin)
    }
}

/// Explicit scope for one editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditContext {
    /// Whose week is being edited.
    pub instructor_id: InstructorId,
    /// Who is editing it.
    pub actor_id: ActorId,
    /// Resolved once when the session opens.
    pub capability: ActorCapability,
}

impl EditContext {
    pub fn new(instructor_id: InstructorId, actor_id: ActorId, capability: ActorCapability) -> Self {
        Self { instructor_id, actor_id, capability }
    }

    /// Shorthand for `self.capability.can_edit()`.
    pub const fn can_edit(&self) -> bool {
        self.capability.can_edit()
    }
}
