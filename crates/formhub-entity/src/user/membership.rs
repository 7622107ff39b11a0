//! Group memberships embedded in a user.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use formhub_core::AppError;
use formhub_core::types::GroupId;

use crate::role::Role;

/// A user's assignment to one group with a set of role keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    /// The group.
    pub group_id: GroupId,
    /// Role keys held in that group.
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl Membership {
    /// Create a membership.
    pub fn new<I, S>(group_id: GroupId, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group_id,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// The ordered membership list of a user, replaced as a whole.
///
/// Stored as a plain array. Deserialization runs the same checks as
/// [`Memberships::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Membership>", into = "Vec<Membership>")]
pub struct Memberships(Vec<Membership>);

impl TryFrom<Vec<Membership>> for Memberships {
    type Error = AppError;

    fn try_from(items: Vec<Membership>) -> Result<Self, Self::Error> {
        Self::new(items)
    }
}

impl From<Memberships> for Vec<Membership> {
    fn from(memberships: Memberships) -> Self {
        memberships.0
    }
}

impl Memberships {
    /// Build a validated membership list.
    ///
    /// Rejects duplicate groups and reserved role keys.
    pub fn new(items: Vec<Membership>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for membership in &items {
            if !seen.insert(membership.group_id) {
                return Err(AppError::validation(format!(
                    "Group {} appears more than once",
                    membership.group_id
                )));
            }
            if let Some(reserved) = membership.roles.iter().find(|r| Role::is_reserved(r)) {
                return Err(AppError::validation(format!(
                    "Role '{reserved}' cannot be assigned through a membership"
                )));
            }
        }
        Ok(Self(items))
    }

    /// An empty list.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Role keys held in `group_id`, if the user is a member.
    pub fn roles_for(&self, group_id: GroupId) -> Option<&BTreeSet<String>> {
        self.0
            .iter()
            .find(|m| m.group_id == group_id)
            .map(|m| &m.roles)
    }

    /// Whether the user belongs to `group_id`.
    pub fn contains(&self, group_id: GroupId) -> bool {
        self.roles_for(group_id).is_some()
    }

    /// Group ids in order.
    pub fn group_ids(&self) -> Vec<GroupId> {
        self.0.iter().map(|m| m.group_id).collect()
    }

    /// Iterate the memberships.
    pub fn iter(&self) -> impl Iterator<Item = &Membership> {
        self.0.iter()
    }

    /// Number of memberships.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no memberships.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
