//! The static role catalog.

use std::collections::HashMap;

use formhub_entity::role::{Permission, PermissionSet, Role, RoleStatus};

/// Role keys to permission bundles.
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    roles: HashMap<String, Role>,
}

impl RoleCatalog {
    /// The built-in catalog.
    pub fn standard() -> Self {
        use Permission::*;

        let manager: PermissionSet = Permission::ALL
            .into_iter()
            .filter(Permission::is_group_scoped)
            .chain([GroupView, UserView])
            .collect();

        Self::from_roles([
            role("Viewer", "Viewer", [FormView, FormdataView]),
            role("Operator", "Operator", [FormdataEdit]),
            role("Submitter", "Submitter", [FormView, FormdataCreate]),
            role("Editor", "Editor", [FormView, FormCreate, FormEdit, FormdataView]),
            role("Publisher", "Publisher", [FormView, FormEdit, FormPublish]),
            Role {
                key: "Manager".into(),
                name: "Manager".into(),
                status: RoleStatus::Active,
                permissions: manager,
            },
        ])
    }

    /// A catalog built from explicit roles.
    pub fn from_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().map(|r| (r.key.clone(), r)).collect(),
        }
    }

    /// Look up a role by key.
    pub fn get(&self, key: &str) -> Option<&Role> {
        self.roles.get(key)
    }

    /// Whether `key` names a role in the catalog.
    pub fn contains(&self, key: &str) -> bool {
        self.roles.contains_key(key)
    }

    /// Every role, sorted by key.
    pub fn roles(&self) -> Vec<&Role> {
        let mut roles: Vec<&Role> = self.roles.values().collect();
        roles.sort_by(|a, b| a.key.cmp(&b.key));
        roles
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn role<const N: usize>(key: &str, name: &str, permissions: [Permission; N]) -> Role {
    Role {
        key: key.into(),
        name: name.into(),
        status: RoleStatus::Active,
        permissions: permissions.into_iter().collect(),
    }
}
