/// Static role → permission table
///
/// Every workspace member holds exactly one [`RoleName`]. What a role may do is
/// decided here, in code, and nowhere else: the `roles` table only exists so
/// that `members.role_id` has something to reference. The permission array
/// stored on each row is written once at seed time and is informational.
///
/// # Example
///
/// ```
/// use workboard_shared::auth::permissions::{permissions_of, Permission, PermissionSet, RoleName};
///
/// let member = RoleName::Member.permissions();
/// assert!(member.contains(Permission::CreateTask));
/// assert!(!member.contains(Permission::DeleteTask));
///
/// // Unknown role names carry no permissions at all
/// assert!(permissions_of("GUEST").is_empty());
///
/// // ANY-of: one shared permission is enough
/// let required = PermissionSet::from_slice(&[Permission::CreateTask, Permission::DeleteTask]);
/// assert!(member.intersects(required));
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Atomic capability flag checked by the authorization gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    CreateWorkspace,
    DeleteWorkspace,
    EditWorkspace,
    ManageWorkspaceSettings,
    AddMember,
    ChangeMemberRole,
    RemoveMember,
    CreateProject,
    EditProject,
    DeleteProject,
    CreateTask,
    EditTask,
    DeleteTask,
    ViewOnly,
}

impl Permission {
    /// All permissions, in declaration order
    pub const ALL: [Permission; 14] = [
        Permission::CreateWorkspace,
        Permission::DeleteWorkspace,
        Permission::EditWorkspace,
        Permission::ManageWorkspaceSettings,
        Permission::AddMember,
        Permission::ChangeMemberRole,
        Permission::RemoveMember,
        Permission::CreateProject,
        Permission::EditProject,
        Permission::DeleteProject,
        Permission::CreateTask,
        Permission::EditTask,
        Permission::DeleteTask,
        Permission::ViewOnly,
    ];

    /// Wire/storage name (e.g. `CREATE_TASK`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CreateWorkspace => "CREATE_WORKSPACE",
            Permission::DeleteWorkspace => "DELETE_WORKSPACE",
            Permission::EditWorkspace => "EDIT_WORKSPACE",
            Permission::ManageWorkspaceSettings => "MANAGE_WORKSPACE_SETTINGS",
            Permission::AddMember => "ADD_MEMBER",
            Permission::ChangeMemberRole => "CHANGE_MEMBER_ROLE",
            Permission::RemoveMember => "REMOVE_MEMBER",
            Permission::CreateProject => "CREATE_PROJECT",
            Permission::EditProject => "EDIT_PROJECT",
            Permission::DeleteProject => "DELETE_PROJECT",
            Permission::CreateTask => "CREATE_TASK",
            Permission::EditTask => "EDIT_TASK",
            Permission::DeleteTask => "DELETE_TASK",
            Permission::ViewOnly => "VIEW_ONLY",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// A name that is not part of the fixed enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown name: {0}")]
pub struct UnknownName(pub String);

/// Set of permissions backed by a bit mask
///
/// Copyable and allocation-free so the gate's check stays O(1).
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PermissionSet(u16);

impl PermissionSet {
    /// The empty set (an endpoint with no requirement)
    pub const EMPTY: PermissionSet = PermissionSet(0);

    /// Builds a set from a slice; usable in `const` tables
    pub const fn from_slice(permissions: &[Permission]) -> Self {
        let mut bits = 0u16;
        let mut i = 0;
        while i < permissions.len() {
            bits |= permissions[i].bit();
            i += 1;
        }
        PermissionSet(bits)
    }

    /// Single-permission set
    pub const fn only(permission: Permission) -> Self {
        PermissionSet(permission.bit())
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, permission: Permission) -> bool {
        self.0 & permission.bit() != 0
    }

    /// True when the two sets share at least one permission
    ///
    /// This is the ANY-of rule the gate applies: a caller holding a single
    /// one of the required permissions is admitted.
    pub const fn intersects(&self, other: PermissionSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates members in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::ALL.into_iter().filter(|p| self.contains(*p))
    }

    /// Storage form used for the `roles.permissions` column
    pub fn to_names(&self) -> Vec<String> {
        self.iter().map(|p| p.as_str().to_string()).collect()
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        PermissionSet(iter.into_iter().fold(0, |bits, p| bits | p.bit()))
    }
}

/// Fixed set of workspace roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "role_name", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleName {
    /// Creator of the workspace; holds every permission
    Owner,

    /// Manages projects, tasks and workspace settings
    Admin,

    /// Works on tasks; read access to everything else
    Member,
}

const OWNER_PERMISSIONS: PermissionSet = PermissionSet::from_slice(&Permission::ALL);

const ADMIN_PERMISSIONS: PermissionSet = PermissionSet::from_slice(&[
    Permission::AddMember,
    Permission::CreateProject,
    Permission::EditProject,
    Permission::DeleteProject,
    Permission::CreateTask,
    Permission::EditTask,
    Permission::DeleteTask,
    Permission::ManageWorkspaceSettings,
    Permission::ViewOnly,
]);

const MEMBER_PERMISSIONS: PermissionSet = PermissionSet::from_slice(&[
    Permission::ViewOnly,
    Permission::CreateTask,
    Permission::EditTask,
]);

impl RoleName {
    /// All roles, in seeding order
    pub const ALL: [RoleName; 3] = [RoleName::Owner, RoleName::Admin, RoleName::Member];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Owner => "OWNER",
            RoleName::Admin => "ADMIN",
            RoleName::Member => "MEMBER",
        }
    }

    /// Permission set granted to this role
    pub const fn permissions(&self) -> PermissionSet {
        match self {
            RoleName::Owner => OWNER_PERMISSIONS,
            RoleName::Admin => ADMIN_PERMISSIONS,
            RoleName::Member => MEMBER_PERMISSIONS,
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleName::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// Looks up the permissions of a role by name
///
/// Pure and side-effect free. Names outside the fixed enumeration map to the
/// empty set, so they can never satisfy a requirement.
pub fn permissions_of(role_name: &str) -> PermissionSet {
    role_name
        .parse::<RoleName>()
        .map(|role| role.permissions())
        .unwrap_or(PermissionSet::EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_holds_every_permission() {
        let owner = RoleName::Owner.permissions();
        assert_eq!(owner.len(), Permission::ALL.len());
        for permission in Permission::ALL {
            assert!(owner.contains(permission), "owner lacks {}", permission);
        }
    }

    #[test]
    fn test_admin_permissions() {
        let admin = RoleName::Admin.permissions();
        assert_eq!(admin.len(), 9);
        assert!(admin.contains(Permission::ManageWorkspaceSettings));
        assert!(admin.contains(Permission::DeleteTask));
        assert!(admin.contains(Permission::AddMember));
        assert!(!admin.contains(Permission::DeleteWorkspace));
        assert!(!admin.contains(Permission::ChangeMemberRole));
        assert!(!admin.contains(Permission::RemoveMember));
        assert!(!admin.contains(Permission::EditWorkspace));
    }

    #[test]
    fn test_member_permissions() {
        let member = RoleName::Member.permissions();
        let expected = PermissionSet::from_slice(&[
            Permission::ViewOnly,
            Permission::CreateTask,
            Permission::EditTask,
        ]);
        assert_eq!(member, expected);
    }

    #[test]
    fn test_permissions_of_by_name() {
        assert_eq!(permissions_of("OWNER"), RoleName::Owner.permissions());
        assert_eq!(permissions_of("ADMIN"), RoleName::Admin.permissions());
        assert_eq!(permissions_of("MEMBER"), RoleName::Member.permissions());
    }

    #[test]
    fn test_permissions_of_unknown_role_is_empty() {
        assert!(permissions_of("GUEST").is_empty());
        assert!(permissions_of("owner").is_empty());
        assert!(permissions_of("").is_empty());
    }

    #[test]
    fn test_intersects_is_any_of() {
        let member = RoleName::Member.permissions();

        assert!(!member.intersects(PermissionSet::only(Permission::DeleteTask)));
        assert!(member.intersects(PermissionSet::from_slice(&[
            Permission::CreateTask,
            Permission::DeleteTask,
        ])));
        assert!(!member.intersects(PermissionSet::EMPTY));
    }

    #[test]
    fn test_permission_names_parse_back() {
        for permission in Permission::ALL {
            assert_eq!(permission.as_str().parse::<Permission>(), Ok(permission));
        }
        assert!("DELETE_EVERYTHING".parse::<Permission>().is_err());
    }

    #[test]
    fn test_to_names_uses_storage_form() {
        let names = RoleName::Member.permissions().to_names();
        assert_eq!(names, vec!["CREATE_TASK", "EDIT_TASK", "VIEW_ONLY"]);
    }

    #[test]
    fn test_permission_serde_form() {
        let json = serde_json::to_string(&Permission::ManageWorkspaceSettings).unwrap();
        assert_eq!(json, "\"MANAGE_WORKSPACE_SETTINGS\"");
        let json = serde_json::to_string(&RoleName::Admin).unwrap();
        assert_eq!(json, "\"ADMIN\"");
    }
}
