//! Access decisions
//!
//! Pure predicates over a resolved [`Identity`]. Holding the `BVS_ADMIN`
//! global role bypasses all client-type scoping; everyone else is scoped to
//! the type of their primary (first) membership.

use bvs_types::{ClientType, GlobalRole, MembershipSummary, UserId};

/// Authenticated caller, as resolved from a bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub roles: Vec<String>,
    /// Primary membership first
    pub memberships: Vec<MembershipSummary>,
}

impl Identity {
    pub fn new(user_id: UserId, roles: Vec<String>, memberships: Vec<MembershipSummary>) -> Self {
        Self {
            user_id,
            roles,
            memberships,
        }
    }
}

/// Outcome of [`can_list_users`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// See every user
    Unrestricted,
    /// See users holding at least one membership of this type
    ScopedTo(ClientType),
    /// Not allowed to list at all
    Denied,
}

/// True iff the identity holds the admin role
pub fn is_admin(identity: &Identity) -> bool {
    has_admin_role(&identity.roles)
}

/// True iff any role name parses to [`GlobalRole::BvsAdmin`]. Unknown names are ignored.
pub fn has_admin_role(roles: &[String]) -> bool {
    roles
        .iter()
        .any(|role| matches!(role.parse::<GlobalRole>(), Ok(GlobalRole::BvsAdmin)))
}

/// Type of the first membership, if any
pub fn primary_client_type(identity: &Identity) -> Option<ClientType> {
    identity.memberships.first().map(|m| m.client_type)
}

/// Listing scope for the identity
pub fn can_list_users(identity: &Identity) -> ListScope {
    if is_admin(identity) {
        return ListScope::Unrestricted;
    }
    match primary_client_type(identity) {
        Some(client_type) => ListScope::ScopedTo(client_type),
        None => ListScope::Denied,
    }
}

/// Whether the identity may see a user holding `target_memberships`
pub fn can_view_user(identity: &Identity, target_memberships: &[MembershipSummary]) -> bool {
    if is_admin(identity) {
        return true;
    }
    match primary_client_type(identity) {
        Some(client_type) => target_memberships
            .iter()
            .any(|m| m.client_type == client_type),
        None => false,
    }
}

/// Create, update and delete are admin-only
pub fn can_mutate_users(identity: &Identity) -> bool {
    is_admin(identity)
}
