//! The single authorization rule: an account may only act on records it owns.

/// Returns `true` iff `authenticated` names the same account as `resource_owner`.
///
/// Plain string equality: case-sensitive, no roles, no delegation. An empty
/// identity never owns anything. Pure; callers turn `false` into a
/// forbidden response.
pub fn owns(authenticated: &str, resource_owner: &str) -> bool {
    !authenticated.is_empty() && authenticated == resource_owner
}
