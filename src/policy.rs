use crate::models::User;

/// Requirement
///
/// Access level a route or action is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    Admin,
}

/// Denial
///
/// Why access was refused. The two cases send the client to different places:
/// no session goes to the login page, a session without the admin role goes to
/// the regular dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    LoginRequired,
    AdminRequired,
}

impl Denial {
    pub fn redirect_target(self) -> &'static str {
        match self {
            Denial::LoginRequired => "/login",
            Denial::AdminRequired => "/dashboard",
        }
    }
}

/// authorize
///
/// The single access decision used by the extractors and the item repository.
pub fn authorize(user: Option<&User>, requirement: Requirement) -> Result<(), Denial> {
    match (requirement, user) {
        (Requirement::Public, _) => Ok(()),
        (_, None) => Err(Denial::LoginRequired),
        (Requirement::Authenticated, Some(_)) => Ok(()),
        (Requirement::Admin, Some(u)) if u.is_admin() => Ok(()),
        (Requirement::Admin, Some(_)) => Err(Denial::AdminRequired),
    }
}

/// Only administrators may move an item through its lifecycle, regardless of who reported it.
pub fn can_update_status(user: &User) -> bool {
    authorize(Some(user), Requirement::Admin).is_ok()
}
