/// Router Module Index
///
/// Routes are grouped by the access level they require, and each group gets its
/// guard as a layer in `create_router`, so a handler cannot end up exposed by accident.

/// Routes open to anonymous clients: health, login/registration and the item listing.
pub mod public;

/// Routes that need a valid session (`AuthUser`).
pub mod authenticated;

/// Routes restricted to the 'admin' role, nested under `/admin`.
pub mod admin;
