pub(crate) mod auth;
pub(crate) mod brand;
pub(crate) mod creator;
pub(crate) mod router;
pub(crate) mod upload;
