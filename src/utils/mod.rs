pub(crate) mod auth;
pub(crate) mod benchmark;
pub(crate) mod extract;
pub(crate) mod keywords;
