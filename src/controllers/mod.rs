pub(crate) mod creator;
pub(crate) mod rates;
pub(crate) mod search;
pub(crate) mod upload;
pub(crate) mod user;
pub(crate) mod wishlist;
