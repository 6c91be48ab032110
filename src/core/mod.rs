pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod pipeline;
pub(crate) mod state;
pub(crate) mod storage;
pub(crate) mod store;
