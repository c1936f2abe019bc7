pub mod config;
pub mod logging;

pub mod error;
pub mod fetch;
pub mod input;
pub mod ledger;
pub mod pipeline;
pub mod storage;
pub mod url_model;
