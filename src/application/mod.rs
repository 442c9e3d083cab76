//! Application services layer.

pub mod chrome;
pub mod error;
pub mod feed;
pub mod listing;
pub mod matcher;
pub mod metadata;
pub mod navigation;
pub mod pagination;
pub mod preview;
pub mod repos;
pub mod site;
