#[macro_use]
pub mod macros;

pub mod catalog;
pub mod config;
pub mod episode_list_parser;
pub mod filename;
pub mod fs_util;
pub mod gaps;
pub mod inventory;
pub mod markup;
pub mod reconcile;
pub mod refresh;
pub mod schema;
