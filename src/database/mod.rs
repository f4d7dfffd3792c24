pub mod id_manager;
pub use id_manager::*;

pub mod config;
pub use config::*;

pub mod row;
pub use row::*;

pub mod collection;
pub use collection::*;

pub mod db;
pub use db::*;

pub mod schema;
pub use schema::*;
