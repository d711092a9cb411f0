pub mod addons;
pub mod airports;
pub mod connection;
pub mod migrate;
pub mod schema;
