// Vehicle showroom backend: catalog browsing with filtering, sorting and a bounded
// comparison list, served over HTTP.

pub mod catalog;
pub mod compare;
pub mod config;
pub mod error;
pub mod filter;
pub mod inventory;
pub mod models;
pub mod persistence;
pub mod routes;
pub mod session;
pub mod sort;
