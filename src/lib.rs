#![doc = "The `todo-api` library crate."]
#![doc = ""]
#![doc = "Credential issue and verification, the ownership guard, domain models,"]
#![doc = "persistence seams, routing and error handling for the multi-user to-do API."]
#![doc = "The binary (`main.rs`) wires these together with a PostgreSQL pool."]

pub mod auth;
pub mod config;
pub mod cors;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
