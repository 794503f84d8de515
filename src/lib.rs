#![doc = "The `taskdeck` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, authentication and session"]
#![doc = "mechanisms, routing configuration, and error handling for the taskdeck"]
#![doc = "API. It is used by the main binary (`main.rs`) to construct and run"]
#![doc = "the application, and by the integration tests to assemble the same"]
#![doc = "application in-process."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
