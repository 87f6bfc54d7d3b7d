#[macro_use]
extern crate rocket;

pub mod catchers;
pub mod configuration;
pub mod domain;
pub mod oauth;
pub mod port_saver;
pub mod profile;
pub mod push;
pub mod routes;
pub mod startup;
pub mod telemetry;
