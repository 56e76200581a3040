//! Ambulance management backend: dispatch, fleet, patients, inspections,
//! maintenance and reports over a JSON API.

pub mod dashboards;
pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
