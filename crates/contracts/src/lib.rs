//! Wire types shared between the ambulance-management backend and its clients.

pub mod dashboards;
pub mod domain;
pub mod enums;
pub mod shared;
pub mod system;
