//! Infrastructure layer: auth, storage backends, services, mapping, logging

pub mod auth;
pub mod logging;
pub mod mapping;
pub mod memory;
pub mod services;
pub mod storage;
