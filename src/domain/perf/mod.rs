//! Perfherder graph domain: models, payload DTOs and services.

pub mod dto;
pub mod error;
pub mod model;
pub mod service;
