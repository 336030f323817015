//! Restaurant module: domain, mapping, repository and service layers.
//!
//! The HTTP boundary talks to [`service::RestaurantService`] and to the
//! [`mapper`] functions only; persistence stays behind
//! [`repository::RestaurantRepository`].

pub mod domain;
pub mod dto;
pub mod mapper;
pub mod repo;
pub mod repository;
pub mod service;
pub mod uniqueness;

pub use service::{RestaurantService, UpdateOutcome};
