pub mod errors;
pub mod openapi;
pub mod restaurants;
pub mod routes;
pub mod startup;
