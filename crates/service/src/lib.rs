//! Service layer holding the restaurant lifecycle rules on top of models.
//! - Separates business logic from data access through `RestaurantRepository`.
//! - Owns the DTO mapping and validation contract used by the HTTP boundary.
//! - Provides a closed error taxonomy the boundary renders.

pub mod errors;
pub mod restaurant;
#[cfg(test)]
pub mod test_support;
