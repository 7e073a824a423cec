//! Repositorios
//!
//! Envoltorios tipados sobre el gateway, uno por tabla.

pub mod machine_repository;
pub mod party_repository;
pub mod rental_repository;

pub use machine_repository::{MachineRepository, ModelRepository};
pub use party_repository::{CustomerRepository, OperatorRepository};
pub use rental_repository::RentalRepository;
