//! Controladores
//!
//! Orquestan servicios y repositorios para cada endpoint.

pub mod directory_controller;
pub mod machine_controller;

pub use directory_controller::DirectoryController;
pub use machine_controller::MachineController;
