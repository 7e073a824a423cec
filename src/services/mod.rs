//! Services module
//!
//! Este módulo contiene la lógica de negocio: la resolución del estado de
//! una máquina y el workflow de transiciones (checkout, check-in, mantenimiento).

pub mod rental_workflow;
pub mod status_resolver;

pub use rental_workflow::RentalWorkflow;
pub use status_resolver::StatusResolver;
