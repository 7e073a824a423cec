pub mod directory_routes;
pub mod machine_routes;
