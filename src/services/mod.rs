//! Service layer: catalog filtering and build orchestration.

pub mod build;
pub mod catalog;

pub use build::BuildService;
pub use catalog::CatalogService;
