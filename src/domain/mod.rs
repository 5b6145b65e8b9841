pub mod catalog_handle;
pub mod models;
pub mod traits;
pub mod value_objects;

pub use catalog_handle::CatalogHandle;
