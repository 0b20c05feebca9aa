pub mod index;
pub mod pdf;
pub mod summary;
pub mod upload;
