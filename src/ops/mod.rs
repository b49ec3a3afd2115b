pub mod clock;
pub mod sort;
pub mod store;
pub mod summary;
