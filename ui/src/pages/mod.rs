pub mod not_found;
pub mod products;

pub use not_found::NotFoundPage;
pub use products::ProductsPage;
