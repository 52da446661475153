mod http_contact_repository;
mod store_contact_repository;
mod traits;

pub use http_contact_repository::HttpContactRepository;
pub use store_contact_repository::StoreContactRepository;
pub use traits::ContactRepository;
