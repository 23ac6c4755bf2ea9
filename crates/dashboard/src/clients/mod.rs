pub mod document_client;
pub mod entity_client;
pub mod user_client;

pub use document_client::DocumentClient;
pub use entity_client::EntityClient;
pub use user_client::UserClient;
