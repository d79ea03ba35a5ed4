pub mod arxiv;
pub mod db;
pub mod password;

pub use arxiv::ArxivAdapter;
pub use db::DbAdapter;
pub use password::Argon2Hasher;
