pub mod accounts;
pub mod domain;
pub mod error;
pub mod ports;
pub mod reading_list;

#[cfg(test)]
mod testing;

pub use accounts::{is_valid_password, Accounts};
pub use domain::{
    AuthSession, NewPaper, PaperId, PaperSummary, ReadingStatus, SavedPaper, SessionUser, User,
    UserCredentials, UserId,
};
pub use error::{ShelfError, ShelfResult};
pub use ports::{DatabaseService, PaperSourceService, PasswordHasherService, PortError, PortResult};
pub use reading_list::ReadingList;
