use crate::error::AppError;

pub type ServiceResult<T> = Result<T, AppError>;

pub mod init_coordinator;
pub mod progress;
pub mod severity;
pub mod titles_table;

pub use init_coordinator::{InitCoordinator, InitEvents, InitObserver};
pub use progress::ProgressState;
pub use titles_table::{Cell, CellValue, Column, TitlesTable};
