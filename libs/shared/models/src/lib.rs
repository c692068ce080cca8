pub mod auth;
pub mod clinic;
pub mod error;

pub use auth::{Principal, Role};
pub use clinic::{
    BookedSlotWithDoctor, Doctor, DoctorId, NewDoctor, Slot, SlotFilter, SlotId, SlotState,
    SlotTime, SlotTimeParseError,
};
pub use error::AppError;
