pub mod calendar;
pub mod ledger;

pub use calendar::SlotCalendar;
pub use ledger::BookingLedger;
