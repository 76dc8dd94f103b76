pub mod flow;
pub mod session;

pub use flow::{BookingFlow, ProfileSelector, RequestTicket};
pub use session::BookingService;
