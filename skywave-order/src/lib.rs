pub mod flow;
pub mod views;

pub use flow::{BookingFlow, FieldError, FlowError, FlowState, PassengerDetails};
pub use views::{BookingDashboard, BookingPartition};
