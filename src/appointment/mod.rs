//! Per-slot booking flow: the modes a slot moves through, the controller
//! driving them, and the view derived from both.

pub mod mode;
pub mod controller;
pub mod view;

pub use mode::{Action, Mode};
pub use controller::{MutationRequest, MutationResolved, PendingMutation, SlotController, Ticket};
pub use view::{render, AppointmentView, InterviewerChoice, SlotView};
