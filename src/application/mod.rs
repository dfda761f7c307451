//! Application layer orchestrating the payment form.
//!
//! `FormController` is a pure reducer over form state and user events. It
//! returns side-effect commands instead of performing them. `FormSession` runs
//! those commands on the `tokio` runtime and feeds their settlements back in as
//! events, so all state changes happen on one task.

pub mod controller;
pub mod iban;
pub mod session;
