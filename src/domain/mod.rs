//! Domain types and rules of the payment form, free of any I/O.

pub mod account;
pub mod form;
pub mod iban;
pub mod ports;
pub mod schema;
