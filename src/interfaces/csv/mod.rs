pub mod account_reader;
pub mod payment_writer;
