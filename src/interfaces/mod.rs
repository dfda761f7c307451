//! Outer surfaces: CSV account tables and payment output, form scripts and
//! the rendered view model.

pub mod csv;
pub mod script;
pub mod view;
