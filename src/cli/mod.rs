//! Terminal front-end: one module per subcommand plus shared styling helpers

pub mod convert;
pub mod currencies;
pub mod form;
pub mod setup;
pub mod ui;
