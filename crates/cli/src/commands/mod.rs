//! CLI subcommands.

pub mod inspect;
pub mod payment;
pub mod quote;
