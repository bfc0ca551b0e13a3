//! Domain records exchanged with the Heaven Connect backend.

pub mod booking;
pub mod issue;
pub mod status;
pub mod training;
pub mod types;
pub mod user;
