//! Types shared between the HR backend and its clients.

pub mod domain;
pub mod usecases;
