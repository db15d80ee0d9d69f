//! Infrastructure layer - exchange API, storage and mail adapters

pub mod exchange;
pub mod mail;
pub mod storage;
