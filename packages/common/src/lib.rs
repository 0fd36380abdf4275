pub mod secrets;
pub mod storage;
