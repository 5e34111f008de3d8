pub mod clock;
pub mod ids;
pub mod password;
pub mod storage;
