pub mod batch;
pub mod hash_master;
pub mod misc;
pub mod session;
