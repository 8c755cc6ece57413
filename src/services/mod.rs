pub mod archive;
pub mod cleanup;
pub mod storage;
