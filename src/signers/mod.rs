pub mod mock;
pub mod s3;
pub mod worker;
