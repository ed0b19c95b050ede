pub mod pools;
pub mod worker;
