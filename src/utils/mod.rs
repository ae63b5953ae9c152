pub mod collect;
pub mod log;
