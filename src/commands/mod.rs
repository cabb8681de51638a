pub mod extract;
pub mod label;
pub mod process;
pub mod show;
