pub mod poems;
pub mod shares;
