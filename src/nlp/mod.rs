pub mod entities;
pub mod intent;
pub mod sentiment;
pub mod topics;
