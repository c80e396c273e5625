pub mod code;
pub mod error;
pub mod labels;
pub mod song;
