//! The playlist-exchange flow: pick songs, register the playlist, then use
//! the issued code to read reviews and browse exchanged playlists.

pub mod catalog;
pub mod error;
pub mod exchange;
pub mod identity;
pub mod recommend;
pub mod review;
pub mod selector;
pub mod submit;
