pub mod artist;
pub mod duration;
pub mod track;
