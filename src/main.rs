use crate::cli::run;

pub mod cli;
mod config;
pub mod domain;
pub mod http;
pub mod player;
pub mod playlists;
pub mod resolver;
pub mod sources;

fn main() {
    run();
}
