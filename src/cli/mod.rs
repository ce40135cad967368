use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::playlists::PlaylistStore;
use crate::resolver::{RecommendationResolver, SearchResolver};

#[derive(Parser)]
#[command(name = "tunedeck")]
#[command(version = "0.1")]
#[command(about = "Multi-source music search, recommendations and stream resolution")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve,
    /// Search all configured sources for tracks
    Search {
        /// Free-text query
        query: String,
    },
    /// Fetch "more like this" recommendations
    Recommend {
        /// Track id to seed related-video lookup
        #[arg(long)]
        id: Option<String>,
        /// Track title to seed a search-based fallback
        #[arg(long)]
        title: Option<String>,
    },
    /// Manage stored playlists
    Playlist {
        #[command(subcommand)]
        command: PlaylistCommands,
    },
}

#[derive(Subcommand)]
pub enum PlaylistCommands {
    /// List playlists and their tracks
    List,
    /// Create an empty playlist
    Create { name: String },
    /// Delete a playlist by name or id
    Delete { name: String },
    /// Search and add the top hit to a playlist
    Add {
        name: String,
        /// Free-text query; the first result is stored
        query: String,
    },
    /// Remove a track from a playlist by track id
    Remove { name: String, track_id: String },
}

/// Entrypoint for CLI
pub fn run() {
    env_logger::init();

    let cli = Cli::parse();

    let cfg = Config::load(cli.config.to_str().unwrap()).unwrap();

    match &cli.command {
        Commands::Serve => {
            if cfg.sources.credentialed() {
                println!("Starting HTTP server (credentialed video source enabled)...");
            } else {
                println!("Starting HTTP server (mirror cascade only)...");
            }

            let server = crate::http::server::HttpServer::new(
                SearchResolver::from_config(&cfg.sources),
                RecommendationResolver::from_config(&cfg.sources),
                cfg.http,
            );

            println!(
                "HTTP server running at http://{}:{}",
                server.config.bind_addr, server.config.port
            );
            server.run();
        }

        Commands::Search { query } => {
            let resolver = SearchResolver::from_config(&cfg.sources);
            let outcome = resolver.search(query);

            if let Some(counts) = &outcome.counts {
                println!(
                    "Found {} tracks ({} iTunes, {} YouTube):",
                    outcome.tracks.len(),
                    counts.itunes,
                    counts.youtube
                );
            } else {
                println!("Found {} tracks:", outcome.tracks.len());
            }

            print_tracks(&outcome.tracks);

            if let Some(advisory) = &outcome.advisory {
                println!("{advisory}");
            }
        }

        Commands::Recommend { id, title } => {
            let resolver = RecommendationResolver::from_config(&cfg.sources);
            let tracks = resolver.recommend(id.as_deref(), title.as_deref());

            if tracks.is_empty() {
                println!("No recommendations found.");
            } else {
                println!("Recommendations:");
                print_tracks(&tracks);
            }
        }

        Commands::Playlist { command } => {
            let mut store = PlaylistStore::open(&cfg.playlists.path);

            match command {
                PlaylistCommands::List => {
                    for playlist in store.playlists() {
                        println!("{} ({} tracks, id {})", playlist.name, playlist.tracks.len(), playlist.id);
                        for track in &playlist.tracks {
                            println!("    {}", describe(track));
                        }
                    }
                }

                PlaylistCommands::Create { name } => {
                    let playlist = store.create(name).unwrap();
                    println!("Created playlist {} (id {})", playlist.name, playlist.id);
                }

                PlaylistCommands::Delete { name } => {
                    if store.delete(name).unwrap() {
                        println!("Deleted playlist {name}");
                    } else {
                        println!("No playlist named {name}");
                    }
                }

                PlaylistCommands::Add { name, query } => {
                    let resolver = SearchResolver::from_config(&cfg.sources);
                    let outcome = resolver.search(query);

                    match outcome.tracks.into_iter().next() {
                        Some(track) => {
                            let added = store.add_track(name, track.clone()).unwrap();
                            if added {
                                println!("Added to {name}: {}", describe(&track));
                            } else {
                                println!("Already in {name}: {}", describe(&track));
                            }
                        }
                        None => println!("No results for {query:?}"),
                    }
                }

                PlaylistCommands::Remove { name, track_id } => {
                    if store.remove_track(name, track_id).unwrap() {
                        println!("Removed {track_id} from {name}");
                    } else {
                        println!("{track_id} is not in {name}");
                    }
                }
            }
        }
    }
}

fn describe(track: &crate::domain::track::Track) -> String {
    format!(
        "{} - {} [{}] ({}, {})",
        track.artist, track.title, track.duration, track.source, track.id
    )
}

fn print_tracks(tracks: &[crate::domain::track::Track]) {
    for track in tracks {
        println!("    {}", describe(track));
        println!("        {}", track.url);
    }
}
