//! # facefinder - Nearest Face Lookup
//!
//! facefinder stores face descriptors (race, emotion and oldness levels) in a
//! single SQLite table and, for a query face, returns the most similar stored
//! faces by Euclidean distance. New faces are stored on the way.
//!
//! The search is a plain linear scan over an in-memory cache that is loaded
//! from storage on the first lookup.
//!
//! ## Example
//!
//! ```
//! use facefinder::{Face, FaceFinder, SqliteStore};
//!
//! let mut finder = FaceFinder::new(SqliteStore::open_in_memory().unwrap());
//!
//! // New faces (id 0) get stored and come back first
//! finder.resolve(&Face::new(1, 200, 500).unwrap()).unwrap();
//! let faces = finder.resolve(&Face::new(55, 100, 999).unwrap()).unwrap();
//! assert_eq!(faces.len(), 2);
//! assert_eq!(faces[0].id(), 2);
//!
//! // Known faces are only searched for
//! let faces = finder.resolve(&Face::with_id(55, 100, 999, 2).unwrap()).unwrap();
//! assert_eq!(faces[0].id(), 2);
//! ```

pub mod config;
pub mod error;
pub mod face;
pub mod server;
pub mod similarity;
pub mod store;
mod finder;

// Re-export the main types as the public API
pub use config::Config;
pub use error::{FaceFinderError, Result};
pub use face::{Face, FaceRecord};
pub use finder::{FaceFinder, FACES_LIMIT, SIMILAR_LIMIT};
pub use store::{FaceStore, SqliteStore};
