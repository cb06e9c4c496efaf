//! The finder module
//! Resolves a face to its nearest stored neighbours, storing it first if new

use crate::error::Result;
use crate::face::Face;
use crate::similarity::nearest;
use crate::store::FaceStore;
use std::collections::BTreeMap;
use tracing::{debug, info, trace};

/// How many stored faces are loaded into the cache at most.
pub const FACES_LIMIT: usize = 10_000;
/// How many faces `resolve` returns at most.
pub const SIMILAR_LIMIT: usize = 5;

/// Finds the most similar stored faces for a query face.
///
/// The cache is loaded from storage on the first [`resolve`](FaceFinder::resolve)
/// and then only grows with faces this finder inserts itself. Other finders on
/// the same database keep their own cache and do not see each other's inserts.
pub struct FaceFinder<S: FaceStore> {
    store: S,
    faces_limit: usize,
    similar_limit: usize,
    cache: Option<BTreeMap<u64, Face>>,
}

impl<S: FaceStore> FaceFinder<S> {
    /// Creates a finder with the default limits. Storage is not touched yet.
    pub fn new(store: S) -> FaceFinder<S> {
        FaceFinder::with_limits(store, FACES_LIMIT, SIMILAR_LIMIT)
    }

    pub fn with_limits(store: S, faces_limit: usize, similar_limit: usize) -> FaceFinder<S> {
        FaceFinder { store, faces_limit, similar_limit, cache: None }
    }

    /// Finds the most similar faces, nearest first.
    ///
    /// A new face (`id == 0`) is stored first and comes back with its new id
    /// and distance 0. A face with an id is only searched for.
    ///
    /// # Examples
    ///
    /// ```
    /// use facefinder::{Face, FaceFinder, SqliteStore};
    ///
    /// let mut finder = FaceFinder::new(SqliteStore::open_in_memory().unwrap());
    ///
    /// let faces = finder.resolve(&Face::new(1, 200, 500).unwrap()).unwrap();
    /// assert_eq!(faces.len(), 1);
    /// assert_eq!(faces[0].id(), 1);
    /// ```
    pub fn resolve(&mut self, query: &Face) -> Result<Vec<Face>> {
        let scored = self.resolve_scored(query)?;
        Ok(scored.into_iter().map(|(face, _)| face).collect())
    }

    /// Same as [`resolve`](FaceFinder::resolve) but keeps each distance.
    pub fn resolve_scored(&mut self, query: &Face) -> Result<Vec<(Face, f64)>> {
        let store = &mut self.store;
        let faces_limit = self.faces_limit;

        let cache = match &mut self.cache {
            Some(cache) => cache,
            empty => empty.insert(load_cache(store, faces_limit)?),
        };

        let inserted = if query.is_new() {
            let id = store.insert(query.race(), query.emotion(), query.oldness())?;
            let face = query.stored_as(id);
            cache.insert(id, face);
            debug!(id, "stored new face");
            Some(face)
        } else {
            None
        };

        // the inserted face goes first so it wins every tie at distance 0
        let new_id = inserted.map(|face| face.id());
        let rest = cache.values().filter(|face| Some(face.id()) != new_id);
        let ranked = nearest(query, inserted.iter().chain(rest), self.similar_limit);
        trace!(candidates = cache.len(), returned = ranked.len(), "searched faces");

        Ok(ranked.into_iter().map(|(face, dist)| (*face, dist)).collect())
    }

    /// Removes all stored faces and restarts ids at 1.
    ///
    /// The cache of this finder is left as it is: faces loaded or inserted
    /// before the flush still show up in its results. Build a new finder to
    /// see the empty table.
    pub fn flush(&mut self) -> Result<()> {
        self.store.truncate_all()?;
        info!("flushed face storage");
        Ok(())
    }

    /// Number of cached faces, or `None` before the first resolve.
    pub fn cached_len(&self) -> Option<usize> {
        self.cache.as_ref().map(|cache| cache.len())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn load_cache<S: FaceStore>(store: &S, limit: usize) -> Result<BTreeMap<u64, Face>> {
    let faces = store.load_recent(limit)?;
    debug!(count = faces.len(), limit, "loaded face cache");

    Ok(faces.into_iter().map(|face| (face.id(), face)).collect())
}
