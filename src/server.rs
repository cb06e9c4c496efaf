//! REST API for facefinder.
//!
//! A JSON HTTP front for one shared [`FaceFinder`]. Requests are handled one at
//! a time against that finder, so its cache behaves exactly as in a single
//! caller program.
//!
//! ## Endpoints
//!
//! - `POST /resolve` - Resolve one or more faces (new faces get stored)
//! - `POST /flush` - Remove every stored face and restart ids
//! - `GET /count` - Number of cached faces
//!
//! ## Usage
//!
//! ```rust,no_run
//! use actix_web::{App, HttpServer};
//! use facefinder::{FaceFinder, SqliteStore};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let store = SqliteStore::open("facefinder.db").unwrap();
//!     let finder = facefinder::server::shared(FaceFinder::new(store));
//!
//!     HttpServer::new(move || App::new().app_data(finder.clone()).configure(facefinder::server::config))
//!         .bind("0.0.0.0:7878")?
//!         .run()
//!         .await
//! }
//! ```

use crate::{Face, FaceFinder, FaceRecord, SqliteStore};
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

pub type SharedFinder = Mutex<FaceFinder<SqliteStore>>;

/// Wraps a finder so it can be handed to `App::app_data`.
pub fn shared(finder: FaceFinder<SqliteStore>) -> web::Data<SharedFinder> {
    web::Data::new(Mutex::new(finder))
}

// --- Request structs ---

#[derive(Deserialize)]
struct ResolveRequest {
    faces: Vec<FaceRecord>,
}

// --- Response structs ---

#[derive(Serialize)]
struct ResolveResponse {
    results: Vec<ResolveResultGroup>,
}

#[derive(Serialize)]
struct ResolveResultGroup {
    matches: Vec<MatchResult>,
    message: String,
}

#[derive(Serialize)]
struct MatchResult {
    id: u64,
    race: u32,
    emotion: u32,
    oldness: u32,
    distance: f64,
}

#[derive(Serialize)]
struct FlushResponse {
    flushed: bool,
}

#[derive(Serialize)]
struct CountResponse {
    cached: Option<usize>,
}

fn lock(state: &web::Data<SharedFinder>) -> Result<MutexGuard<'_, FaceFinder<SqliteStore>>, HttpResponse> {
    state.lock().map_err(|_| {
        HttpResponse::InternalServerError().json(serde_json::json!({"error": "finder lock poisoned"}))
    })
}

fn internal_error(e: impl std::fmt::Display) -> HttpResponse {
    warn!(error = %e, "request failed");
    HttpResponse::InternalServerError().json(serde_json::json!({"error": e.to_string()}))
}

// --- Handlers ---

/// Resolves every face of the request in order, one result group per face.
///
/// A face with out of range levels gets an empty group carrying the error
/// message. A storage error aborts the request with a 500: faces resolved
/// before it are already stored, but their results are not returned.
async fn resolve_handler(state: web::Data<SharedFinder>, body: web::Json<ResolveRequest>) -> impl Responder {
    let mut finder = match lock(&state) {
        Ok(finder) => finder,
        Err(resp) => return resp,
    };

    let mut results = Vec::new();

    for entry in &body.faces {
        let query = match Face::try_from(*entry) {
            Ok(face) => face,
            Err(e) => {
                results.push(ResolveResultGroup { matches: Vec::new(), message: e.to_string() });
                continue;
            }
        };

        match finder.resolve_scored(&query) {
            Ok(scored) => {
                results.push(ResolveResultGroup {
                    matches: scored.iter()
                        .map(|(face, distance)| MatchResult {
                            id: face.id(),
                            race: face.race(),
                            emotion: face.emotion(),
                            oldness: face.oldness(),
                            distance: *distance,
                        })
                        .collect(),
                    message: "Resolve Success".to_string(),
                });
            }
            Err(e) => return internal_error(e),
        }
    }

    HttpResponse::Ok().json(ResolveResponse { results })
}

async fn flush_handler(state: web::Data<SharedFinder>) -> impl Responder {
    let mut finder = match lock(&state) {
        Ok(finder) => finder,
        Err(resp) => return resp,
    };

    if let Err(e) = finder.flush() {
        return internal_error(e);
    }

    HttpResponse::Ok().json(FlushResponse { flushed: true })
}

async fn count_handler(state: web::Data<SharedFinder>) -> impl Responder {
    let finder = match lock(&state) {
        Ok(finder) => finder,
        Err(resp) => return resp,
    };

    HttpResponse::Ok().json(CountResponse { cached: finder.cached_len() })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/resolve").route(web::post().to(resolve_handler)))
       .service(web::resource("/flush").route(web::post().to(flush_handler)))
       .service(web::resource("/count").route(web::get().to(count_handler)));
}
