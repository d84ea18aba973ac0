//! Movie recommendations by plot-summary similarity.
//!
//! A local catalog of movies is embedded once at startup into an exact
//! inner-product [`index::SimilarityIndex`]. For each user query the movie's
//! synopsis is fetched from a metadata provider (TMDB), embedded with the same
//! [`embedding::Embedder`], and matched against the index; the nearest catalog
//! movies come back ranked with their cosine similarity and shared genres.

pub mod catalog;
pub mod config;
pub mod db;
pub mod embedding;
pub mod error;
pub mod index;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
