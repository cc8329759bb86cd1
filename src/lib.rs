//! # Interview Harness
//!
//! An orchestration backend for AI-assisted mock interviews.
//!
//! Interview Harness accepts uploaded interview audio and video over HTTP,
//! delegates the heavy lifting to external APIs (Gemini for generation and
//! embeddings, AssemblyAI for transcription, a facial-emotion endpoint for
//! video frames), retrieves knowledge-base context from a pgvector-backed
//! Postgres table, and assembles a structured final report.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────────┐   ┌───────────────┐
//! │  Client  │──▶│   HTTP (axum)   │──▶│ Session state │
//! └──────────┘   └───────┬─────────┘   └───────────────┘
//!                        │
//!        ┌───────────────┼────────────────┐
//!        ▼               ▼                ▼
//!  ┌──────────┐   ┌────────────┐   ┌────────────┐
//!  │  Gemini  │   │ AssemblyAI │   │ Emotion API │
//!  │ gen+embed│   │ transcribe │   │  per frame  │
//!  └────┬─────┘   └────────────┘   └────────────┘
//!       │
//!       ▼
//!  ┌──────────────┐
//!  │  Postgres     │
//!  │  pgvector     │
//!  └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! ivh init                          # create the pdf_embeddings table
//! ivh ingest tips.pdf --source tips # chunk + embed + store
//! ivh serve                         # start the HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types and response schemas |
//! | [`outcome`] | Tagged success/failure results for API-facing flows |
//! | [`state`] | Process-wide interview session state |
//! | [`gemini`] | Gemini generation and embedding client |
//! | [`chunk`] | Text chunking |
//! | [`ingest`] | Chunk + embed + store pipeline |
//! | [`query`] | Retrieval query expansion |
//! | [`retriever`] | Nearest-neighbor context retrieval |
//! | [`websearch`] | Web-search context for question generation |
//! | [`questions`] | Interview question generator |
//! | [`evaluate`] | Transcript evaluation |
//! | [`transcription`] | AssemblyAI upload-and-poll client |
//! | [`emotion`] | Video frame emotion pipeline |
//! | [`report`] | Final report assembly |
//! | [`server`] | HTTP API server |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod chunk;
pub mod config;
pub mod db;
pub mod emotion;
pub mod evaluate;
pub mod gemini;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod outcome;
pub mod query;
pub mod questions;
pub mod report;
pub mod retriever;
pub mod server;
pub mod state;
pub mod transcription;
pub mod websearch;
