//! # Patch Planner Backend
//!
//! Risk-aware patch scheduling engine.
//!
//! This crate assigns security patches to maintenance windows under downtime
//! and engineering-cost budgets, honoring dependency constraints between
//! patches, by formulating the problem as a mixed-integer linear program and
//! handing it to a MILP backend. The backend exposes a REST API via Axum for
//! the React frontend.
//!
//! ## Features
//!
//! - **Scoring**: risk-reduction and outage-risk proxies per patch
//! - **Dependency Graph**: precedence edges between patches with cycle rejection
//! - **MILP Model**: binary assignment/selection variables, budget and ordering constraints
//! - **Solution Extraction**: per-window grouping, topological ordering, summary totals
//! - **Explanations**: human-readable rationale for scheduled and deferred patches
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain entities (windows, patches, weights, results)
//! - [`catalog`]: Immutable window/patch provider with boundary validation
//! - [`planner`]: Scoring, graph, model construction, solving, extraction
//! - [`config`]: Server configuration from environment and TOML file
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod catalog;
pub mod config;
pub mod models;
pub mod planner;

#[cfg(feature = "http-server")]
pub mod http;
