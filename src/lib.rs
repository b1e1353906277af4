// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session Token Service
//!
//! Issues signed bearer tokens, tracks live sessions in a TTL cache, and
//! gates HTTP requests on token state.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, token manager, enforcement filter
//! - `session` - Session cache interface and in-process store
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod session;
pub mod state;
