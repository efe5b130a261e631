//! Client-side session and auth layer for the weekly achievement log.
//!
//! ARCHITECTURE
//! ============
//! Leaf first: `credentials` persists the bearer token and cached profile,
//! `session` owns the in-memory auth state and is the only writer of the
//! credentials, `hooks` wrap the entry CRUD calls, and `guard` gates page
//! navigation on the auth cookie alone. `web` and `views` are the two front
//! ends that consume them.

pub mod config;
pub mod credentials;
pub mod failure;
pub mod guard;
pub mod hooks;
pub mod net;
pub mod session;
pub mod views;
pub mod web;
