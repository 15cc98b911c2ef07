//! # Byline
//!
//! The client-side domain core of a social blogging service, plus a thin
//! command-line client that exercises it.
//!
//! ## Architecture
//!
//! ```text
//! Domain → RequestDescriptor → Gateway → decode → Session/Feed state
//! ```
//!
//! - [`domain`]: phantom-typed articles, the author follow-state machine,
//!   comments, and validated identity primitives
//! - [`session`]: credential lifecycle and persisted-session storage with a
//!   change-notification channel
//! - [`feed`]: feed sources, query construction and pagination
//! - [`api`]: request descriptors, the transport seam, and typed operations
//!
//! The guiding idea is that illegal states don't type-check: an
//! [`Article<Preview>`](domain::Article) has no body accessor, a follow
//! request exists only on an [`UnfollowedAuthor`](domain::UnfollowedAuthor),
//! and an authenticated request cannot be built without a live
//! [`Credential`](session::Credential).

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires together the gateway, the typed
/// API client and the session store.
pub mod app;

/// Request descriptors, the [`Gateway`](api::Gateway) transport seam, the
/// reqwest-backed [`HttpGateway`](api::HttpGateway), and the typed
/// [`ApiClient`](api::ApiClient) operations.
pub mod api;

/// Command-line interface using clap.
///
/// Defines the CLI structure and subcommands: `login`, `logout`, `feed`,
/// `article <slug>`, `favorite <slug>`, `follow <username>`, and the
/// comment operations.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/byline/config.toml`; the only setting is the
/// base URL of the REST gateway.
pub mod config;

/// Core domain models.
///
/// - [`Article<Preview>`/`Article<Full>`](domain::Article): completeness
///   tracked in the type
/// - [`Author`](domain::Author): Following / NotFollowing / IsSelf
/// - [`Comment`](domain::Comment), [`Username`](domain::Username),
///   [`Slug`](domain::Slug) and friends
pub mod domain;

/// Feed sources, query construction and pagination.
pub mod feed;

/// Session and credential lifecycle.
///
/// - [`Session`](session::Session): time zone + optional logged-in user,
///   threaded through the event loop
/// - [`SessionStore`](session::SessionStore): the persisted blob, with a
///   watch channel for external changes
pub mod session;
