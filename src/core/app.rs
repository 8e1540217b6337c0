//! Application identity from Cargo.toml.
//!
//! Single source of truth for the updater name, version, and default release
//! repository used across the codebase.

/// Updater name (from Cargo.toml `package.name`).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Updater version (from Cargo.toml `package.version`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Release repository slug (`owner/name`) updates are pulled from.
pub const DEFAULT_REPO: &str = "romdrop/RomDrop";

/// Asset name of the application bundle inside a release.
pub const DEFAULT_BUNDLE_ASSET: &str = "RomDrop.zip";

/// File name of the content catalog inside the assets directory.
pub const CATALOG_FILE: &str = "catalog.db";

/// File name of the persisted version record inside the install root.
pub const VERSION_FILE: &str = "version.txt";
