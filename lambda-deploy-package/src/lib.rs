//! Packaging for lambda-deploy
//!
//! Turns a lambda source directory into an in-memory zip archive, vendoring
//! dependencies listed in its `requirements.txt` when present.

pub mod archive;
pub mod error;
pub mod installer;
pub mod packager;

pub use archive::{Archive, ArchiveEntry};
pub use error::{InstallError, PackageError};
pub use installer::{Installer, PipInstaller};
pub use packager::Packager;
