mod archive;
mod build;
mod catalog;
mod error;
mod installation;
mod traits;
mod version;

pub use archive::ArchiveType;
pub use build::{Build, BuildParseError};
pub use catalog::{Catalog, CatalogBuild, CatalogEntry};
pub use error::{
    InstallationState, InvalidBuildError, LifecycleError, LinkError, PreconditionError,
};
pub use installation::{Installation, BUILD_RECEIPT_FILE};
pub use traits::{Installer, Linker, VersionCatalog};
pub use version::{interpreter_rel_path, CommandScope, CommandSpec, Version};
