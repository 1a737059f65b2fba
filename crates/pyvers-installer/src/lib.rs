mod active;
mod catalog;
mod checksum;
mod exposure;
mod fs_utils;
mod install;
mod installations;
mod layout;
mod linker;
mod uninstall;

pub use active::ActiveStore;
pub use catalog::PrefixCatalog;
pub use checksum::{sha256_hex_file, verify_sha256_file};
pub use exposure::{exposed_commands, remove_shim, shim_path, shim_target, write_shim};
pub use install::LocalInstaller;
pub use installations::{locate, read_build_receipt, write_build_receipt};
pub use layout::{default_user_prefix, PrefixLayout};
pub use linker::ShimLinker;
pub use uninstall::remove_installation;

#[cfg(test)]
mod tests;
