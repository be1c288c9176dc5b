//! Extension packs that can be loaded into a [`Registry`] by identifier.
//!
//! Each pack is a set of [`ValueGenerator`](crate::generators::ValueGenerator)
//! implementations registered under fixed names:
//!
//! - `person` - `first_name`, `last_name`, `full_name`, `email`, `username`
//! - `internet` - `ipv4`, `mac_address`, `domain`, `url`
//! - `lorem` - `word`, `sentence`, `paragraph`

pub mod internet;
pub mod lorem;
pub mod person;

use crate::error::RegistryError;
use crate::registry::Registry;

/// Installs a pack's generators into a registry.
pub type Installer = fn(&mut Registry) -> Result<(), RegistryError>;

/// Known packs.
pub const PACKS: &[(&str, Installer)] = &[
    ("person", person::install),
    ("internet", internet::install),
    ("lorem", lorem::install),
];

/// Find the installer for a pack identifier.
pub fn find(id: &str) -> Option<Installer> {
    PACKS
        .iter()
        .find(|(name, _)| *name == id)
        .map(|(_, install)| *install)
}
