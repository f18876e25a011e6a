//! Provider registry: maps a provider identifier to a live provider.
//!
//! The set of providers is fixed at compile time. Lookup trims and
//! lowercases the requested name, so `" USGS "` resolves like `"usgs"`.

use std::fmt;
use std::str::FromStr;

use crate::context::FetchContext;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::EarthquakeProvider;
use crate::usgs::{self, UsgsProvider};

/// Every provider this build knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKind {
    Usgs,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 1] = [ProviderKind::Usgs];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Usgs => usgs::NAME,
        }
    }

    /// Human-readable name of the upstream catalog.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::Usgs => usgs::LABEL,
        }
    }

    pub fn documentation(&self) -> &'static str {
        match self {
            ProviderKind::Usgs => usgs::DOCUMENTATION,
        }
    }

    /// Constructs the provider on top of the shared fetch infrastructure.
    pub fn build(&self, ctx: &FetchContext) -> Box<dyn EarthquakeProvider> {
        match self {
            ProviderKind::Usgs => Box::new(UsgsProvider::new(ctx)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

/// Supported provider identifiers, sorted.
pub fn supported() -> Vec<&'static str> {
    let mut names: Vec<_> = ProviderKind::ALL.iter().map(ProviderKind::as_str).collect();
    names.sort_unstable();
    names
}

/// Resolves a provider identifier.
///
/// # Errors
///
/// Returns an `UnknownProvider` error naming the input and listing the
/// supported identifiers.
pub fn resolve(name: &str) -> ProviderResult<ProviderKind> {
    let wanted = name.trim().to_ascii_lowercase();
    ProviderKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == wanted)
        .ok_or_else(|| ProviderError::unknown_provider(name.trim(), &supported()))
}

/// Resolves `name` and builds the provider.
///
/// # Errors
///
/// Returns an `UnknownProvider` error for unregistered names.
pub fn build(name: &str, ctx: &FetchContext) -> ProviderResult<Box<dyn EarthquakeProvider>> {
    Ok(resolve(name)?.build(ctx))
}
