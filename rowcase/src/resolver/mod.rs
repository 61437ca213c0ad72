//! Data-provider resolution.
//!
//! A test method names the data provider feeding it, possibly only by
//! convention, and possibly with several same-named candidates spread over
//! a list of candidate locations. Resolution walks the locations in
//! declaration order, lets every declared resolver contribute candidates,
//! applies the configured strategy, and insists on exactly one survivor:
//! zero matches and ambiguous multiples are both hard errors, never a
//! silent pick.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::TestMethod;

/// How candidate locations are searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResolveStrategy {
    /// Search every location and pool all matches; ambiguity across
    /// locations is an error.
    Each,
    /// Search locations in order and stop at the first location yielding at
    /// least one match.
    #[default]
    UntilFirstMatch,
}

/// A candidate data-provider method declared at some location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderMethod {
    /// The provider method's own name.
    pub name: String,
    /// The explicit provider name from its declaration, if any; the method
    /// name is used when absent.
    pub provider_name: Option<String>,
}

impl ProviderMethod {
    /// A provider whose name defaults to the method name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider_name: None,
        }
    }

    /// A provider with an explicit declared name.
    pub fn named(name: impl Into<String>, provider_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider_name: Some(provider_name.into()),
        }
    }

    /// The name this provider answers to.
    pub fn effective_name(&self) -> &str {
        self.provider_name.as_deref().unwrap_or(&self.name)
    }
}

/// A candidate class searched for matching provider methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderLocation {
    /// The location's name.
    pub name: String,
    /// The provider methods declared at this location.
    pub providers: Vec<ProviderMethod>,
}

impl ProviderLocation {
    /// A location with its declared providers.
    pub fn new(
        name: impl Into<String>,
        providers: impl IntoIterator<Item = ProviderMethod>,
    ) -> Self {
        Self {
            name: name.into(),
            providers: providers.into_iter().collect(),
        }
    }
}

/// Discovers matching provider methods within one location.
///
/// The default implementation matches on the effective provider name; hosts
/// may register additional resolvers for custom discovery schemes.
pub trait ProviderMethodResolver: Send + Sync {
    fn resolve(&self, location: &ProviderLocation, context: &ResolverContext)
        -> Vec<ProviderMethod>;
}

/// The default resolver: effective-name equality.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultResolver;

impl ProviderMethodResolver for DefaultResolver {
    fn resolve(
        &self,
        location: &ProviderLocation,
        context: &ResolverContext,
    ) -> Vec<ProviderMethod> {
        let wanted = context.requested_name();
        location
            .providers
            .iter()
            .filter(|p| p.effective_name() == wanted)
            .cloned()
            .collect()
    }
}

/// Everything needed to resolve one test method's data provider.
///
/// Built once per annotated test method; immutable afterwards.
pub struct ResolverContext {
    /// The requesting test method.
    pub method: TestMethod,
    /// The declared resolver implementations, tried in order per location.
    pub resolvers: Vec<Box<dyn ProviderMethodResolver>>,
    /// The location-search strategy.
    pub strategy: ResolveStrategy,
    /// The candidate locations, in declaration order.
    pub locations: Vec<ProviderLocation>,
    /// The requested provider name; `None` means the convention of using
    /// the test method's own name.
    pub provider_name: Option<String>,
}

impl ResolverContext {
    /// A context with the default resolver.
    pub fn new(
        method: TestMethod,
        strategy: ResolveStrategy,
        locations: Vec<ProviderLocation>,
        provider_name: Option<String>,
    ) -> Self {
        Self {
            method,
            resolvers: vec![Box::new(DefaultResolver)],
            strategy,
            locations,
            provider_name,
        }
    }

    /// Replace the resolver list.
    pub fn with_resolvers(mut self, resolvers: Vec<Box<dyn ProviderMethodResolver>>) -> Self {
        self.resolvers = resolvers;
        self
    }

    /// The provider name being looked for.
    pub fn requested_name(&self) -> &str {
        self.provider_name.as_deref().unwrap_or(&self.method.name)
    }
}

impl std::fmt::Debug for ResolverContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverContext")
            .field("method", &self.method)
            .field("strategy", &self.strategy)
            .field("locations", &self.locations)
            .field("provider_name", &self.provider_name)
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

/// A uniquely resolved provider method, ready for the producer invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    /// The location declaring the method.
    pub location: String,
    /// The provider method itself.
    pub method: ProviderMethod,
}

impl std::fmt::Display for ResolvedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.location, self.method.name)
    }
}

/// Resolution errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No data provider named '{name}' found for test method '{method}' in locations [{locations}]")]
    NoSuchProvider {
        name: String,
        method: String,
        locations: String,
    },

    #[error("Multiple data providers named '{name}' found for test method '{method}': {candidates}")]
    Ambiguous {
        name: String,
        method: String,
        candidates: String,
    },
}

/// Resolution result type.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Find the single provider method supplying data for the context's test
/// method.
pub fn resolve_data_provider(context: &ResolverContext) -> ResolveResult<ResolvedProvider> {
    let mut candidates: Vec<ResolvedProvider> = Vec::new();
    // The same method may be discovered by several resolvers; it counts once.
    let mut seen: FxHashSet<(String, String)> = FxHashSet::default();

    for location in &context.locations {
        let mut here = Vec::new();
        for resolver in &context.resolvers {
            for method in resolver.resolve(location, context) {
                if seen.insert((location.name.clone(), method.name.clone())) {
                    here.push(ResolvedProvider {
                        location: location.name.clone(),
                        method,
                    });
                }
            }
        }
        debug!(
            location = %location.name,
            matches = here.len(),
            "searched provider location"
        );
        let stop = context.strategy == ResolveStrategy::UntilFirstMatch && !here.is_empty();
        candidates.extend(here);
        if stop {
            break;
        }
    }

    match candidates.len() {
        0 => Err(ResolveError::NoSuchProvider {
            name: context.requested_name().to_string(),
            method: context.method.to_string(),
            locations: context
                .locations
                .iter()
                .map(|l| l.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }),
        1 => Ok(candidates.into_iter().next().expect("one candidate")),
        _ => Err(ResolveError::Ambiguous {
            name: context.requested_name().to_string(),
            method: context.method.to_string(),
            candidates: candidates
                .iter()
                .map(ResolvedProvider::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}
