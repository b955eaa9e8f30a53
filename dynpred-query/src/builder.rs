//! Predicate and getter construction.
//!
//! [`PredicateBuilder`] carries a [`FilterConfig`] and turns a path, an
//! operator and a raw value into a [`Predicate`] or a [`Getter`]. The free
//! functions in this module do the same with the default configuration.
//!
//! ```rust,ignore
//! use dynpred_query::{FilterOperator, PredicateBuilder};
//! use dynpred_schema::{FilterConfig, NullPolicy};
//!
//! let builder = PredicateBuilder::with_config(
//!     FilterConfig::default().with_null_policy(NullPolicy::ShortCircuit),
//! );
//! let older = builder.compiled_predicate::<Person>("Age", FilterOperator::GreaterThan, "25")?;
//! let city = builder.getter::<Person>("Address.City")?;
//! ```

use dynpred_schema::{FilterConfig, Record};

use crate::coerce::comparison_value;
use crate::error::{FilterError, FilterResult};
use crate::filter::{FilterOperator, FilterValue};
use crate::getter::{CompiledGetter, Getter};
use crate::path::{PropertyPath, ResolvedAccess, resolve_path};
use crate::predicate::{CompiledPredicate, Predicate};

/// Builds predicates and getters under one configuration.
#[derive(Debug, Clone, Default)]
pub struct PredicateBuilder {
    config: FilterConfig,
}

impl PredicateBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with an explicit configuration.
    pub fn with_config(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Resolve `path` against the schema of `T`.
    pub fn resolve<T: Record>(&self, path: &str) -> FilterResult<ResolvedAccess> {
        resolve_path(
            T::schema(),
            PropertyPath::parse(path)?,
            self.config.paths.max_depth,
        )
    }

    /// Wrap a resolved access in a getter.
    pub fn build_getter<T: Record>(&self, access: ResolvedAccess) -> FilterResult<Getter<T>> {
        ensure_root::<T>(&access)?;
        tracing::debug!(
            record = T::schema().name(),
            path = %access.path(),
            leaf = %access.leaf_type(),
            "getter built"
        );
        Ok(Getter::new(access, self.config.evaluation.null_policy))
    }

    /// Check the operator against the leaf type, coerce `value` and build a
    /// predicate.
    pub fn build_predicate<T: Record>(
        &self,
        access: ResolvedAccess,
        op: FilterOperator,
        value: impl Into<FilterValue>,
    ) -> FilterResult<Predicate<T>> {
        ensure_root::<T>(&access)?;
        let value = comparison_value(&access, op, &value.into())?;
        let predicate = Predicate::new(access, op, value, self.config.evaluation.null_policy);
        tracing::debug!(
            record = T::schema().name(),
            predicate = %predicate,
            null_policy = self.config.evaluation.null_policy.as_str(),
            "predicate built"
        );
        Ok(predicate)
    }

    /// Resolve `path` and build a getter.
    pub fn getter<T: Record>(&self, path: &str) -> FilterResult<Getter<T>> {
        let access = self.resolve::<T>(path)?;
        self.build_getter(access)
    }

    /// Resolve `path` and build a compiled getter.
    pub fn compiled_getter<T: Record>(&self, path: &str) -> FilterResult<CompiledGetter<T>> {
        Ok(self.getter::<T>(path)?.compile())
    }

    /// Resolve `path` and build a predicate.
    pub fn predicate<T: Record>(
        &self,
        path: &str,
        op: FilterOperator,
        value: impl Into<FilterValue>,
    ) -> FilterResult<Predicate<T>> {
        let access = self.resolve::<T>(path)?;
        self.build_predicate(access, op, value)
    }

    /// Resolve `path` and build a compiled predicate.
    pub fn compiled_predicate<T: Record>(
        &self,
        path: &str,
        op: FilterOperator,
        value: impl Into<FilterValue>,
    ) -> FilterResult<CompiledPredicate<T>> {
        Ok(self.predicate::<T>(path, op, value)?.compile())
    }
}

fn ensure_root<T: Record>(access: &ResolvedAccess) -> FilterResult<()> {
    if std::ptr::eq(access.root_schema(), T::schema()) {
        Ok(())
    } else {
        Err(FilterError::record_mismatch(T::schema().name()))
    }
}

/// Build a getter with the default configuration.
pub fn getter<T: Record>(path: &str) -> FilterResult<Getter<T>> {
    PredicateBuilder::new().getter(path)
}

/// Build a compiled getter with the default configuration.
pub fn compiled_getter<T: Record>(path: &str) -> FilterResult<CompiledGetter<T>> {
    PredicateBuilder::new().compiled_getter(path)
}

/// Build a predicate with the default configuration.
pub fn predicate<T: Record>(
    path: &str,
    op: FilterOperator,
    value: impl Into<FilterValue>,
) -> FilterResult<Predicate<T>> {
    PredicateBuilder::new().predicate(path, op, value)
}

/// Build a compiled predicate with the default configuration.
pub fn compiled_predicate<T: Record>(
    path: &str,
    op: FilterOperator,
    value: impl Into<FilterValue>,
) -> FilterResult<CompiledPredicate<T>> {
    PredicateBuilder::new().compiled_predicate(path, op, value)
}
