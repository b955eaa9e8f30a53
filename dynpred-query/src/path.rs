//! Dotted property paths and their resolution against a record schema.
//!
//! Resolution happens once, up front: every segment is looked up on the type
//! reached so far and the result is a [`ResolvedAccess`], a chain of
//! `&'static Property` hops ending at a leaf of known type. Evaluating the
//! access against a record only follows the accessors; no name lookups happen
//! per record.
//!
//! ```rust,ignore
//! use dynpred_query::path::{PropertyPath, resolve};
//!
//! let path: PropertyPath = "Address.City".parse()?;
//! assert_eq!(path.len(), 2);
//!
//! let access = resolve::<Person>("Address.City")?;
//! assert_eq!(access.leaf_type().name(), "String");
//! ```

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use dynpred_schema::{FieldRef, NullPolicy, Property, PropertyType, Record, RecordSchema, is_identifier};
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::error::{FilterError, FilterResult};

/// Default maximum number of segments in a path.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// A parsed, non-empty chain of property names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: SmallVec<[SmolStr; 4]>,
}

impl PropertyPath {
    /// Parse a dotted path such as `Address.City`.
    ///
    /// Splitting is strictly on `.`; empty segments (from `a..b`, a leading
    /// or a trailing dot) and segments that are not identifiers are rejected.
    pub fn parse(path: &str) -> FilterResult<Self> {
        if path.is_empty() {
            return Err(FilterError::invalid_path(path, "path is empty"));
        }

        let mut segments = SmallVec::new();
        for (index, segment) in path.split('.').enumerate() {
            if segment.is_empty() {
                return Err(FilterError::invalid_path(
                    path,
                    format!("segment {} is empty", index + 1),
                ));
            }
            if !is_identifier(segment) {
                return Err(FilterError::invalid_path(
                    path,
                    format!("`{}` is not an identifier", segment),
                ));
            }
            segments.push(SmolStr::new(segment));
        }

        Ok(Self { segments })
    }

    /// Get the segments in order.
    pub fn segments(&self) -> &[SmolStr] {
        &self.segments
    }

    /// Get the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; a parsed path has at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for PropertyPath {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// Where a walk over one record ended.
#[derive(Debug, Clone, Copy)]
pub enum Reached<'a> {
    /// The leaf property was read. It may itself be null.
    Leaf(FieldRef<'a>),
    /// An intermediate property was absent.
    Absent {
        /// Name of the absent property.
        segment: &'static str,
    },
}

/// A property path resolved against a root record schema.
///
/// Every hop is backed by an existing property and the leaf type is exact.
#[derive(Clone)]
pub struct ResolvedAccess {
    root: &'static RecordSchema,
    path: PropertyPath,
    hops: SmallVec<[&'static Property; 4]>,
}

impl ResolvedAccess {
    /// Get the schema the path starts from.
    pub fn root_schema(&self) -> &'static RecordSchema {
        self.root
    }

    /// Get the resolved path.
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// Get the number of hops, equal to the number of path segments.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Always `false`; a resolved access has at least one hop.
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Get the static type of the leaf.
    pub fn leaf_type(&self) -> PropertyType {
        self.leaf().ty()
    }

    /// Check if any hop may be absent at runtime.
    pub fn is_nullable(&self) -> bool {
        self.hops.iter().any(|hop| hop.is_nullable())
    }

    fn leaf(&self) -> &'static Property {
        // Resolution never produces an empty chain.
        self.hops[self.hops.len() - 1]
    }

    /// Follow the chain over one record.
    pub fn walk<'a>(&self, record: &'a (dyn Any + 'static)) -> FilterResult<Reached<'a>> {
        let mut current = record;
        let last = self.hops.len().saturating_sub(1);

        for (index, &hop) in self.hops.iter().enumerate() {
            let field = hop
                .read(current)
                .ok_or_else(|| FilterError::record_mismatch(self.root.name()))?;

            if index == last {
                return Ok(Reached::Leaf(field));
            }

            match field {
                FieldRef::Record(next) => current = next,
                FieldRef::Null => return Ok(Reached::Absent { segment: hop.name() }),
                FieldRef::Scalar(_) => return Err(FilterError::record_mismatch(hop.ty().name())),
            }
        }

        Err(FilterError::invalid_path(self.path.to_string(), "path is empty"))
    }

    /// Follow the chain over one record and apply the null policy to an
    /// absent intermediate property.
    pub fn read<'a>(
        &self,
        record: &'a (dyn Any + 'static),
        policy: NullPolicy,
    ) -> FilterResult<FieldRef<'a>> {
        match self.walk(record)? {
            Reached::Leaf(field) => Ok(field),
            Reached::Absent { segment } => match policy {
                NullPolicy::Propagate => {
                    Err(FilterError::null_reference(self.path.to_string(), segment))
                }
                NullPolicy::ShortCircuit => Ok(FieldRef::Null),
            },
        }
    }
}

impl fmt::Debug for ResolvedAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedAccess")
            .field("root", &self.root.name())
            .field("path", &self.path.to_string())
            .field("leaf", &self.leaf_type())
            .finish()
    }
}

impl PartialEq for ResolvedAccess {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.root, other.root)
            && self.path == other.path
            && self.hops.len() == other.hops.len()
            && self
                .hops
                .iter()
                .zip(other.hops.iter())
                .all(|(lhs, rhs)| std::ptr::eq(*lhs, *rhs))
    }
}

/// Resolve `path` against the schema of `T`.
pub fn resolve<T: Record>(path: &str) -> FilterResult<ResolvedAccess> {
    resolve_in(T::schema(), path)
}

/// Resolve `path` against an explicit schema.
pub fn resolve_in(schema: &'static RecordSchema, path: &str) -> FilterResult<ResolvedAccess> {
    resolve_path(schema, PropertyPath::parse(path)?, DEFAULT_MAX_DEPTH)
}

/// Resolve an already parsed path, rejecting paths deeper than `max_depth`.
pub fn resolve_path(
    schema: &'static RecordSchema,
    path: PropertyPath,
    max_depth: usize,
) -> FilterResult<ResolvedAccess> {
    if path.len() > max_depth {
        return Err(FilterError::invalid_path(
            path.to_string(),
            format!("{} segments exceed the maximum depth of {}", path.len(), max_depth),
        ));
    }

    let mut hops = SmallVec::with_capacity(path.len());
    let mut current = schema;
    let mut segments = path.segments().iter().peekable();

    while let Some(segment) = segments.next() {
        let property = current
            .property(segment)
            .ok_or_else(|| FilterError::unknown_property(segment.as_str(), current.name()))?;
        hops.push(property);

        if let Some(next) = segments.peek() {
            current = match property.ty() {
                PropertyType::Record(schema) => schema(),
                PropertyType::Scalar(kind) => {
                    return Err(FilterError::unknown_property(next.as_str(), kind.name()));
                }
            };
        }
    }

    tracing::debug!(
        record = schema.name(),
        path = %path,
        hops = hops.len(),
        "property path resolved"
    );

    Ok(ResolvedAccess {
        root: schema,
        path,
        hops,
    })
}
