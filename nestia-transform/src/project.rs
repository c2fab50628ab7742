//! Per-run transform context.

use crate::allow_list::AllowList;
use crate::checker::TypeResolver;
use crate::options::TransformOptions;

/// Everything a transformer consults besides the node it rewrites.
#[derive(Debug)]
pub struct TransformProject<'a, R: ?Sized> {
    /// Type resolution context
    pub resolver: &'a R,
    /// Artifact options
    pub options: TransformOptions,
    /// Eligible declaration sites
    pub allow_list: &'a AllowList,
}

impl<'a, R: TypeResolver + ?Sized> TransformProject<'a, R> {
    /// Create a project using the process-wide allow-list.
    pub fn new(resolver: &'a R, options: TransformOptions) -> Self {
        Self {
            resolver,
            options,
            allow_list: AllowList::global(),
        }
    }

    /// Use a specific allow-list.
    pub fn with_allow_list(mut self, allow_list: &'a AllowList) -> Self {
        self.allow_list = allow_list;
        self
    }
}

impl<R: ?Sized> Clone for TransformProject<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: ?Sized> Copy for TransformProject<'_, R> {}
