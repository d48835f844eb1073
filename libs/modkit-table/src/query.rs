//! Query options handed to the transport layer.
//!
//! These types only assemble request parameters; sending them is someone
//! else's job. Parameters come out in a fixed order so request signing and
//! logging stay deterministic.

use crate::filter::{apply_and, apply_constant, apply_ge, apply_le, apply_property_name};
use crate::{Filter, Result, TableLimits, serialize};

pub const FILTER_PARAM: &str = "$filter";
pub const SELECT_PARAM: &str = "$select";
pub const TOP_PARAM: &str = "$top";
pub const NEXT_PARTITION_KEY_PARAM: &str = "NextPartitionKey";
pub const NEXT_ROW_KEY_PARAM: &str = "NextRowKey";
pub const NEXT_TABLE_NAME_PARAM: &str = "NextTableName";

const TABLE_NAME: &str = "TableName";

pub type QueryParams = Vec<(&'static str, String)>;

/// Filter, projection and page size shared by entity and table queries.
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct Query {
    filter: Option<Filter>,
    select: Vec<String>,
    top: Option<u32>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    #[must_use]
    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    #[must_use]
    pub fn selected_fields(&self) -> &[String] {
        &self.select
    }

    #[must_use]
    pub fn top(&self) -> Option<u32> {
        self.top
    }

    /// Render `$filter`, `$select` and `$top`, in that order, skipping unset ones.
    ///
    /// The filter depth is checked before rendering, its length after.
    ///
    /// # Errors
    /// Returns `Error::InvalidTop` or `Error::InvalidFilter` when a limit is exceeded.
    pub fn to_params(&self, limits: &TableLimits) -> Result<QueryParams> {
        let mut params = QueryParams::new();
        if let Some(filter) = &self.filter {
            limits.validate_filter_depth(filter)?;
            let rendered = serialize(filter);
            limits.validate_filter(&rendered)?;
            tracing::trace!(filter = %rendered, "Rendered table query filter");
            params.push((FILTER_PARAM, rendered));
        }
        if !self.select.is_empty() {
            params.push((SELECT_PARAM, self.select.join(",")));
        }
        if let Some(top) = self.top {
            limits.validate_top(top)?;
            params.push((TOP_PARAM, top.to_string()));
        }
        Ok(params)
    }
}

/// Options for listing entities of one table, with continuation tokens.
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct QueryEntitiesOptions {
    pub query: Query,
    pub next_partition_key: Option<String>,
    pub next_row_key: Option<String>,
}

impl QueryEntitiesOptions {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn with_next_partition_key(mut self, key: impl Into<String>) -> Self {
        self.next_partition_key = Some(key.into());
        self
    }

    pub fn with_next_row_key(mut self, key: impl Into<String>) -> Self {
        self.next_row_key = Some(key.into());
        self
    }

    /// # Errors
    /// Propagates limit violations from [`Query::to_params`].
    pub fn to_params(&self, limits: &TableLimits) -> Result<QueryParams> {
        let mut params = self.query.to_params(limits)?;
        if let Some(pk) = &self.next_partition_key {
            params.push((NEXT_PARTITION_KEY_PARAM, pk.clone()));
        }
        if let Some(rk) = &self.next_row_key {
            params.push((NEXT_ROW_KEY_PARAM, rk.clone()));
        }
        Ok(params)
    }
}

/// Options for listing tables.
///
/// A prefix is expressed as a `TableName` range filter and AND-ed after the
/// caller's own filter.
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct QueryTablesOptions {
    pub query: Query,
    pub prefix: Option<String>,
    pub next_table_name: Option<String>,
}

impl QueryTablesOptions {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_next_table_name(mut self, name: impl Into<String>) -> Self {
        self.next_table_name = Some(name.into());
        self
    }

    /// The filter actually sent: caller filter, prefix range, or both.
    #[must_use]
    pub fn effective_filter(&self) -> Option<Filter> {
        let prefix = self.prefix.as_deref().map(|p| {
            apply_and(
                apply_ge(apply_property_name(TABLE_NAME), apply_constant(p)),
                apply_le(apply_property_name(TABLE_NAME), apply_constant(format!("{p}{{"))),
            )
        });
        match (self.query.filter().cloned(), prefix) {
            (Some(own), Some(prefix)) => Some(apply_and(own, prefix)),
            (own, prefix) => own.or(prefix),
        }
    }

    /// # Errors
    /// Propagates limit violations from [`Query::to_params`].
    pub fn to_params(&self, limits: &TableLimits) -> Result<QueryParams> {
        // the clone below recurses, so refuse deep trees first
        if let Some(own) = self.query.filter() {
            limits.validate_filter_depth(own)?;
        }
        let mut query = self.query.clone();
        query.filter = self.effective_filter();
        let mut params = query.to_params(limits)?;
        if let Some(next) = &self.next_table_name {
            params.push((NEXT_TABLE_NAME_PARAM, next.clone()));
        }
        Ok(params)
    }
}
