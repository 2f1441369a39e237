//! Resource and source definitions

use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{paginate, Page, PageNumberPaginator, Paginator};
use crate::types::WriteDisposition;
use futures::Stream;
use std::fmt;
use std::sync::Arc;

/// A named data-extraction unit bound to one API endpoint
#[derive(Clone)]
pub struct Resource {
    name: String,
    endpoint: String,
    table_name: String,
    primary_key: Option<String>,
    write_disposition: WriteDisposition,
    paginator: Arc<dyn Paginator>,
    decoder: Arc<dyn RecordDecoder>,
}

impl Resource {
    /// Create a resource reading `endpoint`, loaded into a table named after it
    ///
    /// Defaults to page-number pagination stopping on an empty page, a JSON
    /// array body and the replace write disposition.
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let endpoint = endpoint.into();

        if name.trim().is_empty() {
            return Err(Error::config("resource name must not be empty"));
        }
        if endpoint.trim().is_empty() {
            return Err(Error::invalid_value(
                format!("resources.{name}.endpoint"),
                "endpoint must not be empty",
            ));
        }

        Ok(Self {
            table_name: name.clone(),
            name,
            endpoint,
            primary_key: None,
            write_disposition: WriteDisposition::default(),
            paginator: Arc::new(PageNumberPaginator::new("page", 1)),
            decoder: Arc::new(JsonDecoder::new()),
        })
    }

    /// Set the destination table name
    #[must_use]
    pub fn with_table_name(mut self, table: impl Into<String>) -> Self {
        self.table_name = table.into();
        self
    }

    /// Set the primary key column
    #[must_use]
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    /// Set the write disposition
    #[must_use]
    pub fn with_write_disposition(mut self, disposition: WriteDisposition) -> Self {
        self.write_disposition = disposition;
        self
    }

    /// Set the pagination strategy
    #[must_use]
    pub fn with_paginator(mut self, paginator: impl Paginator + 'static) -> Self {
        self.paginator = Arc::new(paginator);
        self
    }

    /// Set the response decoder
    #[must_use]
    pub fn with_decoder(mut self, decoder: impl RecordDecoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Resource name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Endpoint path, relative to the API base
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Destination table
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Primary key column, if declared
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// How rows are written to the table
    pub fn write_disposition(&self) -> WriteDisposition {
        self.write_disposition
    }

    /// Lazily fetch this resource's pages
    ///
    /// Every call starts a fresh run at the paginator's first page.
    pub fn pages<'a>(&'a self, client: &'a HttpClient) -> impl Stream<Item = Result<Page>> + 'a {
        paginate(
            client,
            self.endpoint.as_str(),
            self.paginator.as_ref(),
            self.decoder.as_ref(),
        )
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("table_name", &self.table_name)
            .field("primary_key", &self.primary_key)
            .field("write_disposition", &self.write_disposition)
            .field("paginator", &self.paginator)
            .finish_non_exhaustive()
    }
}

/// An explicit, ordered set of resources extracted together
#[derive(Debug, Clone)]
pub struct Source {
    name: String,
    resources: Vec<Resource>,
}

impl Source {
    /// Create an empty source
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: Vec::new(),
        }
    }

    /// Register a resource
    ///
    /// Resource names and table names must be unique within a source.
    pub fn with_resource(mut self, resource: Resource) -> Result<Self> {
        if self.get(resource.name()).is_some() {
            return Err(Error::config(format!(
                "duplicate resource '{}' in source '{}'",
                resource.name(),
                self.name
            )));
        }
        if self
            .resources
            .iter()
            .any(|r| r.table_name() == resource.table_name())
        {
            return Err(Error::config(format!(
                "table '{}' is written by more than one resource in source '{}'",
                resource.table_name(),
                self.name
            )));
        }
        self.resources.push(resource);
        Ok(self)
    }

    /// Source name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered resources in registration order
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Look up a resource by name
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name() == name)
    }

    /// Number of registered resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether no resources are registered
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
