//! Built-in source definitions
//!
//! The Jaffle Shop demo API: customers, orders and products, each paginated
//! with `?page=N&page_size=M` and ending on an empty page or a response
//! without a `rel="next"` link.

use crate::error::Result;
use crate::pagination::{PageNumberPaginator, StopCondition};
use crate::resource::{Resource, Source};
use crate::types::WriteDisposition;

/// Default base URL of the Jaffle Shop API
pub const JAFFLE_SHOP_API_BASE: &str = "https://jaffle-shop.scalevector.ai/api/v1";

/// Name of the Jaffle Shop source
pub const JAFFLE_SHOP_SOURCE: &str = "jaffle_shop";

/// Page-number paginator honoring both of the API's end-of-data signals
pub fn jaffle_shop_paginator(page_size: u32) -> PageNumberPaginator {
    PageNumberPaginator::new("page", 1)
        .with_page_size("page_size", page_size)
        .stop_on(StopCondition::missing_next_link())
}

fn jaffle_resource(name: &str, primary_key: &str, page_size: u32) -> Result<Resource> {
    Ok(Resource::new(name, name)?
        .with_table_name(name)
        .with_primary_key(primary_key)
        .with_write_disposition(WriteDisposition::Replace)
        .with_paginator(jaffle_shop_paginator(page_size)))
}

/// The Jaffle Shop source with all resources
pub fn jaffle_shop_source(page_size: u32) -> Result<Source> {
    Source::new(JAFFLE_SHOP_SOURCE)
        .with_resource(jaffle_resource("customers", "id", page_size)?)?
        .with_resource(jaffle_resource("orders", "id", page_size)?)?
        .with_resource(jaffle_resource("products", "sku", page_size)?)
}
