//! Client side of the invoice API: an HTTP wrapper, the list and detail
//! views built on it, and the `invoicer` command line.

pub mod api;
pub mod details;
pub mod list;
pub mod rating;

pub use api::{ClientError, InvoiceClient, DEFAULT_API_URL};
pub use details::InvoiceDetailView;
pub use list::InvoiceListView;
pub use rating::StarRating;
