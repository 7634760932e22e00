// Domain managers
// One CRUD-style manager per entity, composed linearly:
// transport -> manager -> repository -> store

pub mod deposits;
pub mod errors;
pub mod orders;
pub mod products;
pub mod sweeper;
pub mod users;

pub use deposits::DepositManager;
pub use errors::{ShopError, ShopResult};
pub use orders::OrderManager;
pub use products::ProductManager;
pub use sweeper::{SweepReport, Sweeper};
pub use users::UserManager;

/// One page of a listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slices a fully loaded collection into one page
///
/// Pages are one-based; a page past the end comes back empty. The whole
/// collection sits in memory already, so this is a plain loop, not a
/// query.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);

    // Page numbers come straight from callback data, so an absurd value
    // must clamp instead of overflowing the offset multiply.
    let offset = page.saturating_sub(1).saturating_mul(per_page);
    let items = items.into_iter().skip(offset).take(per_page).collect();

    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}
