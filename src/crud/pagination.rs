//! Page window math for the document listing.
//!
//! A page `p` of `row` records exists when some index `i` satisfies
//! `p == i + 1` and `i < count / row`. That is the same as `p` being a whole
//! number with `(p - 1) * row < count`, which is what is computed here.

use crate::crud::params::PageRequest;
use crate::store::Window;

/// The skip/limit window for `request`, or `None` when the page is out of
/// range (or not a whole number).
pub fn page_window(request: PageRequest, count: u64) -> Option<Window> {
    let PageRequest { page, row } = request;
    if page.fract() != 0.0 || page < 1.0 || row == 0 {
        return None;
    }

    let index = (page - 1.0) as u64;
    let offset = index.checked_mul(row)?;
    if offset >= count {
        return None;
    }

    Some(Window { offset, limit: row })
}
