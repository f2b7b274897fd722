//! Scoped quote mutation with guaranteed restoration.

use strata_core::Tenor;
use strata_curves::CurveBook;

/// Captures a set of quotes and restores them when dropped.
///
/// Bump-and-reprice mutates the shared quote vector; the invariant is
/// that the vector is bit-for-bit identical after every calculation,
/// whatever exit path the pricer takes. Encoding the restore in `Drop`
/// covers early returns via `?` and panics alike.
///
/// [`shift`](QuoteGuard::shift) always writes `captured value + delta`,
/// so successive shifts are absolute with respect to the snapshot, not
/// cumulative.
pub struct QuoteGuard<'a> {
    book: &'a mut CurveBook,
    saved: Vec<(Tenor, f64)>,
}

impl<'a> QuoteGuard<'a> {
    /// Snapshots the given tenors' current quotes.
    pub fn capture(book: &'a mut CurveBook, tenors: &[Tenor]) -> Self {
        let saved = tenors.iter().map(|&t| (t, book.quote(t))).collect();
        Self { book, saved }
    }

    /// Sets every captured tenor to its snapshot value plus `delta`.
    pub fn shift(&mut self, delta: f64) {
        for &(tenor, value) in &self.saved {
            self.book.set_quote(tenor, value + delta);
        }
    }

    /// Access to the underlying book for repricing under the shift.
    pub fn book_mut(&mut self) -> &mut CurveBook {
        self.book
    }
}

impl Drop for QuoteGuard<'_> {
    fn drop(&mut self) {
        for &(tenor, value) in &self.saved {
            self.book.set_quote(tenor, value);
        }
    }
}
