//! Page streams produced by a layout engine.
//!
//! The driver only ever walks forward. Pages in front of the target are
//! passed over with [`PageSource::skip_page`], which a source can implement
//! without building the page's layout.

pub mod xml;

pub use xml::{LayoutFile, XmlPageSource, open_layout_file};

use crate::error::Result;
use crate::layout::Page;

/// A lazy, forward-only sequence of pages.
pub trait PageSource {
    /// Materializes the next page, or `None` once the stream is exhausted.
    fn next_page(&mut self) -> Option<Result<Page>>;

    /// Advances past the next page without handing it out.
    ///
    /// Returns `None` once the stream is exhausted.
    fn skip_page(&mut self) -> Option<Result<()>> {
        self.next_page().map(|page| page.map(drop))
    }
}

impl<S: PageSource + ?Sized> PageSource for &mut S {
    fn next_page(&mut self) -> Option<Result<Page>> {
        (**self).next_page()
    }

    fn skip_page(&mut self) -> Option<Result<()>> {
        (**self).skip_page()
    }
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn next_page(&mut self) -> Option<Result<Page>> {
        (**self).next_page()
    }

    fn skip_page(&mut self) -> Option<Result<()>> {
        (**self).skip_page()
    }
}

/// Page source over any iterator of pages.
///
/// Lets an in-process layout engine feed pages directly. Pages are pulled
/// one at a time, so a lazy iterator stays lazy.
#[derive(Debug, Clone)]
pub struct IterPageSource<I> {
    iter: I,
    pulled: usize,
}

impl<I> IterPageSource<I>
where
    I: Iterator<Item = Result<Page>>,
{
    pub fn new<T: IntoIterator<IntoIter = I>>(pages: T) -> Self {
        Self {
            iter: pages.into_iter(),
            pulled: 0,
        }
    }

    /// Number of pages taken from the underlying iterator so far.
    pub const fn pulled(&self) -> usize {
        self.pulled
    }
}

impl<P> IterPageSource<std::iter::Map<P, fn(Page) -> Result<Page>>>
where
    P: Iterator<Item = Page>,
{
    /// Source over infallible pages.
    pub fn from_pages<T: IntoIterator<IntoIter = P>>(pages: T) -> Self {
        let ok: fn(Page) -> Result<Page> = Ok;
        Self::new(pages.into_iter().map(ok))
    }
}

impl<I> PageSource for IterPageSource<I>
where
    I: Iterator<Item = Result<Page>>,
{
    fn next_page(&mut self) -> Option<Result<Page>> {
        let page = self.iter.next()?;
        self.pulled += 1;
        Some(page)
    }
}
