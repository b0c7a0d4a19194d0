//! Caching adapter: multi-pass cursors over a single-pass source.
//!
//! [`CachingCursor`] buffers every element it pulls from the source so that
//! clones can replay them. All clones share one append-only buffer; each
//! cursor only remembers its absolute index in the stream. The buffer keeps
//! the elements from `base` onward, where `base` only moves when
//! [`CachingCursor::clear_cache`] drops the prefix.
//!
//! # Invalidation
//!
//! Clearing the cache is destructive and exclusive: it drops every element
//! before the calling cursor, so any clone still positioned earlier can no
//! longer be read. Such a cursor is detected by comparing its index with
//! `base`; [`CachingCursor::try_next`] then returns
//! [`Error::Cache`](crate::Error::Cache) holding
//! [`CacheError::Invalidated`] instead of silently returning wrong data.
//!
//! # Threading
//!
//! The shared buffer lives in an `Rc<RefCell<..>>`, so cursors are neither
//! `Send` nor `Sync`.

use crate::cursor::{ForwardCursor, InputCursor};
use crate::error::{CacheError, Result};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, error};

struct Shared<I: Iterator> {
    source: I,
    buffer: Vec<I::Item>,
    /// Absolute index of `buffer[0]`
    base: usize,
    exhausted: bool,
}

impl<I: Iterator> Shared<I> {
    /// Make sure `buffer` holds the element at absolute `index`, pulling
    /// from the source as needed. False when the source ran out first.
    fn fill_to(&mut self, index: usize) -> bool {
        while self.base + self.buffer.len() <= index {
            if self.exhausted {
                return false;
            }
            match self.source.next() {
                Some(item) => self.buffer.push(item),
                None => self.exhausted = true,
            }
        }
        true
    }
}

/// Multi-pass cursor over a single-pass iterator.
pub struct CachingCursor<I: Iterator> {
    shared: Rc<RefCell<Shared<I>>>,
    index: usize,
}

impl<I: Iterator> Clone for CachingCursor<I> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
            index: self.index,
        }
    }
}

impl<I: Iterator> CachingCursor<I>
where
    I::Item: Copy,
{
    pub fn new<T: IntoIterator<IntoIter = I>>(source: T) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                source: source.into_iter(),
                buffer: Vec::new(),
                base: 0,
                exhausted: false,
            })),
            index: 0,
        }
    }

    /// Absolute position in the stream.
    pub fn position(&self) -> usize {
        self.index
    }

    /// False once a `clear_cache` on another cursor dropped this position.
    pub fn is_valid(&self) -> bool {
        self.index >= self.shared.borrow().base
    }

    fn check(&self) -> Result<usize> {
        let base = self.shared.borrow().base;
        if self.index < base {
            return Err(CacheError::Invalidated {
                index: self.index,
                base,
            }
            .into());
        }
        Ok(self.index - base)
    }

    /// Read the next element.
    pub fn try_next(&mut self) -> Result<Option<I::Item>> {
        let rel = self.check()?;
        let mut shared = self.shared.borrow_mut();
        if !shared.fill_to(self.index) {
            return Ok(None);
        }
        let item = shared.buffer[rel];
        self.index += 1;
        Ok(Some(item))
    }

    /// Retained elements before this cursor.
    pub fn cached_range(&self) -> Result<Ref<'_, [I::Item]>> {
        let rel = self.check()?;
        Ok(Ref::map(self.shared.borrow(), |s| &s.buffer[..rel]))
    }

    /// Buffered elements at and after this cursor.
    pub fn look_ahead_range(&self) -> Result<Ref<'_, [I::Item]>> {
        let rel = self.check()?;
        Ok(Ref::map(self.shared.borrow(), |s| &s.buffer[rel..]))
    }

    /// Drop every buffered element before this cursor.
    ///
    /// Every other cursor positioned before this one becomes invalid.
    pub fn clear_cache(&mut self) -> Result<()> {
        let rel = self.check()?;
        let mut shared = self.shared.borrow_mut();
        shared.buffer.drain(..rel);
        shared.base = self.index;
        debug!("cache cleared: dropped {} elements, base now {}", rel, self.index);
        Ok(())
    }
}

impl<I: Iterator> InputCursor for CachingCursor<I>
where
    I::Item: Copy,
{
    type Unit = I::Item;

    fn next_unit(&mut self) -> Option<I::Item> {
        match self.try_next() {
            Ok(item) => item,
            Err(err) => {
                error!("read from invalidated caching cursor: {}", err);
                None
            }
        }
    }
}

impl<I: Iterator> ForwardCursor for CachingCursor<I>
where
    I::Item: Copy,
{
    fn offset(&self) -> usize {
        self.index
    }

    fn at_end(&self) -> bool {
        if !self.is_valid() {
            return true;
        }
        !self.shared.borrow_mut().fill_to(self.index)
    }
}

impl<I: Iterator> fmt::Debug for CachingCursor<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("CachingCursor")
            .field("index", &self.index)
            .field("base", &shared.base)
            .field("buffered", &shared.buffer.len())
            .field("exhausted", &shared.exhausted)
            .finish()
    }
}
