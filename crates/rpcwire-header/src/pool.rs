//! Reuse pool for request headers.
//!
//! [`RequestHeaderPool::get`] hands out a [`PooledRequestHeader`] guard that
//! owns its header exclusively. Dropping the guard resets the header and
//! returns it to the pool, so a stale method name or id can never reach the
//! next checkout, including when the holder bails out early with `?` or
//! unwinds.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

use crate::request::RequestHeader;

/// Default number of idle headers kept by a pool.
pub const DEFAULT_POOL_CAPACITY: usize = 16;

/// Pool of reusable [`RequestHeader`] instances.
#[derive(Debug)]
pub struct RequestHeaderPool {
    idle: Mutex<Vec<RequestHeader>>,
    capacity: usize,
}

impl RequestHeaderPool {
    /// Create an empty pool keeping up to [`DEFAULT_POOL_CAPACITY`] idle headers.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// Create an empty pool keeping up to `capacity` idle headers.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Check out a zeroed header.
    pub fn get(&self) -> PooledRequestHeader<'_> {
        let header = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default();
        PooledRequestHeader { header, pool: self }
    }

    /// Number of idle headers waiting for reuse.
    pub fn idle(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Maximum number of idle headers kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn put(&self, mut header: RequestHeader) {
        header.reset();
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.capacity {
            idle.push(header);
        }
    }
}

impl Default for RequestHeaderPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A checked-out request header; resets and returns itself on drop.
#[derive(Debug)]
pub struct PooledRequestHeader<'a> {
    header: RequestHeader,
    pool: &'a RequestHeaderPool,
}

impl Deref for PooledRequestHeader<'_> {
    type Target = RequestHeader;

    fn deref(&self) -> &RequestHeader {
        &self.header
    }
}

impl DerefMut for PooledRequestHeader<'_> {
    fn deref_mut(&mut self) -> &mut RequestHeader {
        &mut self.header
    }
}

impl Drop for PooledRequestHeader<'_> {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.header));
    }
}
