//! Generic lifecycle pool: create, retrieve, release.
//!
//! The pool only stores idle instances. It never resets or deactivates what it
//! is given back; callers put items into their idle state before `release`.
//! Releasing the same item twice is not detected.

use std::convert::Infallible;

/// Produces new pool items on demand.
pub trait Factory<T> {
    type Error;

    fn create(&mut self) -> Result<T, Self::Error>;
}

impl<T, E, F> Factory<T> for F
where
    F: FnMut() -> Result<T, E>,
{
    type Error = E;

    fn create(&mut self) -> Result<T, E> {
        self()
    }
}

/// Adapter for factories that cannot fail; see [`Pool::from_fn`].
#[derive(Clone, Debug)]
pub struct FnFactory<G>(G);

impl<T, G> Factory<T> for FnFactory<G>
where
    G: FnMut() -> T,
{
    type Error = Infallible;

    fn create(&mut self) -> Result<T, Infallible> {
        Ok((self.0)())
    }
}

/// Free list of reusable `T`s backed by a factory `F`.
#[derive(Debug)]
pub struct Pool<T, F> {
    items: Vec<T>,
    factory: F,
    created: usize,
}

impl<T, F> Pool<T, F>
where
    F: Factory<T>,
{
    pub fn new(factory: F) -> Self {
        Self::with_capacity(factory, 0)
    }

    pub fn with_capacity(factory: F, capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            factory,
            created: 0,
        }
    }

    /// Build a new instance through the factory without touching the free list.
    /// Factory errors are returned as-is.
    pub fn create(&mut self) -> Result<T, F::Error> {
        let item = self.factory.create()?;
        self.created += 1;
        log::debug!("pool grew: {} instance(s) created", self.created);
        Ok(item)
    }

    /// Take an idle instance, creating one when the free list is empty.
    pub fn retrieve(&mut self) -> Result<T, F::Error> {
        match self.items.pop() {
            Some(item) => Ok(item),
            None => self.create(),
        }
    }

    /// Return an instance to the free list.
    pub fn release(&mut self, item: T) {
        self.items.push(item);
    }

    /// Fill the free list up to `count` idle instances.
    pub fn prewarm(&mut self, count: usize) -> Result<(), F::Error> {
        while self.items.len() < count {
            let item = self.create()?;
            self.items.push(item);
        }
        Ok(())
    }

    /// Number of idle instances.
    #[inline]
    pub fn available(&self) -> usize {
        self.items.len()
    }

    /// Total factory invocations over the pool's lifetime.
    #[inline]
    pub fn created(&self) -> usize {
        self.created
    }

    /// Drop every idle instance. Items currently held by callers are unaffected.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<T, G> Pool<T, FnFactory<G>>
where
    G: FnMut() -> T,
{
    /// Pool over an infallible constructor.
    pub fn from_fn(f: G) -> Self {
        Self::new(FnFactory(f))
    }

    /// Infallible form of [`Pool::retrieve`].
    pub fn get(&mut self) -> T {
        match self.retrieve() {
            Ok(item) => item,
            Err(never) => match never {},
        }
    }
}
