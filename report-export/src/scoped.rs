use std::ops::{Deref, DerefMut};

/// Tài nguyên host chỉ sống trong một lần xuất (khung in, object URL).
pub trait TransientResource {
    fn release(&mut self);
}

/// Giữ một [`TransientResource`] và giải phóng đúng một lần khi bị drop.
#[derive(Debug)]
pub struct Scoped<R: TransientResource> {
    inner: R,
    released: bool,
}

impl<R: TransientResource> Scoped<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            released: false,
        }
    }

    /// Giải phóng ngay thay vì chờ drop.
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.inner.release();
        }
    }
}

impl<R: TransientResource> Deref for Scoped<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.inner
    }
}

impl<R: TransientResource> DerefMut for Scoped<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.inner
    }
}

impl<R: TransientResource> Drop for Scoped<R> {
    fn drop(&mut self) {
        self.release_once();
    }
}
