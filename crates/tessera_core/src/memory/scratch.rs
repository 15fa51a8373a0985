//! # Scratch Buffer
//!
//! Fixed-capacity buffer for transient per-call data (tessellated vertices,
//! normals, texcoords, indices, interpolated positions).

use bytemuck::Pod;
use thiserror::Error;

/// Returned when a write would exceed a scratch buffer's fixed capacity.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("scratch capacity exceeded: capacity {capacity}, in use {len}, requested {requested}")]
pub struct CapacityError {
    /// Fixed capacity of the buffer.
    pub capacity: usize,
    /// Elements already stored.
    pub len: usize,
    /// Elements the caller tried to add.
    pub requested: usize,
}

/// A fixed-capacity, pre-allocated buffer.
///
/// Unlike a `Vec`, pushing past the capacity never reallocates: it fails
/// with a [`CapacityError`] and leaves the contents untouched.
///
/// # Thread Safety
///
/// The buffer is owned by one draw call at a time. Use one per thread.
///
/// # Example
///
/// ```rust,ignore
/// let mut indices: ScratchBuffer<u32> = ScratchBuffer::new(768);
///
/// // O(1), no heap allocation
/// indices.push(0)?;
///
/// // Reuse for the next run - memory is kept
/// indices.clear();
/// ```
#[derive(Debug, Clone)]
pub struct ScratchBuffer<T> {
    /// The storage, never grown past `capacity`.
    storage: Vec<T>,
    /// Total capacity.
    capacity: usize,
}

impl<T: Copy> ScratchBuffer<T> {
    /// Creates a new buffer with the specified capacity.
    ///
    /// All memory is pre-allocated upfront.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of elements
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of stored elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true when nothing is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns the number of free slots.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity - self.storage.len()
    }

    /// Returns true when `count` more elements fit.
    #[inline]
    #[must_use]
    pub fn fits(&self, count: usize) -> bool {
        count <= self.remaining()
    }

    fn check(&self, requested: usize) -> Result<(), CapacityError> {
        if self.fits(requested) {
            Ok(())
        } else {
            Err(CapacityError {
                capacity: self.capacity,
                len: self.storage.len(),
                requested,
            })
        }
    }

    /// Appends one element.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the buffer is full.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), CapacityError> {
        self.check(1)?;
        self.storage.push(value);
        Ok(())
    }

    /// Appends a slice, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the slice does not fit; nothing is written.
    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), CapacityError> {
        self.check(values.len())?;
        self.storage.extend_from_slice(values);
        Ok(())
    }

    /// Resizes to exactly `len` elements filled with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `len` exceeds the capacity.
    pub fn reset_to(&mut self, len: usize, value: T) -> Result<(), CapacityError> {
        if len > self.capacity {
            return Err(CapacityError {
                capacity: self.capacity,
                len: 0,
                requested: len,
            });
        }
        self.storage.clear();
        self.storage.resize(len, value);
        Ok(())
    }

    /// Clears all elements. Memory is kept.
    #[inline]
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// Stored elements.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.storage
    }

    /// Stored elements, mutable.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.storage
    }

    /// Element at `index`, if stored.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.storage.get(index)
    }
}

impl<T: Pod> ScratchBuffer<T> {
    /// Returns the stored elements as bytes for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut buffer: ScratchBuffer<u32> = ScratchBuffer::new(2);

        assert!(buffer.push(1).is_ok());
        assert!(buffer.push(2).is_ok());
        let err = buffer.push(3).unwrap_err();

        assert_eq!(err.capacity, 2);
        assert_eq!(err.len, 2);
        assert_eq!(err.requested, 1);
        assert_eq!(buffer.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_extend_is_all_or_nothing() {
        let mut buffer: ScratchBuffer<u32> = ScratchBuffer::new(4);
        buffer.extend_from_slice(&[1, 2, 3]).unwrap();

        assert!(buffer.extend_from_slice(&[4, 5]).is_err());
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.remaining(), 1);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut buffer: ScratchBuffer<f32> = ScratchBuffer::new(8);
        buffer.extend_from_slice(&[1.0; 8]).unwrap();
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 8);
        assert!(buffer.fits(8));
    }

    #[test]
    fn test_reset_to() {
        let mut buffer: ScratchBuffer<u16> = ScratchBuffer::new(3);
        buffer.reset_to(3, 7).unwrap();
        assert_eq!(buffer.as_slice(), &[7, 7, 7]);
        assert!(buffer.reset_to(4, 0).is_err());
    }

    #[test]
    fn test_as_bytes() {
        let mut buffer: ScratchBuffer<u32> = ScratchBuffer::new(2);
        buffer.push(1).unwrap();
        assert_eq!(buffer.as_bytes().len(), 4);
    }
}
