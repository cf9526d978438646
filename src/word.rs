//! Word: the single machine-word value stored per entry.

/// A pointer-sized value, read either as an integer or as an opaque handle.
///
/// The table never interprets a `Word`; zero is an ordinary value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Word(usize);

impl Word {
    pub const ZERO: Word = Word(0);

    #[inline]
    pub const fn new(v: usize) -> Self {
        Word(v)
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Stores the address of `ptr`. The table does not keep the pointee alive.
    #[inline]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Word(ptr as usize)
    }

    #[inline]
    pub fn from_mut_ptr<T>(ptr: *mut T) -> Self {
        Word(ptr as usize)
    }

    /// Reinterprets the word as a pointer. Dereferencing it is only sound if
    /// the word was produced by [`Word::from_ptr`] for a still-live `T`.
    #[inline]
    pub fn as_ptr<T>(self) -> *const T {
        self.0 as *const T
    }

    #[inline]
    pub fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }
}

impl From<usize> for Word {
    #[inline]
    fn from(v: usize) -> Self {
        Word(v)
    }
}

impl From<Word> for usize {
    #[inline]
    fn from(w: Word) -> Self {
        w.0
    }
}
