//! Native object handles - opaque addresses owned by the embedding runtime
//!
//! Design: Handles are plain addresses with no ownership attached:
//! - `#[repr(transparent)]` so they cross the slot ABI unchanged
//! - Null is the runtime's "no value" marker
//! - Reference counts are never touched here; the host does that

use core::ffi::c_void;
use core::fmt;

/// Address of an object in the embedding runtime (8 bytes on 64-bit)
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    ptr: *mut c_void,
}

// Handles are addresses only; the runtime serialises access to the objects.
unsafe impl Send for ObjectHandle {}
unsafe impl Sync for ObjectHandle {}

impl ObjectHandle {
    /// Null handle (failure sentinel and "no value" marker)
    #[inline]
    pub const fn null() -> Self {
        Self {
            ptr: core::ptr::null_mut(),
        }
    }

    /// Wrap a raw address handed over by the runtime
    #[inline]
    pub const fn from_raw(ptr: *mut c_void) -> Self {
        Self { ptr }
    }

    #[inline]
    pub const fn as_raw(self) -> *mut c_void {
        self.ptr
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.ptr.is_null()
    }

    /// `None` for the null marker
    #[inline]
    pub fn non_null(self) -> Option<Self> {
        if self.is_null() {
            None
        } else {
            Some(self)
        }
    }

    #[inline]
    pub fn addr(self) -> usize {
        self.ptr as usize
    }
}

impl Default for ObjectHandle {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectHandle({:p})", self.ptr)
    }
}

/// Runtime type identity of an instance (address of its type object)
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(pub usize);

impl TypeKey {
    #[inline]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type@{:#x}", self.0)
    }
}
