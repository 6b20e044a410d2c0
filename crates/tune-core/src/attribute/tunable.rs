use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use thiserror::Error;
use tune_model::{AttrType, AttrValue};

/// Failure to read or write a registered attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("attribute storage is poisoned")]
    Poisoned,

    #[error("expected {expected} value, got {actual}")]
    TypeMismatch { expected: AttrType, actual: AttrType },

    #[error("{0}")]
    Other(String),
}

/// Typed accessor surface of one attribute.
///
/// Implemented by [`Tunable`] for the four supported scalar types; services with
/// custom storage can implement it directly and register via
/// [`crate::AttributeTableBuilder::custom`].
pub trait AttributeAccess: Send + Sync {
    /// Native type, fixed for the lifetime of the attribute.
    fn attr_type(&self) -> AttrType;

    /// Current value.
    fn read(&self) -> Result<AttrValue, AccessError>;

    /// Replace the current value. `value` must be of [`Self::attr_type`].
    fn write(&self, value: AttrValue) -> Result<(), AccessError>;
}

/// Shared runtime-tunable value.
///
/// Cloning yields another handle to the same storage: the service keeps one
/// handle for its request path and registers another in its attribute table.
///
/// # Examples
/// ```
/// use tune_core::Tunable;
///
/// let delay = Tunable::new(1000_i64);
/// let handle = delay.clone();
/// handle.set(2000);
/// assert_eq!(delay.get(), 2000);
/// ```
pub struct Tunable<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Clone for Tunable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Tunable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Tunable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.read() {
            Ok(v) => f.debug_tuple("Tunable").field(&*v).finish(),
            Err(_) => f.write_str("Tunable(<poisoned>)"),
        }
    }
}

impl<T> Tunable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Replace the value.
    ///
    /// Request handlers never fail on a poisoned lock; the last written value wins.
    pub fn set(&self, value: T) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    fn try_set(&self, value: T) -> Result<(), AccessError> {
        let mut guard = self.inner.write().map_err(|_| AccessError::Poisoned)?;
        *guard = value;
        Ok(())
    }
}

impl<T: Clone> Tunable<T> {
    /// Current value as seen by request handlers.
    pub fn get(&self) -> T {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn try_get(&self) -> Result<T, AccessError> {
        self.inner
            .read()
            .map(|v| v.clone())
            .map_err(|_| AccessError::Poisoned)
    }
}

macro_rules! impl_access {
    ($ty:ty, $variant:ident) => {
        impl AttributeAccess for Tunable<$ty> {
            #[inline]
            fn attr_type(&self) -> AttrType {
                AttrType::$variant
            }

            fn read(&self) -> Result<AttrValue, AccessError> {
                self.try_get().map(AttrValue::$variant)
            }

            fn write(&self, value: AttrValue) -> Result<(), AccessError> {
                match value {
                    AttrValue::$variant(v) => self.try_set(v),
                    other => Err(AccessError::TypeMismatch {
                        expected: AttrType::$variant,
                        actual: other.attr_type(),
                    }),
                }
            }
        }
    };
}

impl_access!(i32, Int);
impl_access!(i64, Long);
impl_access!(bool, Bool);
impl_access!(String, Text);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let a = Tunable::new(String::from("Hello"));
        let b = a.clone();
        b.set("Bye".into());
        assert_eq!(a.get(), "Bye");
    }

    #[test]
    fn access_reads_and_writes_native_values() {
        let t = Tunable::new(5030_i32);
        assert_eq!(t.attr_type(), AttrType::Int);
        assert_eq!(t.read().unwrap(), AttrValue::Int(5030));

        t.write(AttrValue::Int(7)).unwrap();
        assert_eq!(t.get(), 7);
    }

    #[test]
    fn write_rejects_foreign_type() {
        let t = Tunable::new(true);
        let err = t.write(AttrValue::Text("true".into())).unwrap_err();
        assert_eq!(
            err,
            AccessError::TypeMismatch {
                expected: AttrType::Bool,
                actual: AttrType::Text
            }
        );
        assert!(t.get());
    }

    #[test]
    fn poisoned_storage_fails_access_but_not_request_path() {
        let t = Tunable::new(10_i64);
        let poison = t.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poison.inner.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(t.read(), Err(AccessError::Poisoned));
        assert_eq!(t.write(AttrValue::Long(1)), Err(AccessError::Poisoned));
        assert_eq!(t.get(), 10);
    }
}
