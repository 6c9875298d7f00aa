use std::any::{Any, type_name};
use std::fmt::{self, Debug, Formatter};

use super::descriptor::short_type_name;
use super::{ArgumentError, TypeDescriptor};

type DebugFn = fn(&(dyn Any + Send + Sync), &mut Formatter<'_>) -> fmt::Result;

fn debug_as<T: Any + Debug>(value: &(dyn Any + Send + Sync), f: &mut Formatter<'_>) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(value) => Debug::fmt(value, f),
        None => f.write_str("<?>"),
    }
}

/// A type-erased argument or return value.
///
/// A value may also be *lent*: a placeholder for an object the invoker passes to the method
/// directly, such as the [`Request`](crate::Request) or [`Response`](crate::Response).
pub struct Value {
    inner: Box<dyn Any + Send + Sync>,
    ty: TypeDescriptor,
    lent: bool,
    debug: DebugFn,
}

impl Value {
    /// Wrap `value`.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync + Debug,
    {
        Self {
            inner: Box::new(value),
            ty: TypeDescriptor::of::<T>(),
            lent: false,
            debug: debug_as::<T>,
        }
    }

    /// Placeholder for a `T` the invoker lends to the method.
    #[must_use]
    pub fn lent<T: Any>() -> Self {
        fn debug_lent(_: &(dyn Any + Send + Sync), f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str("<lent>")
        }
        Self {
            inner: Box::new(()),
            ty: TypeDescriptor::of::<T>(),
            lent: true,
            debug: debug_lent,
        }
    }

    /// Descriptor of the held type.
    #[inline]
    #[must_use]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// Held type without module paths.
    #[must_use]
    pub fn type_name(&self) -> String {
        short_type_name(self.ty.name())
    }

    /// Whether the held type is `T`. Also `true` for a value lent as `T`.
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.ty.is::<T>()
    }

    /// Whether this is a lent placeholder.
    #[inline]
    #[must_use]
    pub fn is_lent(&self) -> bool {
        self.lent
    }

    /// Borrow the held `T`. Returns `None` on type mismatch or for a lent value.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        if self.lent {
            None
        } else {
            self.inner.downcast_ref::<T>()
        }
    }

    /// Take out the held `T`, or get `self` back on type mismatch or for a lent value.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        if self.lent || !self.is::<T>() {
            return Err(self);
        }
        let Self { inner, ty, lent, debug } = self;
        inner.downcast::<T>().map(|boxed| *boxed).map_err(|inner| Self {
            inner,
            ty,
            lent,
            debug,
        })
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        (self.debug)(&*self.inner, f)
    }
}

/// Resolved arguments of one invocation, one slot per method parameter.
#[derive(Debug, Default)]
pub struct Arguments {
    values: Vec<Option<Value>>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Option<Value>>) -> Self {
        Self { values }
    }

    /// Number of slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the method takes no parameters.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw slot at `index`.
    #[inline]
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Iterate the slots in parameter order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> {
        self.values.iter().map(Option::as_ref)
    }

    /// Borrow the argument at `index` as a `T`; an absent argument is an error.
    pub fn get<T: Any>(&self, index: usize) -> Result<&T, ArgumentError> {
        self.optional::<T>(index)?.ok_or_else(|| ArgumentError::Absent {
            index,
            expected: short_type_name(type_name::<T>()),
        })
    }

    /// Borrow the argument at `index` as a `T`, `None` when it is absent.
    pub fn optional<T: Any>(&self, index: usize) -> Result<Option<&T>, ArgumentError> {
        let slot = self.values.get(index).ok_or(ArgumentError::OutOfRange {
            index,
            len: self.values.len(),
        })?;
        let Some(value) = slot else {
            return Ok(None);
        };
        if value.is_lent() {
            return Err(ArgumentError::Lent { index });
        }
        value.downcast_ref::<T>().map(Some).ok_or_else(|| ArgumentError::TypeMismatch {
            index,
            expected: short_type_name(type_name::<T>()),
            actual: value.type_name(),
        })
    }

    /// Render the slots for diagnostics, one line per argument.
    pub(crate) fn describe(&self) -> String {
        let mut out = String::new();
        for (index, slot) in self.values.iter().enumerate() {
            match slot {
                Some(value) => {
                    out.push_str(&format!("\n [{index}] [type={}] [value={value:?}]", value.type_name()));
                }
                None => out.push_str(&format!("\n [{index}] [null]")),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Response;

    #[test]
    fn test_value_downcast() {
        let value = Value::new(7u32);
        assert!(value.is::<u32>());
        assert_eq!(value.downcast_ref::<u32>(), Some(&7));
        assert!(value.downcast_ref::<i64>().is_none());
        let value = value.downcast::<String>().unwrap_err();
        assert_eq!(value.downcast::<u32>().unwrap(), 7);
    }

    #[test]
    fn test_lent_value() {
        let value = Value::lent::<Response>();
        assert!(value.is::<Response>());
        assert!(value.is_lent());
        assert!(value.downcast_ref::<()>().is_none());
        assert_eq!(format!("{value:?}"), "<lent>");
    }

    #[test]
    fn test_value_debug() {
        assert_eq!(format!("{:?}", Value::new(1i32)), "1");
        assert_eq!(format!("{:?}", Value::new("a".to_owned())), "\"a\"");
    }

    #[test]
    fn test_arguments_access() {
        let args = Arguments::new(vec![Some(Value::new("v".to_owned())), None, Some(Value::lent::<Response>())]);
        assert_eq!(args.get::<String>(0).unwrap(), "v");
        assert!(args.optional::<String>(1).unwrap().is_none());
        assert!(matches!(args.get::<String>(1), Err(ArgumentError::Absent { index: 1, .. })));
        assert!(matches!(args.get::<Response>(2), Err(ArgumentError::Lent { index: 2 })));
        assert!(matches!(args.get::<i32>(0), Err(ArgumentError::TypeMismatch { index: 0, .. })));
        assert!(matches!(args.get::<i32>(3), Err(ArgumentError::OutOfRange { index: 3, len: 3 })));
    }

    #[test]
    fn test_arguments_describe() {
        let args = Arguments::new(vec![Some(Value::new(1i32)), None]);
        assert_eq!(args.describe(), "\n [0] [type=i32] [value=1]\n [1] [null]");
    }
}
