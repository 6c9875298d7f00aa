use std::any::{Any, TypeId, type_name};
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

/// Runtime stand-in for the static type of a parameter, a return value or a decoded element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
    nullable: bool,
}

impl TypeDescriptor {
    /// Descriptor for `T`. The slot must always hold a value.
    #[inline]
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            nullable: false,
        }
    }

    /// Descriptor for `Option<T>`: values are of type `T`, but the slot may be left empty.
    #[inline]
    #[must_use]
    pub fn optional<T: Any>() -> Self {
        Self {
            nullable: true,
            ..Self::of::<T>()
        }
    }

    /// The `TypeId` of the value type.
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Full path of the value type, as reported by [`std::any::type_name`].
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the slot can represent absence.
    #[inline]
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether values of this descriptor are of type `T`.
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", short_type_name(self.name))
        } else {
            f.write_str(&short_type_name(self.name))
        }
    }
}

/// Strip module paths from a type name: `core::option::Option<alloc::string::String>` becomes
/// `Option<String>`.
pub(crate) fn short_type_name(full: &str) -> String {
    fn push_last_segment(out: &mut String, path: &str) {
        out.push_str(path.rsplit("::").next().unwrap_or(path));
    }

    let mut out = String::with_capacity(full.len());
    let mut start = 0;
    for (i, c) in full.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '&' | '(' | ')' | '[' | ']' | ';' | '*') {
            push_last_segment(&mut out, &full[start..i]);
            out.push(c);
            start = i + c.len_utf8();
        }
    }
    push_last_segment(&mut out, &full[start..]);
    out
}

/// Where a parameter's value is expected to come from.
///
/// Resolvers use it, together with the parameter type, to decide whether they support a
/// parameter.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
#[non_exhaustive]
pub enum SourceFrom {
    /// A request header, named by the parameter name.
    Header,
    /// A query string value, named by the parameter name.
    Query,
    /// A value stored in the [`Depot`](crate::Depot), by key when the parameter is named, by type
    /// otherwise.
    Depot,
}

/// A formal parameter of a [`HandlerMethod`](super::HandlerMethod).
#[derive(Clone, Debug)]
pub struct MethodParameter {
    index: usize,
    ty: TypeDescriptor,
    name: Option<Cow<'static, str>>,
    source: Option<SourceFrom>,
}

impl MethodParameter {
    /// Create a parameter at position `index` with type `ty`.
    #[must_use]
    pub fn new(index: usize, ty: TypeDescriptor) -> Self {
        Self {
            index,
            ty,
            name: None,
            source: None,
        }
    }

    /// Sets the parameter name and returns `Self`.
    #[must_use]
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the parameter source and returns `Self`.
    #[must_use]
    pub fn source(mut self, source: SourceFrom) -> Self {
        self.source = Some(source);
        self
    }

    /// Position in the method's parameter list.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Declared type.
    #[inline]
    #[must_use]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// Declared name, if any.
    #[inline]
    #[must_use]
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared source, if any.
    #[inline]
    #[must_use]
    pub fn get_source(&self) -> Option<SourceFrom> {
        self.source
    }
}

/// Declared return type of a [`HandlerMethod`](super::HandlerMethod).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnType {
    /// The method returns nothing; it handles the response by side effect.
    Unit,
    /// The method completes asynchronously without a payload, e.g. after streaming a body.
    Completion,
    /// The method produces a value for the dispatch layer.
    Value(TypeDescriptor),
}

impl ReturnType {
    /// Return type producing a `T`.
    #[inline]
    #[must_use]
    pub fn value<T: Any>() -> Self {
        Self::Value(TypeDescriptor::of::<T>())
    }

    /// Return type producing an `Option<T>`.
    #[inline]
    #[must_use]
    pub fn optional<T: Any>() -> Self {
        Self::Value(TypeDescriptor::optional::<T>())
    }

    /// `true` for [`Unit`](Self::Unit) and [`Completion`](Self::Completion).
    #[inline]
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Unit | Self::Completion)
    }
}

impl Display for ReturnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("()"),
            Self::Completion => f.write_str("impl Future<Output = ()>"),
            Self::Value(ty) => Display::fmt(ty, f),
        }
    }
}
