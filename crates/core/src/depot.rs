use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

type Slot = Box<dyn Any + Send + Sync>;

/// Depot is the binding context of one request dispatch.
///
/// Argument resolvers read from it, handler methods may write to it, and it is dropped together
/// with the request. Values are stored either by type ([`inject`](Depot::inject)) or by key
/// ([`insert`](Depot::insert)).
///
/// # Example
///
/// ```
/// use volley_core::Depot;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct User(&'static str);
///
/// let mut depot = Depot::new();
/// depot.inject(User("client")).insert("trace", 42u32);
/// assert_eq!(depot.obtain::<User>(), Some(&User("client")));
/// assert_eq!(depot.get::<u32>("trace"), Some(&42));
/// ```
#[derive(Default)]
pub struct Depot {
    typed: HashMap<TypeId, (&'static str, Slot)>,
    keyed: HashMap<String, Slot>,
}

impl Depot {
    /// Creates an empty `Depot`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a value into the depot, keyed by its type. A previous value of the same type is
    /// replaced.
    #[inline]
    pub fn inject<V: Any + Send + Sync>(&mut self, value: V) -> &mut Self {
        self.typed
            .insert(TypeId::of::<V>(), (type_name::<V>(), Box::new(value)));
        self
    }

    /// Obtain a reference to a value previously injected into the depot.
    #[inline]
    #[must_use]
    pub fn obtain<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.typed
            .get(&TypeId::of::<T>())
            .and_then(|(_, value)| value.downcast_ref::<T>())
    }

    /// Obtain a mutable reference to a value previously injected into the depot.
    #[inline]
    pub fn obtain_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.typed
            .get_mut(&TypeId::of::<T>())
            .and_then(|(_, value)| value.downcast_mut::<T>())
    }

    /// Take an injected value out of the depot.
    #[inline]
    pub fn scrape<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.typed
            .remove(&TypeId::of::<T>())
            .and_then(|(_, value)| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    /// Inserts a key-value pair into the depot.
    #[inline]
    pub fn insert<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Any + Send + Sync,
    {
        self.keyed.insert(key.into(), Box::new(value));
        self
    }

    /// Check is there a value stored in depot with this key.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.keyed.contains_key(key)
    }

    /// Immutably borrows the value stored under `key`.
    ///
    /// Returns `None` when the key is missing or holds a value of another type.
    #[inline]
    #[must_use]
    pub fn get<V: Any + Send + Sync>(&self, key: &str) -> Option<&V> {
        self.keyed.get(key).and_then(|value| value.downcast_ref::<V>())
    }

    /// Mutably borrows the value stored under `key`.
    #[inline]
    pub fn get_mut<V: Any + Send + Sync>(&mut self, key: &str) -> Option<&mut V> {
        self.keyed
            .get_mut(key)
            .and_then(|value| value.downcast_mut::<V>())
    }

    /// Remove the value stored under `key`. The entry is left untouched if it holds another type.
    pub fn remove<V: Any + Send + Sync>(&mut self, key: &str) -> Option<V> {
        if !self.keyed.get(key).is_some_and(|value| value.is::<V>()) {
            return None;
        }
        self.keyed
            .remove(key)
            .and_then(|value| value.downcast::<V>().ok())
            .map(|value| *value)
    }
}

impl Debug for Depot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Depot")
            .field("types", &self.typed.values().map(|(name, _)| *name).collect::<Vec<_>>())
            .field("keys", &self.keyed.keys())
            .finish()
    }
}
