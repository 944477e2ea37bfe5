use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Typed key into a [`Report`]. The phantom type ties the key to the type of
/// the value stored under it, so `get` and `set` cannot disagree.
#[derive(Debug)]
pub struct Property<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Property<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Accumulating key-value side channel threaded through one validation call.
///
/// Cloning yields an independent report: values are stored behind `Arc` and
/// only ever replaced whole, so mutations on a clone never leak back. The
/// OR-junction relies on this to discard the attempts of failed branches.
#[derive(Debug, Clone, Default)]
pub struct Report {
    values: HashMap<&'static str, Arc<dyn Any + Send + Sync>>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Any + Send + Sync>(&mut self, property: &Property<T>, value: T) {
        self.values.insert(property.name, Arc::new(value));
    }

    pub fn get<T: Any + Send + Sync>(&self, property: &Property<T>) -> Option<&T> {
        self.values
            .get(property.name)
            .and_then(|value| (**value).downcast_ref::<T>())
    }

    pub fn contains<T: Any + Send + Sync>(&self, property: &Property<T>) -> bool {
        self.get(property).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
