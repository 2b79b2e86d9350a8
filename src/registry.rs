use crate::{DriverError, Sink, SinkFactory, DEFAULT_DRIVER};
use std::{
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

// A reserved place for the sink of one name; it is filled exactly once.
type Slot = Arc<OnceLock<Arc<Sink>>>;

/// Thread-safe, lazily populated mapping from driver names to their [`Sink`]s.
///
/// The registry holds the `"default"` driver from its construction on.
/// Further drivers are built on their first request and are never removed.
///
/// ## Construction discipline
///
/// For each name, exactly one sink is built, also if many threads request
/// a new name concurrently: the first request reserves a slot for the name
/// (under a short write lock on the map), and the sink is then built into that slot,
/// outside the map lock. Concurrent requests for the same name wait for this construction
/// and then share its result; requests for other names are not blocked by it.
/// Thus no surplus sink is ever built, and no log file is opened that is not used afterwards.
pub struct DriverRegistry {
    factory: SinkFactory,
    drivers: RwLock<HashMap<String, Slot>>,
}
impl DriverRegistry {
    /// Creates the registry, and builds and registers the `"default"` driver.
    #[must_use]
    pub fn new(factory: SinkFactory) -> Self {
        let default_slot: Slot = Arc::new(OnceLock::from(Arc::new(factory.build_default())));
        let mut drivers = HashMap::new();
        drivers.insert(DEFAULT_DRIVER.to_string(), default_slot);
        Self {
            factory,
            drivers: RwLock::new(drivers),
        }
    }

    /// The factory that builds the sinks of this registry.
    #[must_use]
    pub fn factory(&self) -> &SinkFactory {
        &self.factory
    }

    /// Returns the sink for the given name, and builds and registers it if necessary.
    ///
    /// The empty name denotes the `"default"` driver, and so does the file stem
    /// of the `"default"` driver (see [`SinkFactory::default_stem`]),
    /// since two sinks must never rotate the same file.
    #[must_use]
    pub fn get_or_create(&self, name: &str) -> Arc<Sink> {
        let name = self.normalize(name);
        let slot = self.slot(name);
        Arc::clone(slot.get_or_init(|| Arc::new(self.factory.build(name))))
    }

    /// Returns the sink for the given name, if it exists already.
    ///
    /// Names are resolved as with [`DriverRegistry::get_or_create`].
    ///
    /// # Errors
    ///
    /// `DriverError::UnknownDriver` if no driver is registered with this name,
    /// `DriverError::InvariantViolated` if the `"default"` driver is missing.
    pub fn get(&self, name: &str) -> Result<Arc<Sink>, DriverError> {
        let name = self.normalize(name);
        self.read()
            .get(name)
            .and_then(|slot| slot.get().map(Arc::clone))
            .ok_or_else(|| {
                if name == DEFAULT_DRIVER {
                    DriverError::InvariantViolated("the default driver is missing")
                } else {
                    DriverError::UnknownDriver(name.to_string())
                }
            })
    }

    /// Calls the given function for all registered drivers.
    ///
    /// The function works on a snapshot that is taken when the iteration starts;
    /// drivers that are registered concurrently may or may not be visited.
    /// No lock is held while the function runs, so it may itself use the registry.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &Sink),
    {
        for (name, sink) in self.snapshot() {
            f(&name, &sink);
        }
    }

    /// Flushes all drivers.
    ///
    /// A failing driver does not keep the others from being flushed;
    /// all failures are returned, together with the names of the failing drivers.
    #[must_use]
    pub fn sync_all(&self) -> Vec<(String, std::io::Error)> {
        let mut failures = Vec::new();
        self.for_each(|name, sink| {
            if let Err(e) = sink.sync() {
                failures.push((name.to_string(), e));
            }
        });
        failures
    }

    /// The names of all registered drivers, in no particular order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.snapshot().into_iter().map(|(name, _)| name).collect()
    }

    /// The number of registered drivers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Always false, because the `"default"` driver exists from the construction on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if a driver with the given name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    // the empty name and the default file stem both denote the default driver
    fn normalize<'a>(&'a self, name: &'a str) -> &'a str {
        if name.is_empty() || name == self.factory.default_stem() {
            DEFAULT_DRIVER
        } else {
            name
        }
    }

    // the reserved slot for the name, reserving it if necessary
    fn slot(&self, name: &str) -> Slot {
        if let Some(slot) = self.read().get(name) {
            return Arc::clone(slot);
        }
        Arc::clone(self.write().entry(name.to_string()).or_default())
    }

    // only slots whose sink is completely built are contained
    fn snapshot(&self) -> Vec<(String, Arc<Sink>)> {
        self.read()
            .iter()
            .filter_map(|(name, slot)| slot.get().map(|sink| (name.clone(), Arc::clone(sink))))
            .collect()
    }

    // A poisoned lock is still consistent, since the map is only modified by single inserts.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Slot>> {
        self.drivers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Slot>> {
        self.drivers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.debug_struct("DriverRegistry")
            .field("factory", &self.factory)
            .field("drivers", &self.names())
            .finish()
    }
}
