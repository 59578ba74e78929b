//! # System — logic that spans entities
//!
//! Components handle what one entity does to itself. Anything that looks at
//! two groups at once (monsters chasing the player, projectiles against
//! terrain) is a system: a function over the whole [`Registry`].
//!
//! ```text
//! Schedule [track_player, resolve_terrain, projectile_hits]
//!    run(&mut registry) ──► each system in insertion order
//! ```
//!
//! Systems run after `Registry::update()`, so they see the positions the
//! components just produced.

use super::registry::Registry;

/// Anything that can be run against a [`Registry`]. Implemented for every
/// `FnMut(&mut Registry)`.
pub trait System {
    fn run(&mut self, registry: &mut Registry);
}

impl<F: FnMut(&mut Registry)> System for F {
    fn run(&mut self, registry: &mut Registry) {
        (self)(registry);
    }
}

struct NamedSystem {
    #[cfg(any(feature = "diagnostics", test))]
    name: String,
    system: Box<dyn System>,
}

/// How long one system took in the most recent [`Schedule::run`].
#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone, serde::Serialize)]
pub struct SystemTiming {
    pub name: String,
    pub duration_us: f64,
}

/// Ordered list of systems.
#[derive(Default)]
pub struct Schedule {
    systems: Vec<NamedSystem>,
    #[cfg(feature = "diagnostics")]
    timings: Vec<SystemTiming>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(NamedSystem {
            #[cfg(any(feature = "diagnostics", test))]
            name: short_system_name(std::any::type_name::<S>()),
            system: Box::new(system),
        });
    }

    /// Builder form of [`add_system`](Self::add_system).
    pub fn with_system<S: System + 'static>(mut self, system: S) -> Self {
        self.add_system(system);
        self
    }

    pub fn run(&mut self, registry: &mut Registry) {
        #[cfg(feature = "diagnostics")]
        {
            self.timings.clear();
            for ns in &mut self.systems {
                let start = std::time::Instant::now();
                ns.system.run(registry);
                self.timings.push(SystemTiming {
                    name: ns.name.clone(),
                    duration_us: start.elapsed().as_secs_f64() * 1_000_000.0,
                });
            }
        }
        #[cfg(not(feature = "diagnostics"))]
        {
            for ns in &mut self.systems {
                ns.system.run(registry);
            }
        }
    }

    /// Per-system timings from the most recent `run()`.
    #[cfg(feature = "diagnostics")]
    pub fn timings(&self) -> &[SystemTiming] {
        &self.timings
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

/// `skogr::systems::track_player` → `track_player`, closures → `<closure>`.
#[cfg(any(feature = "diagnostics", test))]
fn short_system_name(full: &str) -> String {
    let name = full.rsplit("::").next().unwrap_or(full);
    if name.contains("closure") {
        "<closure>".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_entities(registry: &mut Registry) {
        let n = registry.entity_count() as u32;
        registry.insert_resource(n);
    }

    #[test]
    fn systems_run_in_insertion_order() {
        let mut registry = Registry::new();
        registry.add_entity();
        let mut schedule = Schedule::new()
            .with_system(|r: &mut Registry| {
                r.add_entity();
            })
            .with_system(count_entities);
        schedule.run(&mut registry);
        assert_eq!(*registry.resource::<u32>(), 2);
        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn names_are_shortened() {
        let mut schedule = Schedule::new();
        schedule.add_system(count_entities);
        schedule.add_system(|_: &mut Registry| {});
        assert_eq!(schedule.systems[0].name, "count_entities");
        assert_eq!(schedule.systems[1].name, "<closure>");
    }

    #[cfg(feature = "diagnostics")]
    #[test]
    fn timings_cover_every_system() {
        let mut registry = Registry::new();
        let mut schedule = Schedule::new().with_system(count_entities);
        schedule.run(&mut registry);
        assert_eq!(schedule.timings().len(), 1);
        assert_eq!(schedule.timings()[0].name, "count_entities");
    }
}
