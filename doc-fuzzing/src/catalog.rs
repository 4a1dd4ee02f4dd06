// doc-fuzzing/src/catalog.rs
//! Registry of candidate mutators and default-instance factories, keyed by
//! the exact runtime type of a node.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use doc_types::{DomainResource, Embedded, Node};

use crate::engine::FuzzContext;
use crate::error::Result;
use crate::provenance::LogEntry;
use crate::random::RandomSource;

type ErasedMutator =
    Box<dyn Fn(&mut FuzzContext<'_>, &mut dyn Any) -> Result<LogEntry> + Send + Sync>;
type ErasedFactory = Box<dyn Fn(&mut RandomSource) -> Option<Box<dyn Any>> + Send + Sync>;

/// Last path segment of a type name, e.g. `Patient` for `doc_types::Patient`
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// One registered corruption for one type
pub struct MutatorEntry {
    name: &'static str,
    apply: ErasedMutator,
}

impl MutatorEntry {
    pub fn new<T, F>(name: &'static str, mutator: F) -> Self
    where
        T: Node,
        F: Fn(&mut FuzzContext<'_>, &mut T) -> Result<LogEntry> + Send + Sync + 'static,
    {
        let apply: ErasedMutator = Box::new(
            move |ctx: &mut FuzzContext<'_>, node: &mut dyn Any| match node.downcast_mut::<T>() {
                Some(node) => mutator(ctx, node),
                None => Ok(LogEntry::no_op(format!(
                    "mutator {} expects {}",
                    name,
                    short_type_name::<T>()
                ))),
            },
        );
        Self { name, apply }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn apply(&self, ctx: &mut FuzzContext<'_>, node: &mut dyn Any) -> Result<LogEntry> {
        (self.apply)(ctx, node)
    }
}

struct TypeMutators {
    type_name: &'static str,
    entries: Vec<MutatorEntry>,
}

struct Factory {
    type_name: &'static str,
    build: ErasedFactory,
}

/// Maps each concrete type to its ordered list of mutators.
///
/// Built once before fuzzing starts and only read afterwards. Lookup is by
/// exact type; a type without its own registration gets nothing.
#[derive(Default)]
pub struct MutatorCatalog {
    mutators: HashMap<TypeId, TypeMutators>,
    factories: HashMap<TypeId, Factory>,
}

impl MutatorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a type-specific mutator for `T`.
    pub fn register<T, F>(&mut self, name: &'static str, mutator: F) -> &mut Self
    where
        T: Node,
        F: Fn(&mut FuzzContext<'_>, &mut T) -> Result<LogEntry> + Send + Sync + 'static,
    {
        self.slot::<T>().entries.push(MutatorEntry::new(name, mutator));
        self
    }

    /// Give `R` the base set every resource shares, ahead of whatever was or
    /// will be registered for it specifically.
    ///
    /// Identity corruption is listed twice so that it is picked more often.
    pub fn register_resource<R: DomainResource>(&mut self) -> &mut Self {
        let base = vec![
            MutatorEntry::new("id", |ctx: &mut FuzzContext<'_>, resource: &mut R| {
                let owner = resource.type_name();
                Ok(ctx.fuzz_id_element(owner, resource.id_mut()))
            }),
            MutatorEntry::new("id", |ctx: &mut FuzzContext<'_>, resource: &mut R| {
                let owner = resource.type_name();
                Ok(ctx.fuzz_id_element(owner, resource.id_mut()))
            }),
            MutatorEntry::new("meta", |ctx: &mut FuzzContext<'_>, resource: &mut R| {
                let owner = resource.type_name();
                ctx.fuzz_child(owner, "meta", resource.meta_mut())
            }),
            MutatorEntry::new("text", |ctx: &mut FuzzContext<'_>, resource: &mut R| {
                let owner = resource.type_name();
                ctx.fuzz_child(owner, "text", resource.text_mut())
            }),
            MutatorEntry::new("contained", |ctx: &mut FuzzContext<'_>, resource: &mut R| {
                let owner = resource.type_name();
                ctx.fuzz_child_resources(owner, resource.contained_mut())
            }),
            MutatorEntry::new("embed", |ctx: &mut FuzzContext<'_>, resource: &mut R| {
                let owner = resource.type_name();
                ctx.embed_new(owner, "contained", resource.contained_mut())
            }),
        ];
        self.slot::<R>().entries.splice(0..0, base);
        self
    }

    /// Use `T::default()` whenever an absent `T` must be synthesized.
    pub fn register_default<T: Node + Default>(&mut self) -> &mut Self {
        self.register_factory(|_| T::default())
    }

    pub fn register_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Node,
        F: Fn(&mut RandomSource) -> T + Send + Sync + 'static,
    {
        let build: ErasedFactory = Box::new(move |random: &mut RandomSource| {
            Some(Box::new(factory(random)) as Box<dyn Any>)
        });
        self.factories.insert(
            TypeId::of::<T>(),
            Factory {
                type_name: short_type_name::<T>(),
                build,
            },
        );
        self
    }

    /// Synthesize members of `E` as a uniformly chosen concrete kind.
    pub fn register_embedded_family<E: Embedded>(&mut self) -> &mut Self {
        let build: ErasedFactory = Box::new(|random: &mut RandomSource| {
            let kind = random.pick_one(E::kinds())?;
            E::default_of(kind).map(|member| Box::new(member) as Box<dyn Any>)
        });
        self.factories.insert(
            TypeId::of::<E>(),
            Factory {
                type_name: short_type_name::<E>(),
                build,
            },
        );
        self
    }

    pub fn entries(&self, type_id: TypeId) -> Option<&[MutatorEntry]> {
        self.mutators
            .get(&type_id)
            .map(|registered| registered.entries.as_slice())
    }

    pub fn entries_for<T: 'static>(&self) -> Option<&[MutatorEntry]> {
        self.entries(TypeId::of::<T>())
    }

    /// Names of the mutators registered for `T`, in selection order
    pub fn mutator_names<T: 'static>(&self) -> Vec<&'static str> {
        self.entries_for::<T>()
            .map(|entries| entries.iter().map(MutatorEntry::name).collect())
            .unwrap_or_default()
    }

    pub fn has_factory<T: 'static>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<T>())
    }

    pub(crate) fn build(&self, type_id: TypeId, random: &mut RandomSource) -> Option<Box<dyn Any>> {
        self.factories
            .get(&type_id)
            .and_then(|factory| (factory.build)(random))
    }

    /// Number of types with at least one registration
    pub fn type_count(&self) -> usize {
        self.mutators.len()
    }

    /// Total number of mutators across all types
    pub fn len(&self) -> usize {
        self.mutators.values().map(|registered| registered.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted names of every type that has mutators or a factory
    pub fn registered_types(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .mutators
            .values()
            .map(|registered| registered.type_name)
            .chain(self.factories.values().map(|factory| factory.type_name))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    fn slot<T: Node>(&mut self) -> &mut TypeMutators {
        self.mutators
            .entry(TypeId::of::<T>())
            .or_insert_with(|| TypeMutators {
                type_name: short_type_name::<T>(),
                entries: Vec::new(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_types::{Meta, Narrative, Observation, Patient, Resource};

    fn operation(text: &'static str) -> impl Fn(&mut FuzzContext<'_>, &mut Patient) -> Result<LogEntry> {
        move |_, _| Ok(LogEntry::operation(text))
    }

    #[test]
    fn test_base_set_is_prepended() {
        let mut catalog = MutatorCatalog::new();
        catalog.register::<Patient, _>("gender", operation("gender"));
        catalog.register_resource::<Patient>();
        catalog.register::<Patient, _>("name", operation("name"));

        assert_eq!(
            catalog.mutator_names::<Patient>(),
            vec!["id", "id", "meta", "text", "contained", "embed", "gender", "name"]
        );
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.type_count(), 1);
    }

    #[test]
    fn test_lookup_is_exact_type_only() {
        let mut catalog = MutatorCatalog::new();
        catalog.register_resource::<Patient>();

        assert!(catalog.entries_for::<Patient>().is_some());
        assert!(catalog.entries_for::<Observation>().is_none());
        assert!(catalog.entries_for::<Resource>().is_none());
        assert!(catalog.mutator_names::<Observation>().is_empty());
    }

    #[test]
    fn test_factories() {
        let mut catalog = MutatorCatalog::new();
        catalog
            .register_default::<Meta>()
            .register_embedded_family::<Resource>();
        let mut random = RandomSource::seeded(4);

        let built = catalog.build(TypeId::of::<Meta>(), &mut random).unwrap();
        assert!(built.downcast::<Meta>().is_ok());

        let built = catalog.build(TypeId::of::<Resource>(), &mut random).unwrap();
        let resource = built.downcast::<Resource>().unwrap();
        assert!(Resource::kinds().contains(&resource.resource_type()));

        assert!(catalog.build(TypeId::of::<Narrative>(), &mut random).is_none());
        assert!(catalog.has_factory::<Meta>());
        assert!(!catalog.has_factory::<Narrative>());
        assert_eq!(catalog.registered_types(), vec!["Meta", "Resource"]);
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Patient>(), "Patient");
        assert_eq!(short_type_name::<u32>(), "u32");
    }
}
