// doc-fuzzing/src/engine.rs
//! The recursive core.
//!
//! [`MutationEngine`] owns the catalog and hands out a [`FuzzContext`] per
//! fuzzing session. Every registered mutator receives that context and walks
//! further down the graph through its entry points:
//!
//! - [`FuzzContext::fuzz_child`] for optional sub-elements, synthesizing them when absent
//! - [`FuzzContext::fuzz_child_types`] and friends for repeated sub-elements
//! - [`FuzzContext::fuzz_child_resources`] for contained sub-documents
//! - [`FuzzContext::fuzz_choice`] for exactly-one-of-N elements
//! - [`FuzzContext::fuzz_id_element`] and [`FuzzContext::fuzz_primitive_type`] for scalars
//!
//! Each call changes at most one thing in the subtree it is handed and
//! returns a [`LogEntry`] describing it.

use std::any::{Any, TypeId};

use doc_types::{Choice, Embedded, Enumerable, Node};
use tracing::{debug, trace};

use crate::catalog::{short_type_name, MutatorCatalog};
use crate::config::FuzzConfig;
use crate::constants;
use crate::error::{FuzzError, Result};
use crate::primitive::{Fuzzed, PrimitiveFuzzer, PrimitiveHint};
use crate::provenance::LogEntry;
use crate::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub max_depth: usize,
    pub embed_probability: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            embed_probability: constants::DEFAULT_EMBED_PROBABILITY,
        }
    }
}

impl From<&FuzzConfig> for Limits {
    fn from(config: &FuzzConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            embed_probability: config.embed_probability,
        }
    }
}

pub struct MutationEngine {
    catalog: MutatorCatalog,
    limits: Limits,
}

impl MutationEngine {
    pub fn new(catalog: MutatorCatalog) -> Self {
        Self {
            catalog,
            limits: Limits::default(),
        }
    }

    pub fn with_config(catalog: MutatorCatalog, config: &FuzzConfig) -> Self {
        Self {
            catalog,
            limits: Limits::from(config),
        }
    }

    pub fn catalog(&self) -> &MutatorCatalog {
        &self.catalog
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Start a session. The context owns `random`; use one context per
    /// concurrent pass.
    pub fn context(&self, random: RandomSource) -> FuzzContext<'_> {
        FuzzContext {
            catalog: &self.catalog,
            random,
            limits: self.limits,
            depth: 0,
        }
    }
}

/// State threaded through one fuzzing call tree
pub struct FuzzContext<'c> {
    catalog: &'c MutatorCatalog,
    random: RandomSource,
    limits: Limits,
    depth: usize,
}

impl<'c> FuzzContext<'c> {
    pub fn random(&mut self) -> &mut RandomSource {
        &mut self.random
    }

    pub fn into_random(self) -> RandomSource {
        self.random
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn choose_one<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.random.pick_one(items)
    }

    pub fn choose_many<'a, T>(&mut self, items: &'a [T]) -> Vec<&'a T> {
        self.random.pick_many(items)
    }

    pub fn choose_enum_excluding<E: Enumerable>(&mut self, current: Option<E>) -> Option<E> {
        self.random.pick_enum(current)
    }

    /// Build a default instance of `T` through the catalog's factories.
    pub fn synthesize<T: Node>(&mut self) -> Result<T> {
        let type_name = short_type_name::<T>();
        let built = self
            .catalog
            .build(TypeId::of::<T>(), &mut self.random)
            .ok_or(FuzzError::SynthesisFailure { type_name })?;
        match built.downcast::<T>() {
            Ok(node) => {
                debug!("synthesized {} at depth {}", node.type_name(), self.depth);
                Ok(*node)
            }
            Err(_) => Err(FuzzError::SynthesisFailure { type_name }),
        }
    }

    /// Apply one uniformly chosen mutator of `root`'s runtime type.
    pub fn fuzz_once(&mut self, root: &mut dyn Node) -> Result<LogEntry> {
        let type_name = root.type_name();
        let child = self.dispatch(root)?;
        Ok(LogEntry::parent(type_name, vec![child]))
    }

    /// Apply a random subset of `root`'s mutators, each once. The subset may
    /// be empty, in which case nothing changes.
    pub fn fuzz_pass(&mut self, root: &mut dyn Node) -> Result<LogEntry> {
        let type_name = root.type_name();
        if let Some(limit) = self.depth_limit_reached(type_name) {
            return Ok(limit);
        }

        let catalog = self.catalog;
        let target = root.as_any_mut();
        let Some(entries) = catalog.entries((*target).type_id()) else {
            debug!("catalog miss for {}", type_name);
            return Ok(LogEntry::no_op(format!("no mutators registered for {}", type_name)));
        };

        let selected = self.random.pick_many(entries);
        if selected.is_empty() {
            return Ok(LogEntry::no_op(format!("no {} mutators selected for this pass", type_name)));
        }

        self.depth += 1;
        let children: Result<Vec<LogEntry>> = selected
            .into_iter()
            .map(|entry| {
                trace!("{} pass -> {}", type_name, entry.name());
                entry.apply(self, &mut *target)
            })
            .collect();
        self.depth -= 1;

        Ok(LogEntry::parent(type_name, children?))
    }

    /// Mutate an optional sub-element. An absent one is synthesized and
    /// attached first, so later calls mutate the same instance.
    pub fn fuzz_child<T: Node>(&mut self, owner: &str, field: &str, slot: &mut Option<T>) -> Result<LogEntry> {
        let synthesized = slot.is_none();
        if synthesized {
            *slot = Some(self.synthesize::<T>()?);
        }

        let Some(node) = slot.as_mut() else {
            return Ok(LogEntry::no_op(format!("{}.{} is absent", owner, field)));
        };
        let path = format!("{}.{}", owner, field);
        let attached = synthesized.then(|| LogEntry::add(path.as_str(), format!("synthesized {}", node.type_name())));
        let child = self.dispatch(node)?;
        Ok(match attached {
            Some(add) => LogEntry::parent(format!("{} (synthesized)", path), vec![add, child]),
            None => LogEntry::parent(path, vec![child]),
        })
    }

    /// Mutate a sub-element that is always present.
    pub fn fuzz_required_child<T: Node>(&mut self, owner: &str, field: &str, node: &mut T) -> Result<LogEntry> {
        let child = self.dispatch(node)?;
        Ok(LogEntry::parent(format!("{}.{}", owner, field), vec![child]))
    }

    /// Mutate one uniformly chosen element of a repeated sub-element. An
    /// empty collection is left alone.
    pub fn fuzz_child_types<T: Node>(&mut self, owner: &str, field: &str, items: &mut [T]) -> Result<LogEntry> {
        let Some(index) = self.random.pick_index(items.len()) else {
            return Ok(LogEntry::no_op(format!("{}.{} is empty", owner, field)));
        };
        let child = self.dispatch(&mut items[index])?;
        Ok(LogEntry::parent(format!("{}.{}[{}]", owner, field, index), vec![child]))
    }

    /// Like [`fuzz_child_types`](Self::fuzz_child_types), but an empty
    /// collection gets a first element from `fallback`, which is then mutated.
    pub fn fuzz_child_types_or_else<T, F>(
        &mut self,
        owner: &str,
        field: &str,
        items: &mut Vec<T>,
        fallback: F,
    ) -> Result<LogEntry>
    where
        T: Node,
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if !items.is_empty() {
            return self.fuzz_child_types(owner, field, items);
        }

        items.push(fallback(self)?);
        let path = format!("{}.{}[0]", owner, field);
        let add = LogEntry::add(path.as_str(), format!("synthesized {}", items[0].type_name()));
        let child = self.dispatch(&mut items[0])?;
        Ok(LogEntry::parent(format!("{} (synthesized)", path), vec![add, child]))
    }

    /// [`fuzz_child_types_or_else`](Self::fuzz_child_types_or_else) with the
    /// catalog's default factory as the fallback.
    pub fn fuzz_child_types_or_default<T: Node>(
        &mut self,
        owner: &str,
        field: &str,
        items: &mut Vec<T>,
    ) -> Result<LogEntry> {
        self.fuzz_child_types_or_else(owner, field, items, |ctx| ctx.synthesize::<T>())
    }

    /// Recurse into one contained sub-document. Containers may hold members
    /// of their own family; the depth limit bounds the recursion.
    pub fn fuzz_child_resources<E: Embedded>(&mut self, owner: &str, contained: &mut [E]) -> Result<LogEntry> {
        self.fuzz_child_types(owner, "contained", contained)
    }

    /// With the configured probability, attach a brand-new sub-document of a
    /// random concrete kind.
    pub fn embed_new<E: Embedded>(&mut self, owner: &str, field: &str, items: &mut Vec<E>) -> Result<LogEntry> {
        if !self.random.next_bool_with(self.limits.embed_probability) {
            return Ok(LogEntry::no_op(format!("{}.{}: embedding skipped", owner, field)));
        }

        let member = self.synthesize::<E>()?;
        let detail = format!("embedded new {}", member.type_name());
        items.push(member);
        Ok(LogEntry::add(format!("{}.{}[{}]", owner, field, items.len() - 1), detail))
    }

    /// Corrupt the synthetic identity of a node.
    pub fn fuzz_id_element(&mut self, owner: &str, id: &mut Option<String>) -> LogEntry {
        let description = format!("{}.id", owner);
        let fuzzed = PrimitiveFuzzer::fuzz(&mut self.random, &description, PrimitiveHint::Identifier, id.as_deref());
        *id = Some(fuzzed.value);
        fuzzed.log
    }

    /// Corrupt a scalar. The caller writes [`Fuzzed::value`] back.
    pub fn fuzz_primitive_type(&mut self, description: &str, hint: PrimitiveHint, current: Option<&str>) -> Fuzzed {
        PrimitiveFuzzer::fuzz(&mut self.random, description, hint, current)
    }

    /// Mutate an exactly-one-of-N element. The active alternative is recursed
    /// into; when none is active one is chosen uniformly, synthesized and
    /// attached first.
    pub fn fuzz_choice<C: Choice>(&mut self, owner: &str, field: &str, slot: &mut Option<C>) -> Result<LogEntry> {
        let mut synthesized = None;
        if slot.is_none() {
            let alternatives = C::alternatives();
            let Some(index) = self.random.pick_index(alternatives.len()) else {
                return Ok(LogEntry::no_op(format!("{}.{} declares no alternatives", owner, field)));
            };
            let choice = C::alternative(index).ok_or(FuzzError::SynthesisFailure {
                type_name: alternatives[index],
            })?;
            *slot = Some(choice);
            synthesized = Some(alternatives[index]);
        }

        let Some(choice) = slot.as_mut() else {
            return Ok(LogEntry::no_op(format!("{}.{} is absent", owner, field)));
        };
        let path = format!("{}.{} -> {}", owner, field, choice.active());
        let attached = synthesized.map(|alternative| LogEntry::add(format!("{}.{}", owner, field), format!("synthesized {}", alternative)));
        let child = self.dispatch(choice)?;
        Ok(match attached {
            Some(add) => LogEntry::parent(format!("{} (synthesized)", path), vec![add, child]),
            None => LogEntry::parent(path, vec![child]),
        })
    }

    /// Switch a coded field to a different member of its code set.
    pub fn fuzz_enum<E: Enumerable>(&mut self, owner: &str, field: &str, slot: &mut Option<E>) -> LogEntry {
        let current = *slot;
        match self.random.pick_enum(current) {
            Some(next) if Some(next) != current => {
                *slot = Some(next);
                let before = current.map(|value| value.code()).unwrap_or("absent");
                LogEntry::operation(format!("{}.{}: {} -> {}", owner, field, before, next.code()))
            }
            _ => LogEntry::no_op(format!("{}.{} has no other code", owner, field)),
        }
    }

    fn depth_limit_reached(&self, type_name: &str) -> Option<LogEntry> {
        if self.depth < self.limits.max_depth {
            return None;
        }
        debug!("depth limit {} reached at {}", self.limits.max_depth, type_name);
        Some(LogEntry::no_op(format!(
            "depth limit {} reached at {}",
            self.limits.max_depth, type_name
        )))
    }

    /// Look up the runtime type of `node`, pick one of its mutators uniformly
    /// and run it one level deeper.
    fn dispatch(&mut self, node: &mut dyn Node) -> Result<LogEntry> {
        let type_name = node.type_name();
        if let Some(limit) = self.depth_limit_reached(type_name) {
            return Ok(limit);
        }

        let catalog = self.catalog;
        let target: &mut dyn Any = node.as_any_mut();
        let Some(entries) = catalog.entries((*target).type_id()) else {
            debug!("catalog miss for {}", type_name);
            return Ok(LogEntry::no_op(format!("no mutators registered for {}", type_name)));
        };
        let Some(entry) = self.random.pick_one(entries) else {
            return Ok(LogEntry::no_op(format!("no candidate mutators for {}", type_name)));
        };

        trace!("{} -> {} at depth {}", type_name, entry.name(), self.depth);
        self.depth += 1;
        let result = entry.apply(self, target);
        self.depth -= 1;
        result
    }
}
