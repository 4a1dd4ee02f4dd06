//! The contract every document node fulfils so that a structural fuzzer can
//! walk the graph without knowing the concrete schema.

use std::any::Any;
use std::fmt::Debug;

use crate::datatypes::{Meta, Narrative};
use crate::resources::Resource;

/// Any instance of the document type system.
///
/// `as_any_mut` must return the *runtime* value: polymorphic wrappers such as
/// [`Resource`] or a choice enum hand out the payload of their active variant,
/// never themselves.
pub trait Node: Any + Send {
    /// Schema name of the runtime type, e.g. `"Patient"` or `"Quantity"`.
    fn type_name(&self) -> &'static str;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A sub-element with several mutually exclusive representations.
///
/// Implemented by enums with one variant per alternative, so exactly one
/// alternative is active whenever a value exists.
pub trait Choice: Node + Sized {
    /// Names of the alternatives in declaration order.
    fn alternatives() -> &'static [&'static str];

    /// A default instance of the alternative at `index`.
    fn alternative(index: usize) -> Option<Self>;

    /// Name of the active alternative.
    fn active(&self) -> &'static str;
}

/// A family of whole sub-documents that can be embedded in one another.
pub trait Embedded: Node + Sized {
    /// Concrete kinds that belong to the family.
    fn kinds() -> &'static [&'static str];

    /// A default instance of the given kind, `None` if the kind is unknown.
    fn default_of(kind: &str) -> Option<Self>;
}

/// Resource-like composites that carry identity, metadata, narrative and
/// contained sub-documents.
pub trait DomainResource: Node + Sized {
    fn id_mut(&mut self) -> &mut Option<String>;
    fn meta_mut(&mut self) -> &mut Option<Meta>;
    fn text_mut(&mut self) -> &mut Option<Narrative>;
    fn contained_mut(&mut self) -> &mut Vec<Resource>;
}

/// Closed code sets.
pub trait Enumerable: Copy + PartialEq + Debug + Send + 'static {
    fn members() -> &'static [Self];
    fn code(&self) -> &'static str;
}

/// Implements [`Node`] for plain composite or primitive structs.
#[macro_export]
macro_rules! impl_node {
    ($($ty:ident),* $(,)?) => {
        $(
            impl $crate::Node for $ty {
                fn type_name(&self) -> &'static str {
                    stringify!($ty)
                }

                fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                    self
                }
            }
        )*
    };
}

/// Implements [`Enumerable`] for a fieldless enum given `Variant => "code"` pairs.
#[macro_export]
macro_rules! impl_enumerable {
    ($ty:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        impl $crate::Enumerable for $ty {
            fn members() -> &'static [Self] {
                &[$($ty::$variant),+]
            }

            fn code(&self) -> &'static str {
                match self {
                    $($ty::$variant => $code),+
                }
            }
        }
    };
}

/// Implements [`Node`] and [`Choice`] for an enum whose variants each wrap one
/// alternative, given `Variant(Type) => "name"` triples.
#[macro_export]
macro_rules! impl_choice {
    ($ty:ident { $($variant:ident($inner:ty) => $alt:literal),+ $(,)? }) => {
        impl $crate::Node for $ty {
            fn type_name(&self) -> &'static str {
                match self {
                    $($ty::$variant(inner) => $crate::Node::type_name(inner)),+
                }
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                match self {
                    $($ty::$variant(inner) => $crate::Node::as_any_mut(inner)),+
                }
            }
        }

        impl $crate::Choice for $ty {
            fn alternatives() -> &'static [&'static str] {
                &[$($alt),+]
            }

            fn alternative(index: usize) -> Option<Self> {
                let constructors: &[fn() -> Self] = &[
                    $(|| $ty::$variant(<$inner as ::std::default::Default>::default())),+
                ];
                constructors.get(index).map(|construct| construct())
            }

            fn active(&self) -> &'static str {
                match self {
                    $($ty::$variant(_) => $alt),+
                }
            }
        }
    };
}
