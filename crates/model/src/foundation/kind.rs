//! Declared parameter types
//!
//! A parameter declares a [`TypeSet`]: one [`TypeTag`] for a plain type, or
//! several for a union such as `int|float`.

use std::fmt;

use smallvec::SmallVec;

/// A single declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Matches any value.
    Mixed,
    Bool,
    Int,
    /// Also accepts int-kinded values.
    Float,
    String,
    Array,
    Map,
    /// A domain type or capability, matched by name against an object value.
    Class(&'static str),
}

impl TypeTag {
    /// Name used in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mixed => "mixed",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Map => "map",
            Self::Class(name) => name,
        }
    }

    /// Whether this is a primitive tag (matched by runtime kind).
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Self::Class(_) | Self::Mixed)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of acceptable types for one parameter.
///
/// Order is preserved so messages list the types the way they were declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSet {
    tags: SmallVec<[TypeTag; 4]>,
}

impl TypeSet {
    /// A set containing a single tag.
    #[must_use]
    pub fn single(tag: TypeTag) -> Self {
        let mut tags = SmallVec::new();
        tags.push(tag);
        Self { tags }
    }

    /// A union of tags. Duplicates are dropped; an empty union means `mixed`.
    #[must_use]
    pub fn union(tags: impl IntoIterator<Item = TypeTag>) -> Self {
        let mut set: SmallVec<[TypeTag; 4]> = SmallVec::new();
        for tag in tags {
            if !set.contains(&tag) {
                set.push(tag);
            }
        }
        if set.is_empty() {
            set.push(TypeTag::Mixed);
        }
        Self { tags: set }
    }

    /// The `mixed` set, accepting anything.
    #[must_use]
    pub fn mixed() -> Self {
        Self::single(TypeTag::Mixed)
    }

    /// Declared tags in order.
    #[must_use]
    pub fn tags(&self) -> &[TypeTag] {
        &self.tags
    }

    /// Whether more than one type is accepted.
    #[must_use]
    pub fn is_union(&self) -> bool {
        self.tags.len() > 1
    }

    /// Acceptable type names joined by `|`.
    #[must_use]
    pub fn names(&self) -> String {
        self.tags
            .iter()
            .map(TypeTag::name)
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl From<TypeTag> for TypeSet {
    fn from(tag: TypeTag) -> Self {
        Self::single(tag)
    }
}

impl<const N: usize> From<[TypeTag; N]> for TypeSet {
    fn from(tags: [TypeTag; N]) -> Self {
        Self::union(tags)
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names())
    }
}

/// Unqualified name of `T`: module path and generic arguments stripped.
///
/// `my_app::billing::Money` becomes `Money`, `Wrapper<my_app::Id>` becomes
/// `Wrapper`.
#[must_use]
pub fn simple_type_name<T: ?Sized>() -> &'static str {
    simplify(std::any::type_name::<T>())
}

fn simplify(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod billing {
        pub struct Money;
        pub struct Wrapper<T>(pub T);
    }

    #[test]
    fn union_names_keep_declaration_order() {
        let set = TypeSet::from([TypeTag::Int, TypeTag::Float, TypeTag::String]);
        assert_eq!(set.names(), "int|float|string");
        assert!(set.is_union());
    }

    #[test]
    fn union_drops_duplicates() {
        let set = TypeSet::union([TypeTag::Int, TypeTag::Int]);
        assert_eq!(set.tags(), &[TypeTag::Int]);
        assert!(!set.is_union());
    }

    #[test]
    fn empty_union_is_mixed() {
        assert_eq!(TypeSet::union(Vec::<TypeTag>::new()), TypeSet::mixed());
    }

    #[test]
    fn class_tag_name() {
        assert_eq!(TypeTag::Class("Email").to_string(), "Email");
        assert!(!TypeTag::Class("Email").is_primitive());
        assert!(TypeTag::Int.is_primitive());
    }

    #[test]
    fn simple_names() {
        assert_eq!(simple_type_name::<billing::Money>(), "Money");
        assert_eq!(
            simple_type_name::<billing::Wrapper<billing::Money>>(),
            "Wrapper"
        );
        assert_eq!(simple_type_name::<i64>(), "i64");
    }
}
