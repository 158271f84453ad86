use std::fmt::Display;

use indexmap::IndexMap;
use itertools::Itertools;
use smallvec::SmallVec;

use super::Span;

/// The primitive types a fact parameter can have.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum DataType {
    Int8,
    Int32,
    Int64,
    Float,
    Id32,
    Id64,
}

impl DataType {
    /// Resolves the type keyword used in fact declarations.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "int8" => Some(DataType::Int8),
            "int32" => Some(DataType::Int32),
            "int64" => Some(DataType::Int64),
            "float" => Some(DataType::Float),
            "id32" => Some(DataType::Id32),
            "id64" => Some(DataType::Id64),
            _ => None,
        }
    }

    /// Returns true if the type is an integer type, including ids.
    pub fn is_integral(&self) -> bool {
        !matches!(self, DataType::Float)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Int8 => write!(f, "Int8"),
            DataType::Int32 => write!(f, "Int32"),
            DataType::Int64 => write!(f, "Int64"),
            DataType::Float => write!(f, "Float"),
            DataType::Id32 => write!(f, "Id32"),
            DataType::Id64 => write!(f, "Id64"),
        }
    }
}

/// A fact type declaration, e.g. `at(id32, id32)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    name: String,
    span: Span,
    params: SmallVec<[DataType; 4]>,
}

impl Fact {
    pub fn new(name: String, span: Span, params: impl IntoIterator<Item = DataType>) -> Self {
        Self {
            name,
            span,
            params: params.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the fact's name in the source.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn params(&self) -> &[DataType] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.name, self.params.iter().join(", "))
    }
}

/// The table of declared fact types, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct World {
    facts: IndexMap<String, Fact>,
}

impl World {
    /// Declares a new fact type.
    /// If a fact with the same name exists, nothing is changed
    /// and the existing declaration is returned as error.
    pub fn declare(&mut self, fact: Fact) -> Result<(), &Fact> {
        if self.facts.contains_key(fact.name()) {
            return Err(&self.facts[fact.name()]);
        }
        self.facts.insert(fact.name.clone(), fact);
        Ok(())
    }

    /// Looks up a fact type by name.
    pub fn get_fact(&self, name: &str) -> Option<&Fact> {
        self.facts.get(name)
    }

    pub fn facts(&self) -> impl Iterator<Item = &Fact> + '_ {
        self.facts.values()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl Display for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.facts().join(" "))
    }
}
