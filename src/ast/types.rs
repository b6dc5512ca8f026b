//! # TombLang Value Types
//!
//! This module defines the value-type system of TombLang and the interner that
//! gives every structurally equal type expression a single shared identity.
//!
//! Types are interned rather than compared structurally on every use: two
//! occurrences of `map<string, number>` anywhere in a module resolve to the
//! same [`TypeId`], so type equality elsewhere in the compiler is a cheap
//! integer comparison.

use num_bigint::BigInt;
use std::collections::HashMap;
use std::fmt;

/// A handle into a [`TypeInterner`]. Equality of `TypeId` implies equality of
/// the underlying type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

/// The signature of a callable: parameter types in declaration order, the
/// return type, and whether the method streams multiple return values
/// (`T*`,  "variadic").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub params: Vec<TypeId>,
    pub return_type: TypeId,
    pub variadic: bool,
}

/// One value type the type checker reasons about. `Decimal(n)` is
/// representationally a `Number` with a compile-time fixed-point scale of
/// `n` fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Unknown,
    None,
    Number,
    Bool,
    String,
    Timestamp,
    Address,
    Hash,
    Bytes,
    Decimal(u8),
    Enum(String),
    Struct(String),
    Array(TypeId),
    Map(TypeId, TypeId),
    StorageList(TypeId),
    StorageMap(TypeId, TypeId),
    Module(String),
    Method(MethodSignature),
    Any,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Unknown => write!(f, "unknown"),
            TypeKind::None => write!(f, "none"),
            TypeKind::Number => write!(f, "number"),
            TypeKind::Bool => write!(f, "bool"),
            TypeKind::String => write!(f, "string"),
            TypeKind::Timestamp => write!(f, "timestamp"),
            TypeKind::Address => write!(f, "address"),
            TypeKind::Hash => write!(f, "hash"),
            TypeKind::Bytes => write!(f, "bytes"),
            TypeKind::Decimal(n) => write!(f, "decimal<{}>", n),
            TypeKind::Enum(name) => write!(f, "{}", name),
            TypeKind::Struct(name) => write!(f, "{}", name),
            TypeKind::Array(_) => write!(f, "array"),
            TypeKind::Map(_, _) => write!(f, "map"),
            TypeKind::StorageList(_) => write!(f, "storage_list"),
            TypeKind::StorageMap(_, _) => write!(f, "storage_map"),
            TypeKind::Module(name) => write!(f, "module {}", name),
            TypeKind::Method(_) => write!(f, "method"),
            TypeKind::Any => write!(f, "any"),
        }
    }
}

/// Structural-dedup arena for [`TypeKind`]. Every call to [`Self::intern`]
/// with an equal `TypeKind` returns the same [`TypeId`], which is how the
/// rest of the compiler gets "types are interned" without a
/// garbage collector.
#[derive(Debug, Default)]
pub struct TypeInterner {
    arena: Vec<TypeKind>,
    index: HashMap<TypeKind, TypeId>,
}

impl TypeInterner {
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(id) = self.index.get(&kind) {
            return *id;
        }
        let id = TypeId(self.arena.len() as u32);
        self.arena.push(kind.clone());
        self.index.insert(kind, id);
        id
    }

    pub fn get(&self, id: TypeId) -> &TypeKind {
        &self.arena[id.0 as usize]
    }

    pub fn unknown(&mut self) -> TypeId {
        self.intern(TypeKind::Unknown)
    }
    pub fn none(&mut self) -> TypeId {
        self.intern(TypeKind::None)
    }
    pub fn number(&mut self) -> TypeId {
        self.intern(TypeKind::Number)
    }
    pub fn bool_(&mut self) -> TypeId {
        self.intern(TypeKind::Bool)
    }
    pub fn string(&mut self) -> TypeId {
        self.intern(TypeKind::String)
    }
    pub fn timestamp(&mut self) -> TypeId {
        self.intern(TypeKind::Timestamp)
    }
    pub fn address(&mut self) -> TypeId {
        self.intern(TypeKind::Address)
    }
    pub fn any(&mut self) -> TypeId {
        self.intern(TypeKind::Any)
    }

    /// Checks type compatibility for operations or assignments, generalizing
    /// the primitive `Integer ↔ Float` rule to the full implicit-conversion
    /// table: `Unknown` is compatible with anything, `Number`
    /// and `Timestamp` convert both ways, everything else must match exactly.
    pub fn is_assignable(&self, from: TypeId, to: TypeId) -> bool {
        if from == to {
            return true;
        }
        match (self.get(from), self.get(to)) {
            (TypeKind::Unknown, _) | (_, TypeKind::Unknown) => true,
            (TypeKind::Number, TypeKind::Timestamp) | (TypeKind::Timestamp, TypeKind::Number) => {
                true
            }
            _ => false,
        }
    }

    /// True if two operand types may appear on either side of an arithmetic
    /// operator: both `Number`, or both `Decimal(n)` with equal `n`
    /// ("mixed numeric types are rejected").
    pub fn arithmetic_compatible(&self, a: TypeId, b: TypeId) -> bool {
        match (self.get(a), self.get(b)) {
            (TypeKind::Number, TypeKind::Number) => true,
            (TypeKind::Decimal(n1), TypeKind::Decimal(n2)) => n1 == n2,
            _ => false,
        }
    }
}

/// Does a decimal literal with `fractional_digits` digits after the point fit
/// a `Decimal(n)` target without losing precision?
pub fn decimal_fits(fractional_digits: u8, n: u8) -> bool {
    fractional_digits <= n
}

/// Scales a `BigInt` mantissa parsed verbatim from a decimal literal (e.g.
/// `2.45` → mantissa `245`, `fractional_digits = 2`) up to the target scale
/// `n`, so that the stored integer representation equals `⌊value · 10ⁿ⌋`.
/// Call only after [`decimal_fits`] has confirmed the literal fits.
pub fn scale_decimal(mantissa: &BigInt, fractional_digits: u8, n: u8) -> BigInt {
    let mut m = mantissa.clone();
    for _ in fractional_digits..n {
        m *= 10;
    }
    m
}
