//! Server method catalog.
//!
//! A server describes every callable method as a [`MethodDescriptor`]. Clients
//! build the same descriptors from their Rust interface and compare the two
//! before making any call, so both sides need one shared vocabulary for
//! types: [`TypeShape`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One positional parameter of a remote method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// Parameter name (informational, params are positional on the wire).
    pub name: String,
    /// Shape of the parameter type.
    pub shape: String,
}

impl ParamDescriptor {
    /// Create a parameter descriptor.
    pub fn new(name: impl Into<String>, shape: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: shape.into(),
        }
    }

    /// Descriptor for a parameter of Rust type `T`.
    pub fn of<T: TypeShape + ?Sized>(name: impl Into<String>) -> Self {
        Self::new(name, T::shape())
    }
}

/// Signature of one remote method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name as sent in the JSON-RPC `method` member.
    pub name: String,
    /// Parameters in call order.
    pub params: Vec<ParamDescriptor>,
    /// Shape of the result type (`void` for none).
    pub returns: String,
}

impl MethodDescriptor {
    /// Create a method descriptor.
    pub fn new(
        name: impl Into<String>,
        params: Vec<ParamDescriptor>,
        returns: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            returns: returns.into(),
        }
    }

    /// Parameter shapes in call order.
    pub fn param_shapes(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.shape.as_str())
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", p.name, p.shape)?;
        }
        write!(f, ") -> {}", self.returns)
    }
}

/// Language-neutral shape name of a Rust type.
///
/// Shapes are compared as plain strings, so two types are compatible exactly
/// when their shapes are equal. Application structs register a name with
/// [`impl_type_shape!`](crate::impl_type_shape).
pub trait TypeShape {
    /// The shape name.
    fn shape() -> String;
}

macro_rules! primitive_shapes {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl TypeShape for $ty {
                fn shape() -> String {
                    $name.to_string()
                }
            }
        )*
    };
}

primitive_shapes! {
    () => "void",
    bool => "bool",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    f32 => "f32",
    f64 => "f64",
    char => "char",
    String => "string",
    str => "string",
    serde_json::Value => "any",
    uuid::Uuid => "uuid",
}

impl<T: TypeShape> TypeShape for Vec<T> {
    fn shape() -> String {
        format!("array<{}>", T::shape())
    }
}

impl<T: TypeShape> TypeShape for Option<T> {
    fn shape() -> String {
        format!("option<{}>", T::shape())
    }
}

impl<V: TypeShape> TypeShape for HashMap<String, V> {
    fn shape() -> String {
        format!("map<string,{}>", V::shape())
    }
}

impl<V: TypeShape> TypeShape for BTreeMap<String, V> {
    fn shape() -> String {
        format!("map<string,{}>", V::shape())
    }
}

/// Register application types under a shape name.
///
/// ```rust,ignore
/// impl_type_shape!(Order);                 // shape "Order"
/// impl_type_shape!(OrderV2 => "Order");   // explicit name
/// ```
#[macro_export]
macro_rules! impl_type_shape {
    ($ty:ty => $name:expr) => {
        impl $crate::TypeShape for $ty {
            fn shape() -> String {
                String::from($name)
            }
        }
    };
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $crate::TypeShape for $ty {
                fn shape() -> String {
                    String::from(stringify!($ty))
                }
            }
        )+
    };
}
