//! # Compatibility Validator
//!
//! Compares the methods a client interface expects against the catalog a
//! server declares. Acceptance is all-or-nothing: every interface method must
//! have exactly one catalog entry with the same name, the same parameter
//! shapes in the same order, and the same return shape. Catalog entries the
//! interface never references are ignored. Parameter names are not compared
//! because params travel positionally.

use serde::Serialize;
use shared_rpc::MethodDescriptor;
use std::collections::HashMap;
use std::fmt;

/// Why one interface method failed to match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodMismatch {
    /// The server does not declare the method.
    Missing {
        /// Interface method name.
        method: String,
    },
    /// The server declares the method more than once.
    Ambiguous {
        /// Interface method name.
        method: String,
        /// Number of server declarations.
        count: usize,
    },
    /// The interface itself declares the method more than once.
    DuplicateInInterface {
        /// Interface method name.
        method: String,
    },
    /// Parameter shapes differ.
    Params {
        /// Interface method name.
        method: String,
        /// Shapes the interface sends.
        expected: Vec<String>,
        /// Shapes the server accepts.
        actual: Vec<String>,
    },
    /// Return shapes differ.
    Returns {
        /// Interface method name.
        method: String,
        /// Shape the interface expects.
        expected: String,
        /// Shape the server returns.
        actual: String,
    },
}

impl fmt::Display for MethodMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodMismatch::Missing { method } => write!(f, "{method}: not declared by server"),
            MethodMismatch::Ambiguous { method, count } => {
                write!(f, "{method}: declared {count} times by server")
            }
            MethodMismatch::DuplicateInInterface { method } => {
                write!(f, "{method}: declared more than once by interface")
            }
            MethodMismatch::Params {
                method,
                expected,
                actual,
            } => write!(
                f,
                "{method}: params ({}) != server ({})",
                expected.join(", "),
                actual.join(", ")
            ),
            MethodMismatch::Returns {
                method,
                expected,
                actual,
            } => write!(f, "{method}: returns {expected} != server {actual}"),
        }
    }
}

/// Check `interface` against `catalog`, collecting every mismatch.
pub fn check_compatibility(
    interface: &[MethodDescriptor],
    catalog: &[MethodDescriptor],
) -> Result<(), Vec<MethodMismatch>> {
    let mut by_name: HashMap<&str, Vec<&MethodDescriptor>> = HashMap::new();
    for entry in catalog {
        by_name.entry(entry.name.as_str()).or_default().push(entry);
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut mismatches = Vec::new();

    for expected in interface {
        let occurrences = seen.entry(expected.name.as_str()).or_default();
        *occurrences += 1;
        if *occurrences == 2 {
            mismatches.push(MethodMismatch::DuplicateInInterface {
                method: expected.name.clone(),
            });
        }
        if *occurrences > 1 {
            continue;
        }

        match by_name.get(expected.name.as_str()).map(Vec::as_slice) {
            None | Some([]) => mismatches.push(MethodMismatch::Missing {
                method: expected.name.clone(),
            }),
            Some([actual]) => mismatches.extend(compare(expected, actual)),
            Some(many) => mismatches.push(MethodMismatch::Ambiguous {
                method: expected.name.clone(),
                count: many.len(),
            }),
        }
    }

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(mismatches)
    }
}

fn compare(expected: &MethodDescriptor, actual: &MethodDescriptor) -> Vec<MethodMismatch> {
    let mut out = Vec::new();

    if !expected.param_shapes().eq(actual.param_shapes()) {
        out.push(MethodMismatch::Params {
            method: expected.name.clone(),
            expected: expected.param_shapes().map(str::to_owned).collect(),
            actual: actual.param_shapes().map(str::to_owned).collect(),
        });
    }

    if expected.returns != actual.returns {
        out.push(MethodMismatch::Returns {
            method: expected.name.clone(),
            expected: expected.returns.clone(),
            actual: actual.returns.clone(),
        });
    }

    out
}
