//! Dependency Comparator - Same-value comparison of ordered dependency lists.
//!
//! Dependency lists are ordered sequences of comparison keys. A list is
//! "changed" when any positional pair differs under same-value comparison:
//! - primitives compare by value (`Int`, `Bool`, `Str`, ...)
//! - floats compare by bit pattern (NaN equals NaN, +0 does not equal -0)
//! - opaque tokens compare by pointer identity (`Rc::ptr_eq`)
//!
//! The first-ever comparison (no prior list recorded) always yields changed.
//! Lists of differing length are a programming error: the comparator reports
//! [`Comparison::ArityMismatch`]; the effect scheduler makes that fatal in
//! development builds, release builds fall back to treating the list as
//! changed.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

// =============================================================================
// Dep - Comparison Key
// =============================================================================

/// A single comparison key in a dependency list.
///
/// Build lists with the [`deps!`](crate::deps!) macro:
///
/// ```ignore
/// let opts = use_memo(|| Options { username }, deps![username]);
/// let create_deps = deps![room_id, opts.clone()];
/// ```
#[derive(Clone)]
pub enum Dep {
    /// Absent value (`None` maps here).
    Unit,
    /// Boolean, value equality.
    Bool(bool),
    /// Integer, value equality.
    Int(i64),
    /// Float, same-value semantics (bit comparison).
    Float(f64),
    /// String, value equality.
    Str(Rc<str>),
    /// Opaque token, pointer identity.
    Token(Rc<dyn Any>),
}

impl Dep {
    /// Wrap a shared value as an identity-compared token.
    pub fn token<T: 'static>(value: Rc<T>) -> Self {
        Dep::Token(value as Rc<dyn Any>)
    }

    /// Same-value comparison. Cross-variant pairs are never the same.
    pub fn same(&self, other: &Dep) -> bool {
        match (self, other) {
            (Dep::Unit, Dep::Unit) => true,
            (Dep::Bool(a), Dep::Bool(b)) => a == b,
            (Dep::Int(a), Dep::Int(b)) => a == b,
            // to_bits gives NaN == NaN and +0 != -0, which is exactly the
            // same-value semantics dependency lists want.
            (Dep::Float(a), Dep::Float(b)) => a.to_bits() == b.to_bits(),
            (Dep::Str(a), Dep::Str(b)) => a == b,
            (Dep::Token(a), Dep::Token(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dep::Unit => write!(f, "Unit"),
            Dep::Bool(v) => write!(f, "Bool({v})"),
            Dep::Int(v) => write!(f, "Int({v})"),
            Dep::Float(v) => write!(f, "Float({v})"),
            Dep::Str(v) => write!(f, "Str({v:?})"),
            Dep::Token(v) => write!(f, "Token({:p})", Rc::as_ptr(v)),
        }
    }
}

impl From<()> for Dep {
    fn from(_: ()) -> Self {
        Dep::Unit
    }
}

impl From<bool> for Dep {
    fn from(value: bool) -> Self {
        Dep::Bool(value)
    }
}

impl From<i32> for Dep {
    fn from(value: i32) -> Self {
        Dep::Int(value as i64)
    }
}

impl From<i64> for Dep {
    fn from(value: i64) -> Self {
        Dep::Int(value)
    }
}

impl From<u32> for Dep {
    fn from(value: u32) -> Self {
        Dep::Int(value as i64)
    }
}

impl From<usize> for Dep {
    fn from(value: usize) -> Self {
        Dep::Int(value as i64)
    }
}

impl From<f32> for Dep {
    fn from(value: f32) -> Self {
        Dep::Float(value as f64)
    }
}

impl From<f64> for Dep {
    fn from(value: f64) -> Self {
        Dep::Float(value)
    }
}

impl From<&str> for Dep {
    fn from(value: &str) -> Self {
        Dep::Str(Rc::from(value))
    }
}

impl From<String> for Dep {
    fn from(value: String) -> Self {
        Dep::Str(Rc::from(value))
    }
}

impl From<Rc<str>> for Dep {
    fn from(value: Rc<str>) -> Self {
        Dep::Str(value)
    }
}

/// Shared values become identity-compared tokens.
impl<T: 'static> From<Rc<T>> for Dep {
    fn from(value: Rc<T>) -> Self {
        Dep::token(value)
    }
}

/// `None` maps to [`Dep::Unit`], `Some` to the inner key.
impl<T: Into<Dep>> From<Option<T>> for Dep {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Dep::Unit,
        }
    }
}

// =============================================================================
// deps! macro
// =============================================================================

/// Build a dependency list from values convertible to [`Dep`].
///
/// ```ignore
/// let create_deps = deps![room_id, opts.clone()];
/// let empty = deps![];
/// ```
#[macro_export]
macro_rules! deps {
    () => {
        ::std::vec::Vec::<$crate::deps::Dep>::new()
    };
    ($($dep:expr),+ $(,)?) => {
        ::std::vec![$($crate::deps::Dep::from($dep)),+]
    };
}

// =============================================================================
// Comparison
// =============================================================================

/// Verdict of comparing a stored dependency list against this render's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Every positional pair is the same value. No action required.
    Unchanged,
    /// At least one positional pair differs, or no prior list was recorded.
    Changed,
    /// List length changed between renders at the same call site.
    /// Callers treat this as changed and report the invariant violation.
    ArityMismatch {
        /// Length of the previously recorded list.
        prev: usize,
        /// Length of this render's list.
        next: usize,
    },
}

/// Compare a previously recorded dependency list against the next one.
///
/// `prev = None` means the call site has never committed: always changed.
pub fn compare(prev: Option<&[Dep]>, next: &[Dep]) -> Comparison {
    let Some(prev) = prev else {
        return Comparison::Changed;
    };
    if prev.len() != next.len() {
        return Comparison::ArityMismatch {
            prev: prev.len(),
            next: next.len(),
        };
    }
    if prev.iter().zip(next.iter()).all(|(a, b)| a.same(b)) {
        Comparison::Unchanged
    } else {
        Comparison::Changed
    }
}

// =============================================================================
// Tests
// =============================================================================
