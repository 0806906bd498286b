//! Dependency injection infrastructure.
//!
//! Compile-time dependency injection using the `FromRef` trait and the
//! derive macros from `di-macros`.
//!
//! - `FromRef<T>`: extract a value from a reference to `T`
//! - `#[derive(Context)]`: makes each field of the root context extractable
//! - `#[derive(FromContext)]`: builds a type by resolving each of its fields
//!
//! # Example
//!
//! ```ignore
//! use crate::di::{FromContext, FromRef};
//!
//! #[derive(FromContext)]
//! #[from_context(Context = "Context<C>")]
//! pub struct RouteRepository<C: GraphClient> {
//!     connection: Arc<Connection<C>>,  // from the context field
//!     schema: RouteSchema,             // from a hand-written FromRef impl
//! }
//!
//! let repo = RouteRepository::from_ref(&ctx);
//! ```

/// Trait for extracting a value from a reference to another type.
///
/// Types that implement `FromRef<T>` can be extracted from `&T`.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}

// Re-export derive macros
pub use di_macros::{Context, FromContext};
