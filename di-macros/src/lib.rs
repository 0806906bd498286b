//! Derive macros for compile-time dependency injection.
//!
//! - `#[derive(Context)]` makes every field of a root context extractable
//! - `#[derive(FromContext)]` builds a struct by resolving each of its fields
//!   from a context
//!
//! Generated code refers to `crate::FromRef`, so the consuming crate must
//! define or re-export that trait at its root.

use proc_macro::TokenStream;

mod context;
mod from_context;

/// Generates `FromRef<Ctx>` for the type of every field of `Ctx`.
///
/// Each field is cloned out of the context, so field types must be `Clone`.
/// Generic contexts are supported; defaults on type parameters are dropped
/// from the generated impls.
///
/// ```ignore
/// #[derive(Context)]
/// pub struct Context<C: GraphClient = Neo4jClient> {
///     pub connection: Arc<Connection<C>>,
///     pub config: Arc<Config>,
/// }
///
/// // impl<C: GraphClient> FromRef<Context<C>> for Arc<Connection<C>> { .. }
/// // impl<C: GraphClient> FromRef<Context<C>> for Arc<Config> { .. }
/// ```
#[proc_macro_derive(Context)]
pub fn derive_context(input: TokenStream) -> TokenStream {
    context::derive_context_impl(input)
}

/// Generates `FromRef<Ctx>` for a struct whose fields all implement
/// `FromRef<Ctx>`.
///
/// The context type is `Context` unless overridden with
/// `#[from_context(Context = "...")]`, which may name the struct's own
/// type parameters.
///
/// ```ignore
/// #[derive(FromContext)]
/// #[from_context(Context = "Context<C>")]
/// pub struct RouteRepository<C: GraphClient = Neo4jClient> {
///     connection: Arc<Connection<C>>,
///     schema: RouteSchema,
/// }
///
/// // impl<C: GraphClient> FromRef<Context<C>> for RouteRepository<C> {
/// //     fn from_ref(ctx: &Context<C>) -> Self {
/// //         Self {
/// //             connection: <Arc<Connection<C>> as FromRef<Context<C>>>::from_ref(ctx),
/// //             schema: <RouteSchema as FromRef<Context<C>>>::from_ref(ctx),
/// //         }
/// //     }
/// // }
/// ```
#[proc_macro_derive(FromContext, attributes(from_context))]
pub fn derive_from_context(input: TokenStream) -> TokenStream {
    from_context::derive_from_context_impl(input)
}
