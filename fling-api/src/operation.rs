//! Operation trait and the declarative macro used to define operations
//!
//! Each remote player method is described by a type implementing
//! [`PlayerOperation`]: the method name, a request struct turned into bridge
//! arguments, and a parser turning the resolved value into a typed response.

use fling_bridge::{Arg, Value};

use crate::error::Result;

/// A single remote player method.
pub trait PlayerOperation {
    /// Arguments for the call
    type Request;
    /// Typed result of the call
    type Response;

    /// Remote method name, as the renderer spells it
    const METHOD: &'static str;

    /// Build the bridge arguments for a request.
    fn build_args(request: &Self::Request) -> Vec<Arg>;

    /// Parse the resolved value into a typed response.
    fn parse_response(value: Value) -> Result<Self::Response>;
}

/// Define a player operation with minimal boilerplate
///
/// Generates `<Name>Request` with the listed public fields, the unit
/// operation struct, and its [`PlayerOperation`] implementation.
///
/// # Example
/// ```rust,ignore
/// define_player_operation! {
///     operation: SetVolumeOperation,
///     method: "setVolume",
///     request: {
///         volume: f64,
///     },
///     response: (),
///     args: |req| vec![Arg::from(req.volume)],
///     parse: |_value| Ok(()),
/// }
/// ```
#[macro_export]
macro_rules! define_player_operation {
    (
        $(#[$meta:meta])*
        operation: $op_struct:ident,
        method: $method:literal,
        request: {
            $($field:ident: $field_type:ty),* $(,)?
        },
        response: $response_type:ty,
        args: |$req_param:ident| $args_expr:expr,
        parse: |$value_param:ident| $parse_expr:expr $(,)?
    ) => {
        paste::paste! {
            #[doc = concat!("Request for the `", $method, "` remote method")]
            #[derive(Debug, Clone, PartialEq)]
            pub struct [<$op_struct Request>] {
                $(pub $field: $field_type,)*
            }

            $(#[$meta])*
            pub struct $op_struct;

            impl $crate::operation::PlayerOperation for $op_struct {
                type Request = [<$op_struct Request>];
                type Response = $response_type;

                const METHOD: &'static str = $method;

                #[allow(unused_variables)]
                fn build_args(request: &Self::Request) -> Vec<$crate::Arg> {
                    let $req_param = request;
                    $args_expr
                }

                #[allow(unused_variables)]
                fn parse_response(value: $crate::Value) -> $crate::Result<Self::Response> {
                    let $value_param = value;
                    $parse_expr
                }
            }
        }
    };
}
