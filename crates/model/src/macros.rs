//! Macros for declaring invariants and building arguments.
//!
//! # Available Macros
//!
//! - [`invariants!`] — Implement `HasInvariants` from a list of checks
//! - [`args!`] — Build positional and/or named constructor arguments
//!
//! # Examples
//!
//! ```rust,ignore
//! use tessera_model::{args, invariants};
//!
//! invariants! {
//!     Money {
//!         check invariantAmountMustBePositive => |m| m.amount > 0,
//!         try_check invariantCurrencyIsSupported => |m| m.supported_currency(),
//!     }
//! }
//!
//! let money = Money::make(args![100, "EUR"])?;
//! let money = Money::make(args![amount: 100, currency: "EUR"])?;
//! let money = Money::make(args![100; currency: "EUR"])?;
//! ```

// ============================================================================
// INVARIANTS MACRO
// ============================================================================

/// Implements `HasInvariants` for a type.
///
/// Each entry names the builder method (`check` for boolean checks,
/// `try_check` for checks returning `CheckResult`), the check identifier and
/// the check itself. Checks run in the order listed.
///
/// An optional `handler:` replaces the default reporting policy:
///
/// ```rust,ignore
/// invariants! {
///     Price {
///         check invariantAmountMustBeGreaterThanZero => |p| p.amount >= 0.0,
///         check invariantCurrencyMustHaveThreeCharacters => |p| p.currency.len() == 3,
///     }
///     handler: |_, violations| Err(Box::new(InvalidPrice(violations.to_string())))
/// }
/// ```
#[macro_export]
macro_rules! invariants {
    (
        $ty:ty {
            $( $method:ident $id:ident => $check:expr ),* $(,)?
        }
        $( handler: $handler:expr $(,)? )?
    ) => {
        impl $crate::invariant::HasInvariants for $ty {
            fn declare_invariants(invariants: &mut $crate::invariant::Invariants<Self>) {
                let _ = &invariants;
                $( invariants.$method(stringify!($id), $check); )*
            }

            $(
                fn invariant_handler() -> ::core::option::Option<$crate::invariant::InvariantHandler<Self>> {
                    ::core::option::Option::Some($handler)
                }
            )?
        }
    };
}

// ============================================================================
// ARGS MACRO
// ============================================================================

/// Builds `Args` for a construction call.
///
/// ```rust,ignore
/// args![]                              // no arguments
/// args![100, "EUR"]                    // positional
/// args![amount: 100, currency: "EUR"]  // named
/// args![100; currency: "EUR"]          // positional, then named
/// ```
#[macro_export]
macro_rules! args {
    ( $( $name:ident : $value:expr ),+ $(,)? ) => {
        $crate::binding::Args::new()
            $( .with(stringify!($name), $value) )+
    };

    ( $( $value:expr ),* ; $( $name:ident : $named:expr ),+ $(,)? ) => {
        $crate::binding::Args::new()
            $( .push($value) )*
            $( .with(stringify!($name), $named) )+
    };

    ( $( $value:expr ),* $(,)? ) => {
        $crate::binding::Args::new()
            $( .push($value) )*
    };
}
