//! Macros for declaring state keys.

/// Declare a fieldless enum usable as a machine key.
///
/// Derives the traits [`StateId`](crate::core::StateId) requires and
/// implements it, using the variant name as the state name. Variants listed
/// under `final:` report `is_final() == true`. The calling crate needs
/// `serde` with the `derive` feature.
///
/// # Example
///
/// ```
/// use combat_fsm::core::StateId;
/// use combat_fsm::state_id;
///
/// state_id! {
///     pub enum EnemyPhase {
///         Patrol,
///         Chase,
///         Dead,
///     }
///     final: [Dead]
/// }
///
/// assert_eq!(EnemyPhase::Chase.name(), "Chase");
/// assert!(EnemyPhase::Dead.is_final());
/// ```
#[macro_export]
macro_rules! state_id {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateId for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}
