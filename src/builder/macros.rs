//! Macros for declaring state and action enums.

#[doc(hidden)]
#[macro_export]
macro_rules! __label_enum {
    (
        $trait:path;
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),+
        }

        impl $trait for $name {
            fn label(&self) -> String {
                match self {
                    $(Self::$variant => stringify!($variant).to_string()),+
                }
            }
        }
    };
}

/// Declare a fieldless enum and implement `State` for it.
///
/// # Example
///
/// ```
/// use switchyard::state_enum;
/// use switchyard::State;
///
/// state_enum! {
///     pub enum FeedState {
///         Empty,
///         Loading,
///         Loaded,
///     }
/// }
///
/// assert_eq!(FeedState::Loading.label(), "Loading");
/// ```
#[macro_export]
macro_rules! state_enum {
    ($($body:tt)*) => {
        $crate::__label_enum! { $crate::core::State; $($body)* }
    };
}

/// Declare a fieldless enum and implement `Action` for it.
///
/// # Example
///
/// ```
/// use switchyard::action_enum;
/// use switchyard::Action;
///
/// action_enum! {
///     pub enum FeedAction {
///         Load,
///         Refresh,
///     }
/// }
///
/// assert_eq!(FeedAction::Refresh.label(), "Refresh");
/// ```
#[macro_export]
macro_rules! action_enum {
    ($($body:tt)*) => {
        $crate::__label_enum! { $crate::core::Action; $($body)* }
    };
}
