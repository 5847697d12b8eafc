//! Macros for declaring status enums and static transition tables.

/// Declare a status enum and its `State` implementation.
///
/// A variant's label defaults to its identifier; `Variant = "LABEL"` overrides
/// it.
///
/// # Example
///
/// ```
/// use stategate::state_enum;
/// use stategate::core::State;
///
/// state_enum! {
///     pub enum QuoteState {
///         Pendiente = "PENDIENTE",
///         Aprobada = "APROBADA",
///         Convertida,
///     }
/// }
///
/// assert_eq!(QuoteState::Pendiente.name(), "PENDIENTE");
/// assert_eq!(QuoteState::Convertida.name(), "Convertida");
/// ```
#[macro_export]
macro_rules! state_enum {
    (@label $variant:ident $label:literal) => {
        $label
    };
    (@label $variant:ident) => {
        stringify!($variant)
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(= $label:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $(#[serde(rename = $label)])?
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $crate::state_enum!(@label $variant $($label)?)),*
                }
            }
        }
    };
}

/// Build a `TransitionTable` from a map literal.
///
/// # Example
///
/// ```
/// use stategate::{state_enum, transition_table};
///
/// state_enum! {
///     enum CashState {
///         Abierta,
///         Cerrada,
///     }
/// }
///
/// let table = transition_table! {
///     CashState::Abierta => [CashState::Cerrada],
///     CashState::Cerrada => [],
/// };
///
/// assert_eq!(table.successors(&CashState::Abierta), &[CashState::Cerrada]);
/// ```
#[macro_export]
macro_rules! transition_table {
    ($($from:expr => [$($to:expr),* $(,)?]),* $(,)?) => {
        $crate::core::TransitionTable::new()
            $(.allow($from, [$($to),*]))*
    };
}
