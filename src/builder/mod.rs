//! Declarative helpers for status enums and transition tables.
//!
//! The macros live at the crate root (`stategate::state_enum!`,
//! `stategate::transition_table!`); this module only hosts them.

pub mod macros;
