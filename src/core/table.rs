//! Declarative transition tables.
//!
//! A table maps a state to the states directly reachable from it. It holds
//! no instance data and is shared by every entity of one kind.

use super::state::State;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Static mapping from a state to its legal successors.
///
/// Successors keep the order in which they were configured, so messages that
/// enumerate them are stable. A state absent from the table has no
/// successors. Two tables are equal when they allow the same moves, whatever
/// order their states were declared in.
///
/// # Example
///
/// ```rust
/// use stategate::core::TransitionTable;
///
/// let table = TransitionTable::new()
///     .allow("PENDIENTE".to_string(), ["APROBADA".to_string(), "RECHAZADA".to_string()])
///     .allow("APROBADA".to_string(), ["CONVERTIDA".to_string()]);
///
/// assert_eq!(table.successors(&"PENDIENTE".to_string()).len(), 2);
/// assert!(table.successors(&"CONVERTIDA".to_string()).is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct TransitionTable<S: State> {
    order: Vec<S>,
    edges: HashMap<S, Vec<S>>,
}

impl<S: State> TransitionTable<S> {
    /// Create an empty table. An empty table rejects every transition.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            edges: HashMap::new(),
        }
    }

    /// Allow `from` to move to each of `to`.
    ///
    /// Repeated calls for the same `from` extend its successor list;
    /// duplicates are ignored. Passing an empty list declares `from` as
    /// terminal explicitly.
    pub fn allow<I>(mut self, from: S, to: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        if !self.edges.contains_key(&from) {
            self.order.push(from.clone());
        }
        let successors = self.edges.entry(from).or_default();
        for state in to {
            if !successors.contains(&state) {
                successors.push(state);
            }
        }
        self
    }

    /// Configured successors of `from`, or an empty slice if `from` is
    /// not in the table.
    pub fn successors(&self, from: &S) -> &[S] {
        self.edges.get(from).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `state` has an entry of its own (possibly with no successors).
    pub fn contains_state(&self, state: &S) -> bool {
        self.edges.contains_key(state)
    }

    /// States with an entry, in configuration order.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.order.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<S: State> PartialEq for TransitionTable<S> {
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges
    }
}

impl<S: State> Eq for TransitionTable<S> {}

impl<S: State> Default for TransitionTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> Serialize for TransitionTable<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_map(
            self.order
                .iter()
                .map(|from| (from, self.successors(from))),
        )
    }
}

struct TableVisitor<S>(PhantomData<S>);

impl<'de, S: State> Visitor<'de> for TableVisitor<S> {
    type Value = TransitionTable<S>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from state to a list of successor states")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut table = TransitionTable::new();
        while let Some((from, to)) = map.next_entry::<S, Vec<S>>()? {
            table = table.allow(from, to);
        }
        Ok(table)
    }
}

impl<'de, S: State> Deserialize<'de> for TransitionTable<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TableVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(label: &str) -> String {
        label.to_string()
    }

    fn proforma_table() -> TransitionTable<String> {
        TransitionTable::new()
            .allow(s("PENDIENTE"), [s("APROBADA"), s("RECHAZADA")])
            .allow(s("APROBADA"), [s("CONVERTIDA"), s("RECHAZADA")])
            .allow(s("CONVERTIDA"), [])
            .allow(s("RECHAZADA"), [])
    }

    #[test]
    fn successors_keep_configured_order() {
        let table = proforma_table();
        assert_eq!(
            table.successors(&s("APROBADA")),
            &[s("CONVERTIDA"), s("RECHAZADA")]
        );
    }

    #[test]
    fn absent_state_has_no_successors() {
        let table = proforma_table();
        assert!(table.successors(&s("ANULADA")).is_empty());
        assert!(!table.contains_state(&s("ANULADA")));
    }

    #[test]
    fn explicit_terminal_state_is_contained() {
        let table = proforma_table();
        assert!(table.contains_state(&s("CONVERTIDA")));
        assert!(table.successors(&s("CONVERTIDA")).is_empty());
    }

    #[test]
    fn allow_extends_and_deduplicates() {
        let table = TransitionTable::new()
            .allow(s("A"), [s("B")])
            .allow(s("A"), [s("B"), s("C")]);

        assert_eq!(table.successors(&s("A")), &[s("B"), s("C")]);
        assert_eq!(table.states().count(), 1);
    }

    #[test]
    fn new_table_is_empty() {
        let table: TransitionTable<String> = TransitionTable::default();
        assert!(table.is_empty());
    }

    #[test]
    fn table_loads_from_json_object() {
        let json = r#"{"ABIERTA": ["CERRADA"], "CERRADA": []}"#;
        let table: TransitionTable<String> = serde_json::from_str(json).unwrap();

        assert_eq!(table.successors(&s("ABIERTA")), &[s("CERRADA")]);
        assert!(table.contains_state(&s("CERRADA")));
    }

    #[test]
    fn table_serializes_in_configuration_order() {
        let table = TransitionTable::new()
            .allow(s("B"), [s("A")])
            .allow(s("A"), []);

        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"B":["A"],"A":[]}"#);
    }

    const CASH_SESSION: &str = r#"{
        "CERRADA": ["ABIERTA"],
        "ABIERTA": ["EN_ARQUEO", "SUSPENDIDA"],
        "SUSPENDIDA": ["ABIERTA"],
        "EN_ARQUEO": ["CUADRADA", "CON_DIFERENCIAS"],
        "CON_DIFERENCIAS": ["EN_ARQUEO"],
        "CUADRADA": ["CERRADA"],
        "ANULADA": [],
        "ARCHIVADA": []
    }"#;

    #[test]
    fn json_loads_keep_document_order() {
        let table: TransitionTable<String> = serde_json::from_str(CASH_SESSION).unwrap();

        let states: Vec<&str> = table.states().map(String::as_str).collect();
        assert_eq!(
            states,
            vec![
                "CERRADA",
                "ABIERTA",
                "SUSPENDIDA",
                "EN_ARQUEO",
                "CON_DIFERENCIAS",
                "CUADRADA",
                "ANULADA",
                "ARCHIVADA"
            ]
        );

        let reserialized = serde_json::to_string(&table).unwrap();
        let compact: String = CASH_SESSION.split_whitespace().collect();
        assert_eq!(reserialized, compact);
    }

    #[test]
    fn repeated_json_loads_are_equal() {
        let first: TransitionTable<String> = serde_json::from_str(CASH_SESSION).unwrap();
        for _ in 0..20 {
            let again: TransitionTable<String> = serde_json::from_str(CASH_SESSION).unwrap();
            assert_eq!(again, first);
            assert_eq!(
                serde_json::to_string(&again).unwrap(),
                serde_json::to_string(&first).unwrap()
            );
        }
    }

    #[test]
    fn equality_ignores_declaration_order() {
        let forward = TransitionTable::new()
            .allow(s("A"), [s("B")])
            .allow(s("B"), []);
        let backward = TransitionTable::new()
            .allow(s("B"), [])
            .allow(s("A"), [s("B")]);

        assert_eq!(forward, backward);
        assert_ne!(forward, TransitionTable::new().allow(s("A"), [s("B")]));
    }

    #[test]
    fn non_object_json_is_rejected() {
        let result: Result<TransitionTable<String>, _> = serde_json::from_str(r#"["A", "B"]"#);
        assert!(result.is_err());
    }
}
