//! Dynamic record arrays.
//!
//! Forms here have a highly repetitive "one card per drum/batch/insumo"
//! shape. This controller centralizes the add/remove/index-path logic so
//! no screen re-derives it, and it is the one place where index-vs-identity
//! bugs are prevented by construction: every entry carries an [`EntryId`]
//! that survives removals, and any write that was captured against an
//! entry (a barcode scan still in flight, say) resolves its target by that
//! identity — never by a numeric index that may have shifted underneath it.

use super::FormModel;
use crate::error::{FichaError, Result};
use crate::path::FieldPath;
use crate::schema::FieldKind;
use crate::value::Value;
use std::fmt;
use uuid::Uuid;

/// Stable identity of one record-array entry, independent of its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FormModel {
    /// Appends a record seeded from `default` and returns its fresh
    /// identity.
    pub fn append_record(&mut self, array: &FieldPath, default: Value) -> Result<EntryId> {
        self.expect_array(array)?;
        let mut items = self.list_at(array);
        items.push(default);
        self.values.set_at(array, Value::List(items))?;
        let id = EntryId::new();
        self.identities.entry(array.clone()).or_default().push(id);
        self.revalidate(array);
        Ok(id)
    }

    /// Removes the entry currently at `index`, shifting later entries down.
    ///
    /// Refuses — as a silent no-op, returning `false` — when the array is
    /// already at its schema-declared minimum, independent of whatever the
    /// UI chose to offer. Also a no-op for an out-of-range index.
    pub fn remove_record(&mut self, array: &FieldPath, index: usize) -> Result<bool> {
        let min_len = self.expect_array(array)?;
        let mut items = self.list_at(array);
        if index >= items.len() || items.len() <= min_len {
            return Ok(false);
        }
        items.remove(index);
        self.values.set_at(array, Value::List(items))?;
        if let Some(ids) = self.identities.get_mut(array) {
            if index < ids.len() {
                ids.remove(index);
            }
        }
        // Positional errors under the array are stale after the shift;
        // drop them and let validation re-derive the survivors.
        self.errors.retain(|path, _| !path.starts_with(array));
        self.revalidate(array);
        Ok(true)
    }

    /// Current entries in array order, as `(identity, index)` pairs.
    pub fn entries(&self, array: &FieldPath) -> Result<Vec<(EntryId, usize)>> {
        self.expect_array(array)?;
        Ok(self
            .identities
            .get(array)
            .map(|ids| ids.iter().copied().enumerate().map(|(i, id)| (id, i)).collect())
            .unwrap_or_default())
    }

    /// Where the entry identified by `id` currently sits, if it still exists.
    pub fn entry_index(&self, array: &FieldPath, id: EntryId) -> Option<usize> {
        self.identities
            .get(array)?
            .iter()
            .position(|candidate| *candidate == id)
    }

    /// Writes a field of the entry identified by `id`, resolving the target
    /// position at write time. Returns `false` — dropping the write — when
    /// the entry was removed while the value was in flight.
    pub fn set_entry_value(
        &mut self,
        array: &FieldPath,
        id: EntryId,
        field: &str,
        value: Value,
    ) -> Result<bool> {
        let Some(index) = self.entry_index(array, id) else {
            return Ok(false);
        };
        self.set_value(&array.index(index).child(field), value)?;
        Ok(true)
    }

    /// Regenerates identities for every record-array field to match the
    /// current value tree. Called on construction and on every reset.
    pub(super) fn reseed_identities(&mut self) {
        let mut identities = std::collections::BTreeMap::new();
        let mut arrays = Vec::new();
        collect_arrays(&self.schema, &FieldPath::root(), &mut arrays);
        for array in arrays {
            let len = self
                .values
                .at(&array)
                .as_list()
                .map(<[Value]>::len)
                .unwrap_or(0);
            identities.insert(array, (0..len).map(|_| EntryId::new()).collect());
        }
        self.identities = identities;
    }

    fn expect_array(&self, array: &FieldPath) -> Result<usize> {
        match &self.schema.resolve(array)?.kind {
            FieldKind::RecordArray { min_len, .. } => Ok(*min_len),
            _ => Err(FichaError::KindMismatch {
                path: array.to_string(),
                expected: "record-array",
            }),
        }
    }

    fn list_at(&self, array: &FieldPath) -> Vec<Value> {
        self.values
            .at(array)
            .as_list()
            .map(<[Value]>::to_vec)
            .unwrap_or_default()
    }
}

/// Record-array fields reachable through nested records. Arrays nested
/// inside other arrays are not tracked (no schema in the catalog nests
/// them, and their paths would shift with the outer array).
fn collect_arrays(schema: &crate::schema::FormSchema, base: &FieldPath, out: &mut Vec<FieldPath>) {
    for (name, field) in schema.iter() {
        let path = base.child(name);
        match &field.kind {
            FieldKind::RecordArray { .. } => out.push(path),
            FieldKind::Record(inner) => collect_arrays(inner, &path, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSchema, FormSchema};

    fn bottling_form() -> FormModel {
        let insumo = FormSchema::new()
            .field("modelo_garrafa", FieldSchema::text())
            .field("codigo_barras", FieldSchema::text());
        FormModel::new(
            FormSchema::new()
                .field("lote_producao", FieldSchema::text().required())
                .field("insumos", FieldSchema::record_array(insumo, 1)),
        )
    }

    #[test]
    fn defaults_seed_one_entry_with_an_identity() {
        let form = bottling_form();
        let entries = form.entries(&"insumos".into()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1, 0);
    }

    #[test]
    fn append_assigns_fresh_identities() {
        let mut form = bottling_form();
        let a = form.append_record(&"insumos".into(), Value::record()).unwrap();
        let b = form.append_record(&"insumos".into(), Value::record()).unwrap();
        assert_ne!(a, b);
        assert_eq!(form.entries(&"insumos".into()).unwrap().len(), 3);
    }

    #[test]
    fn remove_never_drops_below_the_minimum() {
        let mut form = bottling_form();
        form.append_record(&"insumos".into(), Value::record()).unwrap();
        form.append_record(&"insumos".into(), Value::record()).unwrap();

        assert!(form.remove_record(&"insumos".into(), 0).unwrap());
        assert!(form.remove_record(&"insumos".into(), 0).unwrap());
        // One left; the schema demands at least one.
        assert!(!form.remove_record(&"insumos".into(), 0).unwrap());
        assert_eq!(form.entries(&"insumos".into()).unwrap().len(), 1);
    }

    #[test]
    fn out_of_range_removal_is_a_no_op() {
        let mut form = bottling_form();
        form.append_record(&"insumos".into(), Value::record()).unwrap();
        assert!(!form.remove_record(&"insumos".into(), 7).unwrap());
        assert_eq!(form.entries(&"insumos".into()).unwrap().len(), 2);
    }

    #[test]
    fn identity_survives_removal_of_an_earlier_entry() {
        let mut form = bottling_form();
        let array: FieldPath = "insumos".into();
        let b = form.append_record(&array, Value::record()).unwrap();
        let c = form.append_record(&array, Value::record()).unwrap();
        form.set_value(&"insumos.2.modelo_garrafa".into(), Value::Text("500ml".into()))
            .unwrap();

        // C sits at index 2 until B is removed underneath it.
        assert_eq!(form.entry_index(&array, c), Some(2));
        form.remove_record(&array, form.entry_index(&array, b).unwrap())
            .unwrap();
        assert_eq!(form.entry_index(&array, c), Some(1));

        // The pending write captured "entry C", not "index 2".
        let landed = form
            .set_entry_value(&array, c, "codigo_barras", Value::Text("789100012".into()))
            .unwrap();
        assert!(landed);
        assert_eq!(
            form.value(&"insumos.1.codigo_barras".into()).as_str(),
            Some("789100012")
        );
        assert_eq!(
            form.value(&"insumos.1.modelo_garrafa".into()).as_str(),
            Some("500ml")
        );
    }

    #[test]
    fn writes_for_removed_entries_are_dropped() {
        let mut form = bottling_form();
        let array: FieldPath = "insumos".into();
        let b = form.append_record(&array, Value::record()).unwrap();
        form.remove_record(&array, 1).unwrap();

        let landed = form
            .set_entry_value(&array, b, "codigo_barras", Value::Text("X".into()))
            .unwrap();
        assert!(!landed);
    }

    #[test]
    fn reset_reissues_identities_for_the_restored_length() {
        let mut form = bottling_form();
        let before = form.entries(&"insumos".into()).unwrap()[0].0;

        let mut restored = form.schema().defaults();
        let seed = restored.at(&"insumos.0".into()).clone();
        restored
            .set_at(&"insumos".into(), Value::List(vec![seed.clone(), seed]))
            .unwrap();
        form.reset(restored);

        let entries = form.entries(&"insumos".into()).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|(id, _)| *id != before));
    }
}
