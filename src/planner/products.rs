//! Active Product List
//!
//! Per-period list of products the user wants menus to favor. Adding an
//! existing name updates and re-surfaces the entry instead of duplicating it.
//! Every change persists locally; the cloud mirror is notified through an
//! optional hook so the list stays usable without a sync worker.

use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::{normalize_name, ActiveProduct, DomainError, DomainResult, ProductScope};
use crate::repository::{keys, DocumentStore};

/// Called with the full list after every persisted change, so a cloud worker
/// can schedule a push.
pub type ChangeHook = Box<dyn Fn(&str, &[ActiveProduct]) + Send + Sync>;

pub struct ActiveProductList {
    docs: Arc<dyn DocumentStore>,
    range_key: String,
    items: Vec<ActiveProduct>,
    on_change: Option<ChangeHook>,
}

impl ActiveProductList {
    /// Load the list for a range. Unreadable documents start empty; malformed
    /// entries are dropped silently.
    pub fn load(docs: Arc<dyn DocumentStore>, range_key: &str) -> Self {
        let items = match docs.read(&keys::active_products(range_key)) {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read active products, starting empty: {}", e);
                Vec::new()
            }
        };
        Self {
            docs,
            range_key: range_key.to_string(),
            items,
            on_change: None,
        }
    }

    /// Install the cloud notification hook.
    pub fn with_change_hook(mut self, hook: ChangeHook) -> Self {
        self.on_change = Some(hook);
        self
    }

    pub fn items(&self) -> &[ActiveProduct] {
        &self.items
    }

    pub fn visible(&self) -> impl Iterator<Item = &ActiveProduct> {
        self.items.iter().filter(|p| !p.hidden)
    }

    fn next_id(&self) -> String {
        let max = self
            .items
            .iter()
            .filter_map(|p| p.id.strip_prefix("prod-").and_then(|n| n.parse::<u64>().ok()))
            .max()
            .unwrap_or(0);
        format!("prod-{}", max + 1)
    }

    /// Add a product, or update and re-surface the entry with the same
    /// normalized name. Returns the surviving entry's id.
    pub fn add(
        &mut self,
        name: &str,
        scope: ProductScope,
        until_date: Option<NaiveDate>,
        note: Option<String>,
    ) -> DomainResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInput("Product name is empty".into()));
        }
        let wanted = normalize_name(trimmed);

        if let Some(existing) = self.items.iter_mut().find(|p| normalize_name(&p.name) == wanted) {
            existing.name = trimmed.to_string();
            existing.scope = scope;
            existing.until_date = until_date;
            existing.note = note;
            existing.hidden = false;
            let id = existing.id.clone();
            self.persist();
            return Ok(id);
        }

        let id = self.next_id();
        self.items.push(ActiveProduct {
            id: id.clone(),
            name: trimmed.to_string(),
            scope,
            until_date,
            prefer: false,
            note,
            hidden: false,
        });
        self.persist();
        Ok(id)
    }

    /// Remove by id; unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) {
        let before = self.items.len();
        self.items.retain(|p| p.id != id);
        if self.items.len() != before {
            self.persist();
        }
    }

    pub fn set_hidden(&mut self, id: &str, hidden: bool) -> DomainResult<()> {
        let product = self
            .items
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Product {}", id)))?;
        product.hidden = hidden;
        self.persist();
        Ok(())
    }

    pub fn set_prefer(&mut self, id: &str, prefer: bool) -> DomainResult<()> {
        let product = self
            .items
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Product {}", id)))?;
        product.prefer = prefer;
        self.persist();
        Ok(())
    }

    /// Replace the whole list with a cloud snapshot. The hydration gate in
    /// the sync layer makes sure this happens at most once per range.
    pub fn replace_all(&mut self, products: Vec<ActiveProduct>) {
        self.items = products;
        self.persist();
    }

    fn persist(&self) {
        match serde_json::to_string(&self.items) {
            Ok(raw) => {
                if let Err(e) = self.docs.write(&keys::active_products(&self.range_key), &raw) {
                    log::warn!("Failed to persist active products, continuing in memory: {}", e);
                }
            }
            Err(e) => log::warn!("Active products refused to serialize: {}", e),
        }
        if let Some(hook) = &self.on_change {
            hook(&self.range_key, &self.items);
        }
    }
}

fn decode(raw: &str) -> Vec<ActiveProduct> {
    let Ok(entries) = serde_json::from_str::<Vec<Value>>(raw) else {
        log::warn!("Unreadable active products document, starting empty");
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|e| serde_json::from_value(e).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryDocumentStore;
    use std::sync::Mutex;

    fn fresh_list() -> ActiveProductList {
        ActiveProductList::load(Arc::new(MemoryDocumentStore::new()), "2024-01-01__2024-01-07")
    }

    #[test]
    fn test_add_and_persist_round_trip() {
        let docs: Arc<MemoryDocumentStore> = Arc::new(MemoryDocumentStore::new());
        let range = "2024-01-01__2024-01-07";
        {
            let mut list = ActiveProductList::load(docs.clone(), range);
            list.add("Кабачки", ProductScope::InPeriod, None, None).unwrap();
            list.add("Творог", ProductScope::Persistent, None, Some("со скидкой".into()))
                .unwrap();
        }
        let list = ActiveProductList::load(docs, range);
        assert_eq!(list.items().len(), 2);
        assert_eq!(list.items()[1].note.as_deref(), Some("со скидкой"));
    }

    #[test]
    fn test_add_dedupes_by_normalized_name() {
        let mut list = fresh_list();
        let first = list.add("Кабачки", ProductScope::InPeriod, None, None).unwrap();
        list.set_hidden(&first, true).unwrap();

        let second = list
            .add("  кабачки ", ProductScope::Persistent, None, None)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(list.items().len(), 1);
        // re-adding updates and re-surfaces
        assert!(!list.items()[0].hidden);
        assert_eq!(list.items()[0].scope, ProductScope::Persistent);
        assert_eq!(list.items()[0].name, "кабачки");
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut list = fresh_list();
        list.add("Творог", ProductScope::InPeriod, None, None).unwrap();
        list.remove("prod-999");
        assert_eq!(list.items().len(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut list = fresh_list();
        assert!(matches!(
            list.add("   ", ProductScope::InPeriod, None, None),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_malformed_entries_dropped_on_load() {
        let docs: Arc<MemoryDocumentStore> = Arc::new(MemoryDocumentStore::new());
        let range = "2024-01-01__2024-01-07";
        docs.write(
            &keys::active_products(range),
            r#"[{"id":"prod-1","name":"Кабачки"},{"bogus":1},42]"#,
        )
        .unwrap();
        let list = ActiveProductList::load(docs, range);
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].name, "Кабачки");
    }

    #[test]
    fn test_change_hook_sees_every_persisted_change() {
        let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_hook = seen.clone();
        let mut list = fresh_list().with_change_hook(Box::new(move |_range, items| {
            seen_hook.lock().unwrap().push(items.len());
        }));

        let id = list.add("Кабачки", ProductScope::InPeriod, None, None).unwrap();
        list.set_prefer(&id, true).unwrap();
        list.remove(&id);
        assert_eq!(*seen.lock().unwrap(), vec![1, 1, 0]);
    }
}
