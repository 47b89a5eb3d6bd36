mod common;

use std::sync::Arc;
use std::thread;

use common::{approval_flow, single_step};
use procflow_core::{AccountData, AccountType, ContentDigest, DefinitionDocumentStore, DefinitionError, DefinitionKey,
                    DefinitionPersistenceService, DefinitionUpdate, InMemoryDocumentStore, ProcessDefStatus,
                    ProcessDefinitionRecord, RecordPatch};
use uuid::Uuid;

fn service() -> DefinitionPersistenceService<InMemoryDocumentStore> {
    DefinitionPersistenceService::new(InMemoryDocumentStore::new())
}

/// Almacén que devuelve el blob de un registro sustituido por `blob`.
struct CorruptBlobStore {
    inner: InMemoryDocumentStore,
    blob: &'static str,
}

impl DefinitionDocumentStore for CorruptBlobStore {
    fn find_all(&self) -> Result<Vec<ProcessDefinitionRecord>, DefinitionError> {
        self.inner.find_all()
    }
    fn find_by_status(&self, status: ProcessDefStatus) -> Result<Vec<ProcessDefinitionRecord>, DefinitionError> {
        self.inner.find_by_status(status)
    }
    fn content_exists(&self, flow_id: &str, digest: &ContentDigest) -> Result<bool, DefinitionError> {
        self.inner.content_exists(flow_id, digest)
    }
    fn insert(&self, record: ProcessDefinitionRecord) -> Result<(), DefinitionError> {
        self.inner.insert(record)
    }
    fn find_one(&self, key: DefinitionKey) -> Result<Option<ProcessDefinitionRecord>, DefinitionError> {
        Ok(self.inner.find_one(key)?.map(|mut r| {
                                        r.encoded_definition = self.blob.to_string();
                                        r
                                    }))
    }
    fn update_one(&self, key: DefinitionKey, patch: &RecordPatch) -> Result<u64, DefinitionError> {
        self.inner.update_one(key, patch)
    }
}

#[test]
fn end_to_end_create_find_status_update() {
    let svc = service();
    let id = Uuid::new_v4();
    let tree = single_step("F1", id);
    let accounts = [AccountData::new("ops", AccountType::Group)];

    let d1 = svc.create(&tree, ProcessDefStatus::Draft, 1, &accounts).expect("create v1");

    let found = svc.try_find(id, 1).unwrap().expect("v1 stored");
    assert_eq!(found.definition, tree);
    assert_eq!(found.status, ProcessDefStatus::Draft);
    assert_eq!(found.accounts, accounts.to_vec());

    // mismo contenido, mismo linaje, otra versión -> rechazado
    let again = single_step("F1", id);
    match svc.create(&again, ProcessDefStatus::Draft, 2, &[]) {
        Err(DefinitionError::DuplicateContent { flow_id, digest }) => {
            assert_eq!(flow_id, "F1");
            assert_eq!(digest, d1);
        }
        other => panic!("expected DuplicateContent, got {other:?}"),
    }
    assert!(svc.try_find(id, 2).unwrap().is_none());

    assert!(svc.set_status(id, 1, ProcessDefStatus::Active).unwrap());
    assert!(svc.set_status(id, 1, ProcessDefStatus::Active).unwrap());
    assert!(!svc.set_status(Uuid::new_v4(), 1, ProcessDefStatus::Active).unwrap());

    let before = svc.store().find_one(DefinitionKey::new(id, 1)).unwrap().unwrap();
    svc.update(id, 1, DefinitionUpdate::new().description("v2")).unwrap();
    let after = svc.store().find_one(DefinitionKey::new(id, 1)).unwrap().unwrap();
    assert_eq!(after.description, "v2");
    assert_eq!(after.name, before.name);
    assert!(after.last_modified > before.last_modified);
    assert_eq!(after.digest, before.digest);
    assert_eq!(after.status, ProcessDefStatus::Active);
}

#[test]
fn empty_update_performs_no_write() {
    let svc = service();
    let id = Uuid::new_v4();
    svc.create(&single_step("F1", id), ProcessDefStatus::Draft, 1, &[]).unwrap();
    let before = svc.store().find_one(DefinitionKey::new(id, 1)).unwrap().unwrap();
    svc.update(id, 1, DefinitionUpdate::new()).unwrap();
    svc.update_with(id, 1, |_| {}).unwrap();
    let after = svc.store().find_one(DefinitionKey::new(id, 1)).unwrap().unwrap();
    assert_eq!(before, after);
}

#[test]
fn update_touches_only_assigned_fields() {
    let svc = service();
    let id = Uuid::new_v4();
    svc.create(&approval_flow("F1", id), ProcessDefStatus::Draft, 1, &[]).unwrap();
    svc.update_with(id, 1, |u| u.name = Some("renamed".into())).unwrap();
    let r = svc.store().find_one(DefinitionKey::new(id, 1)).unwrap().unwrap();
    assert_eq!(r.name, "renamed");
    assert_eq!(r.description, "two-step approval");
    // cadena vacía asignada explícitamente != campo no asignado
    svc.update(id, 1, DefinitionUpdate::new().description("")).unwrap();
    let r = svc.store().find_one(DefinitionKey::new(id, 1)).unwrap().unwrap();
    assert_eq!(r.description, "");
    assert_eq!(r.name, "renamed");
    // el miss es silencioso
    svc.update(Uuid::new_v4(), 1, DefinitionUpdate::new().name("x")).unwrap();
}

#[test]
fn versions_are_independent_records() {
    let svc = service();
    let id = Uuid::new_v4();
    let v1 = approval_flow("F1", id);
    let mut v2 = v1.clone();
    v2.steps[1].name = "archive v2".into();
    svc.create(&v1, ProcessDefStatus::Draft, 1, &[]).unwrap();
    svc.create(&v2, ProcessDefStatus::Draft, 2, &[]).unwrap();

    assert!(svc.set_status(id, 1, ProcessDefStatus::Active).unwrap());
    svc.update(id, 1, DefinitionUpdate::new().name("only v1")).unwrap();

    let r2 = svc.store().find_one(DefinitionKey::new(id, 2)).unwrap().unwrap();
    assert_eq!(r2.status, ProcessDefStatus::Draft);
    assert_eq!(r2.name, "Invoice approval");
    assert_eq!(svc.try_find(id, 2).unwrap().unwrap().definition, v2);

    let active = svc.list_active(&[]).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!((active[0].id, active[0].version), (id, 1));
    assert_eq!(svc.list_all(&[AccountData::new("anyone", AccountType::User)]).unwrap().len(), 2);
}

#[test]
fn reusing_a_composite_key_is_rejected_by_the_store() {
    let svc = service();
    let id = Uuid::new_v4();
    svc.create(&single_step("F1", id), ProcessDefStatus::Draft, 1, &[]).unwrap();
    let other = approval_flow("F1", id);
    assert!(matches!(svc.create(&other, ProcessDefStatus::Draft, 1, &[]),
                     Err(DefinitionError::DuplicateKey { version: 1, .. })));
}

#[test]
fn same_content_in_another_lineage_is_allowed() {
    let svc = service();
    svc.create(&single_step("F1", Uuid::new_v4()), ProcessDefStatus::Draft, 1, &[]).unwrap();
    svc.create(&single_step("F2", Uuid::new_v4()), ProcessDefStatus::Draft, 1, &[]).unwrap();
    assert_eq!(svc.list_all(&[]).unwrap().len(), 2);
}

#[test]
fn version_zero_is_invalid() {
    let svc = service();
    let r = svc.create(&single_step("F1", Uuid::new_v4()), ProcessDefStatus::Draft, 0, &[]);
    assert!(matches!(r, Err(DefinitionError::InvalidInput(_))));
    assert!(svc.store().is_empty().unwrap());
}

#[test]
fn corrupt_blob_surfaces_decode_error() {
    // "not json" en base64
    let svc = DefinitionPersistenceService::new(CorruptBlobStore { inner: InMemoryDocumentStore::new(),
                                                                   blob: "bm90IGpzb24=" });
    let id = Uuid::new_v4();
    svc.create(&single_step("F1", id), ProcessDefStatus::Draft, 1, &[]).unwrap();
    assert!(matches!(svc.try_find(id, 1), Err(DefinitionError::Decode(_))));
    assert!(svc.try_find(id, 2).unwrap().is_none());
}

#[test]
fn concurrent_creates_of_identical_content_store_once() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let handles: Vec<_> = (0..8).map(|i| {
                                    let store = Arc::clone(&store);
                                    thread::spawn(move || {
                                        let svc = DefinitionPersistenceService::new(store);
                                        svc.create(&single_step("F1", Uuid::new_v4()),
                                                   ProcessDefStatus::Draft,
                                                   i + 1,
                                                   &[])
                                    })
                                })
                                .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let ok = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1);
    assert!(results.iter()
                   .filter(|r| r.is_err())
                   .all(|r| matches!(r, Err(DefinitionError::DuplicateContent { .. }))));
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn create_accounts_is_a_noop() {
    let svc = service();
    svc.create_accounts(&[AccountData::new("x", AccountType::Role)]).unwrap();
    assert!(svc.store().is_empty().unwrap());
}
