use super::*;

#[test]
fn insert_get_remove() {
    let mut t = ResourceTable::new();
    let a = t.insert("a");
    let b = t.insert("b");
    assert_eq!(t.len(), 2);
    assert_eq!(t.get(a), Some(&"a"));
    assert_eq!(t.remove(a), Some("a"));
    assert_eq!(t.get(a), None);
    assert_eq!(t.get(b), Some(&"b"));
    assert_eq!(t.len(), 1);
}

#[test]
fn stale_handle_does_not_alias_reused_slot() {
    let mut t = ResourceTable::new();
    let old = t.insert(1);
    t.remove(old);
    let new = t.insert(2);
    assert_eq!(old.index(), new.index());
    assert_ne!(old.generation(), new.generation());
    assert_eq!(t.get(old), None);
    assert_eq!(t.remove(old), None);
    assert_eq!(t.get(new), Some(&2));
}

#[test]
fn take_and_restore_keep_the_slot() {
    let mut t = ResourceTable::new();
    let id = t.insert(vec![1u8, 2, 3]);
    let v = t.take(id).unwrap();
    assert_eq!(t.len(), 1);
    assert!(t.get(id).is_none());
    let other = t.insert(vec![9]);
    assert_ne!(other.index(), id.index());
    t.restore(id, v);
    assert_eq!(t.get(id).map(Vec::len), Some(3));
}

#[test]
fn debug_shows_index_and_generation() {
    let mut t = ResourceTable::new();
    let a = t.insert(());
    t.remove(a);
    let b = t.insert(());
    assert_eq!(format!("{b:?}"), "TextureId(0v1)");
}
