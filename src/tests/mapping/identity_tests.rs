use super::*;

#[test]
fn remote_lookup_never_mints() {
    let map = IdentityMap::new();
    assert_eq!(map.remote_id_for(&LocalId::new()), None);
    assert!(map.is_empty());
}

#[test]
fn local_lookup_mints_once_and_links_both_ways() {
    let map = IdentityMap::new();
    let remote = RemoteId::from("5f1a");

    let first = map.local_id_for(&remote);
    let second = map.local_id_for(&remote);
    assert_eq!(first, second);
    assert_eq!(map.remote_id_for(&first), Some(remote));
    assert_eq!(map.len(), 1);
}

#[test]
fn bind_is_idempotent_for_the_same_pair() {
    let map = IdentityMap::new();
    let local = LocalId::new();
    map.bind(local, RemoteId::from("a1"));
    map.bind(local, RemoteId::from("a1"));
    assert_eq!(map.len(), 1);
    assert_eq!(map.local_id_for(&RemoteId::from("a1")), local);
}

#[test]
#[should_panic(expected = "identity map violation")]
fn bind_rejects_second_remote_for_local() {
    let map = IdentityMap::new();
    let local = LocalId::new();
    map.bind(local, RemoteId::from("a1"));
    map.bind(local, RemoteId::from("a2"));
}

#[test]
#[should_panic(expected = "identity map violation")]
fn bind_rejects_second_local_for_remote() {
    let map = IdentityMap::new();
    map.bind(LocalId::new(), RemoteId::from("a1"));
    map.bind(LocalId::new(), RemoteId::from("a1"));
}

#[test]
fn stays_bijective_over_mixed_insertions() {
    let map = IdentityMap::new();
    let mut locals = Vec::new();
    for i in 0..50 {
        let remote = RemoteId(format!("r{}", i));
        if i % 2 == 0 {
            let local = LocalId::new();
            map.bind(local, remote.clone());
            locals.push((local, remote));
        } else {
            let local = map.local_id_for(&remote);
            locals.push((local, remote));
        }
        // Repeated lookups never create new links.
        let (local, remote) = locals.last().unwrap();
        assert_eq!(map.local_id_for(remote), *local);
    }

    assert_eq!(map.len(), 50);
    let mut seen_remote = std::collections::HashSet::new();
    let mut seen_local = std::collections::HashSet::new();
    for (local, remote) in &locals {
        assert_eq!(map.remote_id_for(local).as_ref(), Some(remote));
        assert!(seen_remote.insert(remote.clone()));
        assert!(seen_local.insert(*local));
    }
}

#[test]
fn versions_keep_latest_value() {
    let map = IdentityMap::new();
    let remote = RemoteId::from("m1");
    assert_eq!(map.version_of(&remote), None);
    map.record_version(&remote, 0);
    map.record_version(&remote, 3);
    assert_eq!(map.version_of(&remote), Some(3));
}

#[test]
fn concurrent_minting_yields_one_local_id() {
    let map = std::sync::Arc::new(IdentityMap::new());
    let remote = RemoteId::from("shared");
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let map = map.clone();
            let remote = remote.clone();
            std::thread::spawn(move || map.local_id_for(&remote))
        })
        .collect();
    let ids: Vec<LocalId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(map.len(), 1);
}
