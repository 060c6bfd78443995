// ==============================================
// BACKEND REGISTRY (integration)
// ==============================================
//
// The registry macros must visit every backend exactly once, under its
// display name, with a type that implements the contract.

use std::collections::HashSet;

use bytes::Bytes;

use bench_support::{for_each_backend, for_each_concurrent_backend};
use cachebench::backend::{Backend, BackendKind, CapacityHints};
use cachebench::codec::{BinaryCodec, RawCodec, Record};

#[test]
fn every_backend_is_visited_once() {
    let mut visited = Vec::new();
    for_each_backend! {
        codec = BinaryCodec;
        with |display_name, B| {
            visited.push((display_name, <B as Backend<Record>>::NAME));
        }
    }

    let names: Vec<_> = visited.iter().map(|(_, name)| *name).collect();
    let expected: Vec<_> = BackendKind::ALL.iter().map(|kind| kind.as_str()).collect();
    assert_eq!(names, expected);

    let display: HashSet<_> = visited.iter().map(|(display, _)| *display).collect();
    assert_eq!(display.len(), BackendKind::ALL.len());
}

#[test]
fn concurrent_registry_skips_only_stdmap() {
    let mut names = Vec::new();
    for_each_concurrent_backend! {
        codec = RawCodec;
        with |_display_name, B| {
            names.push(<B as Backend<Bytes>>::NAME);
        }
    }
    assert_eq!(names, ["lockedmap", "dashmap", "quickcache", "moka"]);
}

#[test]
fn registered_backends_store_and_return_records() {
    let hints = CapacityHints::default();
    let mut hits = 0;
    for_each_backend! {
        codec = BinaryCodec;
        with |_display_name, B| {
            let backend = <B as Backend<Record>>::with_capacity(&hints);
            backend.set("key-0000000001", Record::new(1)).unwrap();
            if backend.get("key-0000000001").unwrap() == Some(Record::new(1)) {
                hits += 1;
            }
        }
    }
    assert_eq!(hits, BackendKind::ALL.len());
}
