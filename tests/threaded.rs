use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use rulesmith::{AttributeRecord, RuleStore, attr, evaluate};

#[test]
fn concurrent_creates_get_unique_dense_ids() {
    const THREADS: u64 = 8;
    const PER_THREAD: u64 = 50;

    let store = RuleStore::new();
    let mut handles = vec![];

    for t in 0..THREADS {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            (0..PER_THREAD)
                .map(|i| {
                    store
                        .create(&format!("t{t}-{i}"), None, &format!("n >= {i}"))
                        .unwrap()
                        .id
                })
                .collect::<Vec<_>>()
        }));
    }

    let ids: BTreeSet<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    let total = THREADS * PER_THREAD;
    assert_eq!(ids.len() as u64, total);
    assert_eq!(ids, (1..=total).collect::<BTreeSet<_>>());
    assert_eq!(store.len() as u64, total);
}

#[test]
fn evaluate_across_threads() {
    let root = Arc::new(
        attr("user.age")
            .gte(18_i64)
            .and(attr("user.status").eq("active")),
    );

    let cases = vec![
        (25_i64, "active", true),
        (30, "suspended", false),
        (15, "active", false),
        (18, "active", true),
    ];

    let handles: Vec<_> = cases
        .into_iter()
        .map(|(age, status, expected)| {
            let root = Arc::clone(&root);
            thread::spawn(move || {
                let record = AttributeRecord::new()
                    .set("user.age", age)
                    .set("user.status", status);
                (evaluate(&root, &record), expected)
            })
        })
        .collect();

    for handle in handles {
        let (result, expected) = handle.join().unwrap();
        assert_eq!(result, Ok(expected));
    }
}

#[test]
fn readers_and_writers_interleave() {
    let store = RuleStore::new();
    let seed_id = store.create("seed", None, "score > 10").unwrap().id;

    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for i in 0..100 {
                store.create(&format!("w{i}"), None, "score < 5").unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                let record = AttributeRecord::new().set("score", 11_i64);
                for _ in 0..100 {
                    let rule = store.get(seed_id).unwrap();
                    let result = rule.evaluate(&record).unwrap();
                    store
                        .record_evaluation(seed_id, serde_json::json!({"score": 11}), result)
                        .unwrap();
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(store.len(), 101);
    let history = store.evaluations(seed_id, 0, usize::MAX).unwrap();
    assert_eq!(history.len(), 400);
    assert!(history.iter().all(|e| e.result));
    let ids: BTreeSet<u64> = history.iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), 400);
}
