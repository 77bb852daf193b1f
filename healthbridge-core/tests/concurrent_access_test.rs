//! Concurrent registration tests
//!
//! These tests verify that registration stays atomic when several callers
//! race on the same slot, both through one shared store and through
//! independent store instances (the way separate processes would).
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;
use tempfile::TempDir;

use healthbridge_core::adapters::file::FileSlotStorage;
use healthbridge_core::adapters::memory::MemorySlotStorage;
use healthbridge_core::{AccountStore, Error, PasswordPolicy};

/// Number of concurrent threads for stress tests
const THREAD_COUNT: usize = 8;

/// Registrations per thread in the distinct-email tests
const ITERATIONS_PER_THREAD: usize = 5;

fn open_file_store(dir: &Path) -> AccountStore {
    let storage = FileSlotStorage::new(dir).expect("Failed to open file storage");
    AccountStore::new(Arc::new(storage), PasswordPolicy::Plaintext)
}

/// Test: every thread registers the same email through one shared store.
///
/// Exactly one registration may win; the rest must see DuplicateAccount.
#[test]
fn test_same_email_race_on_shared_store() {
    let store = Arc::new(AccountStore::new(
        Arc::new(MemorySlotStorage::new()),
        PasswordPolicy::Plaintext,
    ));
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let success_count = Arc::new(AtomicUsize::new(0));
    let duplicate_count = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];

    for thread_id in 0..THREAD_COUNT {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        let success_count = Arc::clone(&success_count);
        let duplicate_count = Arc::clone(&duplicate_count);

        handles.push(thread::spawn(move || {
            barrier.wait();
            let email = if thread_id % 2 == 0 { "jane@x.com" } else { "JANE@X.COM" };
            match store.register(&format!("Jane {}", thread_id), email, "pw1") {
                Ok(_) => {
                    success_count.fetch_add(1, Ordering::SeqCst);
                }
                Err(Error::DuplicateAccount(_)) => {
                    duplicate_count.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => panic!("Thread {}: unexpected error: {}", thread_id, e),
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    println!(
        "Shared store: {} success, {} duplicate",
        success_count.load(Ordering::SeqCst),
        duplicate_count.load(Ordering::SeqCst)
    );

    assert_eq!(success_count.load(Ordering::SeqCst), 1);
    assert_eq!(duplicate_count.load(Ordering::SeqCst), THREAD_COUNT - 1);
    assert_eq!(store.count(), 1);
}

/// Test: each thread opens its OWN store over the same directory and races
/// on one email. The slot lock file must serialize them.
#[test]
fn test_same_email_race_across_store_instances() {
    let temp_dir = TempDir::new().unwrap();
    let dir: Arc<PathBuf> = Arc::new(temp_dir.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let success_count = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];

    for thread_id in 0..THREAD_COUNT {
        let dir = Arc::clone(&dir);
        let barrier = Arc::clone(&barrier);
        let success_count = Arc::clone(&success_count);

        handles.push(thread::spawn(move || {
            let store = open_file_store(&dir);
            barrier.wait();

            let start = Instant::now();
            let result = store.register("Jane Doe", "jane@x.com", "pw1");
            println!("Thread {}: {:?} after {:?}", thread_id, result.is_ok(), start.elapsed());

            match result {
                Ok(_) => {
                    success_count.fetch_add(1, Ordering::SeqCst);
                }
                Err(Error::DuplicateAccount(_)) => {}
                Err(e) => panic!("Thread {}: unexpected error: {}", thread_id, e),
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(success_count.load(Ordering::SeqCst), 1);
    assert_eq!(open_file_store(&dir).count(), 1);
}

/// Test: independent store instances registering distinct emails must not
/// lose each other's writes.
#[test]
fn test_distinct_emails_are_never_lost() {
    let temp_dir = TempDir::new().unwrap();
    let dir: Arc<PathBuf> = Arc::new(temp_dir.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let mut handles = vec![];

    for thread_id in 0..THREAD_COUNT {
        let dir = Arc::clone(&dir);
        let barrier = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            let store = open_file_store(&dir);
            barrier.wait();

            for i in 0..ITERATIONS_PER_THREAD {
                let email = format!("user{}_{}@x.com", thread_id, i);
                store
                    .register(&format!("User {} {}", thread_id, i), &email, "pw")
                    .unwrap_or_else(|e| panic!("Thread {}: {}", thread_id, e));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let store = open_file_store(&dir);
    assert_eq!(store.count(), THREAD_COUNT * ITERATIONS_PER_THREAD);
    for thread_id in 0..THREAD_COUNT {
        for i in 0..ITERATIONS_PER_THREAD {
            assert!(store.exists(&format!("USER{}_{}@X.COM", thread_id, i)));
        }
    }
}

/// Test: readers running alongside writers never observe a torn blob.
#[test]
fn test_readers_never_see_partial_writes() {
    let temp_dir = TempDir::new().unwrap();
    let dir: Arc<PathBuf> = Arc::new(temp_dir.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(2));
    let corrupt_reads = Arc::new(AtomicUsize::new(0));

    let writer = {
        let dir = Arc::clone(&dir);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            let store = open_file_store(&dir);
            barrier.wait();
            for i in 0..50 {
                store
                    .register("Writer", &format!("w{}@x.com", i), "pw")
                    .unwrap();
            }
        })
    };

    let reader = {
        let dir = Arc::clone(&dir);
        let barrier = Arc::clone(&barrier);
        let corrupt_reads = Arc::clone(&corrupt_reads);
        thread::spawn(move || {
            let store = open_file_store(&dir);
            barrier.wait();
            for _ in 0..200 {
                if let Err(Error::Serialization(_)) = store.read_accounts() {
                    corrupt_reads.fetch_add(1, Ordering::SeqCst);
                }
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();

    assert_eq!(corrupt_reads.load(Ordering::SeqCst), 0);
    assert_eq!(open_file_store(&dir).count(), 50);
}
