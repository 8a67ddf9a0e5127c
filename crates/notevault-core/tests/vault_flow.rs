use std::sync::Arc;
use std::thread;
use std::time::Duration;

use notevault_core::{
    hash_master_password, KdfParams, LockoutPolicy, ManualClock, MasterSecret, VaultError,
    VaultService,
};
use secrecy::SecretString;

const MASTER: &str = "admin123";

fn master() -> MasterSecret {
    MasterSecret::from_password(&SecretString::from(MASTER.to_string()))
        .expect("master password should hash")
}

fn vault_with_clock() -> (VaultService, ManualClock) {
    let clock = ManualClock::default();
    let vault = VaultService::builder(master())
        .kdf_params(KdfParams::new(1024, 1, 1).expect("params should be valid"))
        .clock(Arc::new(clock.clone()))
        .build();
    (vault, clock)
}

#[test]
fn test_lockout_and_reauthorize_scenario() {
    let (vault, clock) = vault_with_clock();

    let id = vault
        .store("hello world", "pw1", "pw1")
        .expect("store should succeed")
        .to_string();

    for expected_remaining in [2, 1, 0] {
        match vault.retrieve(&id, "wrongpw") {
            Err(VaultError::PasskeyMismatch { attempts_remaining }) => {
                assert_eq!(attempts_remaining, expected_remaining);
            }
            other => panic!("expected passkey mismatch, got {:?}", other),
        }
    }

    let status = vault.status().expect("status should succeed");
    assert!(status.is_locked);
    assert_eq!(status.failed_attempts, 3);

    // Correct credentials are refused while locked and do not count.
    let err = vault.retrieve(&id, "pw1").unwrap_err();
    assert!(matches!(err, VaultError::Locked { .. }));
    assert_eq!(err.attempts_remaining(), Some(0));
    assert_eq!(vault.status().unwrap().failed_attempts, 3);

    clock.advance(Duration::from_secs(10));
    vault.reauthorize(MASTER).expect("reauthorize should succeed");

    let status = vault.status().unwrap();
    assert!(!status.is_locked);
    assert_eq!(status.attempts_remaining, 3);

    assert_eq!(vault.retrieve(&id, "pw1").unwrap(), "hello world");
}

#[test]
fn test_reauthorize_too_soon_regardless_of_password() {
    let (vault, clock) = vault_with_clock();
    for _ in 0..3 {
        vault.retrieve("missing", "pw1").unwrap_err();
    }

    clock.advance(Duration::from_secs(4));
    for password in [MASTER, "wrong"] {
        match vault.reauthorize(password) {
            Err(VaultError::TooSoon { cooldown_remaining }) => {
                assert_eq!(cooldown_remaining, Duration::from_secs(6));
            }
            other => panic!("expected too soon, got {:?}", other),
        }
    }
    assert!(vault.status().unwrap().is_locked);
}

#[test]
fn test_wrong_master_keeps_lock() {
    let (vault, clock) = vault_with_clock();
    for _ in 0..3 {
        vault.retrieve("missing", "pw1").unwrap_err();
    }
    clock.advance(Duration::from_secs(11));

    assert!(matches!(vault.reauthorize("admin124"), Err(VaultError::Auth)));
    let status = vault.status().unwrap();
    assert!(status.is_locked);
    assert_eq!(status.failed_attempts, 3);

    vault.reauthorize(MASTER).expect("correct master should unlock");
    assert!(!vault.status().unwrap().is_locked);
}

#[test]
fn test_elapsed_cooldown_does_not_unlock() {
    let (vault, clock) = vault_with_clock();
    let id = vault.store("note", "pw1", "pw1").unwrap().to_string();
    for _ in 0..3 {
        vault.retrieve(&id, "bad").unwrap_err();
    }

    clock.advance(Duration::from_secs(3600));
    let err = vault.retrieve(&id, "pw1").unwrap_err();
    assert!(matches!(
        err,
        VaultError::Locked { cooldown_remaining } if cooldown_remaining.is_zero()
    ));
}

#[test]
fn test_failures_span_records() {
    let (vault, _) = vault_with_clock();
    let first = vault.store("one", "pw1", "pw1").unwrap().to_string();
    let second = vault.store("two", "pw2", "pw2").unwrap().to_string();

    vault.retrieve(&first, "pw2").unwrap_err();
    vault.retrieve(&second, "pw1").unwrap_err();
    let err = vault.retrieve(&first, "nope").unwrap_err();
    assert_eq!(err.attempts_remaining(), Some(0));
    assert!(matches!(
        vault.retrieve(&second, "pw2"),
        Err(VaultError::Locked { .. })
    ));
}

#[test]
fn test_master_from_configured_hash() {
    let phc = hash_master_password(&SecretString::from("s3cret".to_string())).unwrap();
    let clock = ManualClock::default();
    let vault = VaultService::builder(MasterSecret::from_phc(&phc).unwrap())
        .kdf_params(KdfParams::new(1024, 1, 1).unwrap())
        .policy(LockoutPolicy::new(1, Duration::from_secs(0)).unwrap())
        .clock(Arc::new(clock))
        .build();

    vault.retrieve("missing", "pw").unwrap_err();
    assert!(vault.status().unwrap().is_locked);
    assert!(matches!(vault.reauthorize(MASTER), Err(VaultError::Auth)));
    vault.reauthorize("s3cret").unwrap();
}

#[test]
fn test_concurrent_failures_are_not_lost() {
    let (vault, _) = vault_with_clock();
    let vault = Arc::new(vault);
    let id = vault.store("shared", "pw1", "pw1").unwrap().to_string();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let vault = Arc::clone(&vault);
            let id = id.clone();
            thread::spawn(move || vault.retrieve(&id, "wrong"))
        })
        .collect();

    let mut mismatches = 0;
    let mut locked = 0;
    for handle in handles {
        match handle.join().expect("thread should not panic") {
            Err(VaultError::PasskeyMismatch { .. }) => mismatches += 1,
            Err(VaultError::Locked { .. }) => locked += 1,
            other => panic!("unexpected result {:?}", other),
        }
    }

    assert_eq!(mismatches, 3);
    assert_eq!(locked, 5);
    assert_eq!(vault.status().unwrap().failed_attempts, 3);
}
