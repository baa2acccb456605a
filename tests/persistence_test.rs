#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: alice and bob share a hostel
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "id, description, payer, amount, participants").unwrap();
    writeln!(csv1, "1, Hostel, alice, 100.0, alice;bob").unwrap();

    let mut cmd1 = Command::new(cargo_bin!("tripsplit"));
    cmd1.arg(csv1.path())
        .arg("-m")
        .arg("alice,bob")
        .arg("--trip")
        .arg("lisbon")
        .arg("--db-path")
        .arg(&db_path);

    let output1 = cmd1.output().expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("alice,100,50,50,owed"));

    // 2. Second run: carol joins, pays for a tram ride for all three
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "id, description, payer, amount, participants").unwrap();
    writeln!(csv2, "2, Tram, carol, 30.0, alice;bob;carol").unwrap();

    let mut cmd2 = Command::new(cargo_bin!("tripsplit"));
    cmd2.arg(csv2.path())
        .arg("-m")
        .arg("carol")
        .arg("--trip")
        .arg("lisbon")
        .arg("--db-path")
        .arg(&db_path);

    let output2 = cmd2.output().expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);

    // The hostel from the first run is still there
    assert!(stdout2.contains("alice,100,60,40,owed"));
    assert!(stdout2.contains("bob,0,60,-60,owes"));
    assert!(stdout2.contains("carol,30,10,20,owed"));
}
