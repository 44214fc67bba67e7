//! Integration tests for the CLI binary.
//!
//! Runs `achain` against a registry in a temporary directory.
//!
//! This test is registered as a [[test]] in the authority-chain-cli crate
//! so that CARGO_BIN_EXE_achain is available.

use std::path::Path;
use std::process::{Command, Output};

use authority_chain::{IssuerKey, RoleCredentialBuilder};

const ADMIN: &str = "admin.roles.example";
const MANAGER: &str = "manager.roles.example";

/// Get a Command pointing to the `achain` binary.
fn achain_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_achain"))
}

fn achain(registry: &Path, args: &[&str]) -> Output {
    achain_binary()
        .arg("--registry")
        .arg(registry)
        .args(args)
        .output()
        .expect("failed to execute achain")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Registry holding: admin listed under root, manager issued by admin role
/// holders, and a root-signed admin credential for `admin`.
fn seeded_registry(dir: &Path) -> (IssuerKey, IssuerKey) {
    let root = IssuerKey::generate(None);
    let admin = IssuerKey::generate(None);
    let root_did = root.did().to_string();

    for (name, key) in [("root.json", &root), ("admin.json", &admin)] {
        let file = dir.join(name);
        std::fs::write(&file, serde_json::to_string(&key.to_document()).unwrap()).unwrap();
        let output = achain(&dir.join("registry"), &["import", "did", file.to_str().unwrap()]);
        assert!(output.status.success(), "import did failed: {output:?}");
    }

    let output = achain(
        &dir.join("registry"),
        &["role", "define", ADMIN, "--issuer-dids", &root_did, "--revoker-dids", &root_did],
    );
    assert!(output.status.success(), "define admin failed: {output:?}");
    let output = achain(
        &dir.join("registry"),
        &["role", "define", MANAGER, "--issuer-role", ADMIN, "--revoker-role", ADMIN],
    );
    assert!(output.status.success(), "define manager failed: {output:?}");

    let credential = RoleCredentialBuilder::new(admin.did(), ADMIN)
        .sign_vc(&root)
        .unwrap();
    let file = dir.join("admin-credential.json");
    std::fs::write(&file, credential.serialized().unwrap()).unwrap();
    let output = achain(
        &dir.join("registry"),
        &["import", "credential", file.to_str().unwrap()],
    );
    assert!(output.status.success(), "import credential failed: {output:?}");

    (root, admin)
}

#[test]
fn cli_responds_to_help() {
    let output = achain_binary()
        .arg("--help")
        .output()
        .expect("failed to execute achain --help");

    assert!(
        output.status.success(),
        "achain --help should exit with success, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = stdout(&output);
    assert!(
        stdout.contains("verify-issuer") && stdout.contains("check-revocation"),
        "achain --help should list the verification commands, got: {stdout}"
    );
}

#[test]
fn cli_responds_to_version() {
    let output = achain_binary()
        .arg("--version")
        .output()
        .expect("failed to execute achain --version");

    assert!(output.status.success());
    assert!(stdout(&output).contains("0.1"));
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = achain_binary()
        .arg("--nonexistent-flag")
        .output()
        .expect("failed to execute achain");

    assert!(
        !output.status.success(),
        "achain with unknown flag should exit with error"
    );
}

#[test]
fn cli_verifies_issuer_through_role_chain() {
    let dir = tempfile::tempdir().unwrap();
    let (root, admin) = seeded_registry(dir.path());
    let registry = dir.path().join("registry");

    let output = achain(&registry, &["verify-issuer", admin.did().as_str(), MANAGER]);
    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert!(stdout(&output).contains("\"verified\": true"));

    // root is listed for admin but holds no admin credential itself
    let output = achain(&registry, &["verify-issuer", root.did().as_str(), MANAGER]);
    assert_eq!(output.status.code(), Some(2), "{output:?}");
    assert!(stdout(&output).contains("NoCredential"));

    let output = achain(&registry, &["check-revocation", admin.did().as_str(), MANAGER]);
    assert_eq!(output.status.code(), Some(0), "{output:?}");
}

#[test]
fn cli_verify_issuance_reports_the_issuer() {
    let dir = tempfile::tempdir().unwrap();
    let (root, admin) = seeded_registry(dir.path());
    let registry = dir.path().join("registry");

    let output = achain(&registry, &["verify-issuance", admin.did().as_str(), ADMIN]);
    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert!(stdout(&output).contains(root.did().as_str()));

    let output = achain(&registry, &["credentials", admin.did().as_str()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("1 credential(s)"));
}

#[test]
fn cli_role_show_and_list() {
    let dir = tempfile::tempdir().unwrap();
    seeded_registry(dir.path());
    let registry = dir.path().join("registry");

    let output = achain(&registry, &["role", "list"]);
    let listed = stdout(&output);
    assert!(listed.contains(ADMIN) && listed.contains(MANAGER));

    let output = achain(&registry, &["role", "show", "missing.roles.example"]);
    assert_eq!(output.status.code(), Some(1));
}
