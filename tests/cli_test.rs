//! Integration tests for the jwt-gate CLI.
//!
//! Tests argument parsing, help and version output, subcommand routing,
//! and the decode, claims, resolve and keyset commands end to end.

mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("jwt-gate");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("invalid JSON output")
}

// --- Help and Version ---

#[test]
fn test_no_args_shows_usage_hint() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_help_flag_shows_description() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "JWT claim extraction and kid-based key resolution",
        ))
        .stdout(predicate::str::contains("claims"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jwt-gate"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_resolve_help_shows_key_sources() {
    cmd()
        .args(["resolve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--certs"))
        .stdout(predicate::str::contains("--certs-env"))
        .stdout(predicate::str::contains("--jwks"))
        .stdout(predicate::str::contains("--jwks-env"))
        .stdout(predicate::str::contains("--vars"));
}

#[test]
fn test_claims_help_shows_time_option() {
    cmd()
        .args(["claims", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--at"))
        .stdout(predicate::str::contains("--token-env"));
}

#[test]
fn test_unknown_subcommand_fails() {
    cmd().arg("unknown").assert().failure().stderr(
        predicate::str::contains("invalid value 'unknown'")
            .or(predicate::str::contains("unrecognized subcommand")),
    );
}

#[test]
fn test_unknown_flag_fails() {
    cmd()
        .args(["decode", "--nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}

// --- Decode ---

#[test]
fn test_decode_valid_token_shows_sections() {
    cmd()
        .args(["decode", common::VALID_HS256_TOKEN])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- Header ---"))
        .stdout(predicate::str::contains("HS256"))
        .stdout(predicate::str::contains("--- Payload ---"))
        .stdout(predicate::str::contains("Test User"))
        .stdout(predicate::str::contains("Token Status"))
        .stdout(predicate::str::contains("Issued at"))
        .stdout(predicate::str::contains("NO EXPIRY"));
}

#[test]
fn test_decode_json_mode_outputs_valid_json() {
    let output = cmd()
        .args(["decode", "--json", common::VALID_HS256_TOKEN])
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    let parsed = stdout_json(&output);
    assert_eq!(parsed["header"]["alg"], "HS256");
    assert_eq!(parsed["payload"]["sub"], "1234567890");
    assert_eq!(
        parsed["signature"],
        "SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c"
    );
}

#[test]
fn test_decode_from_stdin_with_trailing_newline() {
    cmd()
        .arg("decode")
        .write_stdin(format!("{}\n", common::VALID_HS256_TOKEN))
        .assert()
        .success()
        .stdout(predicate::str::contains("HS256"));
}

#[test]
fn test_decode_from_env_var() {
    cmd()
        .args(["decode", "--token-env", "TEST_JWT_GATE_DECODE"])
        .env("TEST_JWT_GATE_DECODE", common::VALID_HS256_TOKEN)
        .assert()
        .success()
        .stdout(predicate::str::contains("Test User"));
}

#[test]
fn test_decode_env_var_not_set_shows_error() {
    cmd()
        .args(["decode", "--token-env", "NONEXISTENT_JWT_GATE_VAR"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NONEXISTENT_JWT_GATE_VAR"));
}

#[test]
fn test_decode_invalid_env_var_name() {
    cmd()
        .args(["decode", "--token-env", "BAD=NAME"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid environment variable name"));
}

#[test]
fn test_decode_no_token_shows_error() {
    cmd()
        .arg("decode")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no token provided"));
}

#[test]
fn test_decode_empty_token_arg_shows_error() {
    cmd()
        .args(["decode", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no token provided"));
}

#[test]
fn test_decode_malformed_token_shows_error() {
    for token in [common::MALFORMED_TOKEN_TWO_PARTS, common::INVALID_TOKEN] {
        cmd()
            .args(["decode", token])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid token format"));
    }
}

#[test]
fn test_decode_invalid_base64_shows_error() {
    cmd()
        .args(["decode", "!!!.!!!.!!!"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base64url"));
}

// --- Claims ---

#[test]
fn test_claims_json_before_expiry() {
    let token = common::create_token(Some("198"), &common::dealer_claims(1000));
    let output = cmd()
        .args(["claims", "--json", "--at", "500", token.as_str()])
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    let parsed = stdout_json(&output);
    assert_eq!(parsed["issuer"], "https://login.example.com");
    assert_eq!(parsed["expiration"], 1000);
    assert_eq!(parsed["ttlMillis"], 500_000);
    assert_eq!(parsed["expired"], false);
    assert_eq!(parsed["dealerId"], "D1");
    assert_eq!(parsed["active"], true);
    assert_eq!(parsed["jti"], "abc");
}

#[test]
fn test_claims_vars_after_expiry() {
    let token = common::create_token(None, &serde_json::json!({"exp": 100}));
    cmd()
        .args(["claims", "--vars", "--at", "500", token.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("jwtExpiration=100"))
        .stdout(predicate::str::contains("accessTokenExpiration=-400000"))
        .stdout(predicate::str::contains("expired=true"))
        .stdout(predicate::str::contains("issuer").not());
}

#[test]
fn test_claims_vars_cannot_be_extended_by_claim_contents() {
    let token = common::create_token(
        None,
        &serde_json::json!({"exp": 100, "dealerId": "D1\nexpired=false"}),
    );
    let output = cmd()
        .args(["claims", "--vars", "--at", "500", token.as_str()])
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let expired: Vec<&str> = stdout
        .lines()
        .filter(|line| line.starts_with("expired="))
        .collect();
    assert_eq!(expired, ["expired=true"]);
    assert!(stdout.lines().any(|line| line == "dealerId=D1\\nexpired=false"));
}

#[test]
fn test_claims_empty_payload_outputs_empty_object() {
    let token = common::create_token(None, &serde_json::json!({}));
    let output = cmd()
        .args(["claims", "--json", token.as_str()])
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!({}));
}

#[test]
fn test_claims_relative_time_expression() {
    let now = chrono::Utc::now().timestamp();
    let token = common::create_token(None, &serde_json::json!({"exp": now + 3_600}));
    let output = cmd()
        .args(["claims", "--json", "--at", "+2h", token.as_str()])
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["expired"], true);
}

#[test]
fn test_claims_human_output_shows_status() {
    let token = common::create_token(None, &serde_json::json!({"exp": 100}));
    cmd()
        .args(["claims", "--at", "2024-01-15T10:30:00Z", token.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- Claims ---"))
        .stdout(predicate::str::contains("EXPIRED"));
}

#[test]
fn test_claims_invalid_time_expression() {
    cmd()
        .args(["claims", "--at", "+7x", common::VALID_HS256_TOKEN])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid time expression '+7x'"));
}

#[test]
fn test_claims_malformed_token_fails() {
    cmd()
        .args(["claims", "--json", "a.b"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid token format"));
}

// --- Resolve ---

#[test]
fn test_resolve_certificate_by_kid() {
    let token = common::create_token(Some("198"), &common::dealer_claims(1000));
    cmd()
        .args(["resolve", "--certs-env", "TEST_JWT_GATE_CERTS", token.as_str()])
        .env("TEST_JWT_GATE_CERTS", common::CERTIFICATE_SET)
        .assert()
        .success()
        .stdout(predicate::str::contains("MIIB198"))
        .stdout(predicate::str::contains("MIIB200").not());
}

#[test]
fn test_resolve_jwks_skips_ec_and_later_duplicates() {
    let token = common::create_token(Some("198"), &common::dealer_claims(1000));
    let output = cmd()
        .args(["resolve", "--json", "--jwks-env", "TEST_JWT_GATE_JWKS", token.as_str()])
        .env("TEST_JWT_GATE_JWKS", common::JWKS)
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({"type": "rsa", "modulus": "sTuRuR0_k", "exponent": "AQAB"})
    );
}

#[test]
fn test_resolve_jwks_vars() {
    let token = common::create_token(Some("200"), &common::dealer_claims(1000));
    cmd()
        .args(["resolve", "--vars", "--jwks-env", "TEST_JWT_GATE_JWKS", token.as_str()])
        .env("TEST_JWT_GATE_JWKS", common::JWKS)
        .assert()
        .success()
        .stdout(predicate::str::contains("key_modulus=xYz1"))
        .stdout(predicate::str::contains("key_exponent=AQAB"));
}

#[test]
fn test_resolve_unknown_kid_fails() {
    let token = common::create_token(Some("999"), &common::dealer_claims(1000));
    cmd()
        .args(["resolve", "--certs-env", "TEST_JWT_GATE_CERTS", token.as_str()])
        .env("TEST_JWT_GATE_CERTS", common::CERTIFICATE_SET)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no matching key found for kid '999'"));
}

#[test]
fn test_resolve_without_kid_fails() {
    cmd()
        .args([
            "resolve",
            "--jwks-env",
            "TEST_JWT_GATE_JWKS",
            common::VALID_HS256_TOKEN,
        ])
        .env("TEST_JWT_GATE_JWKS", common::JWKS)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no 'kid'"));
}

#[test]
fn test_resolve_invalid_key_set_fails() {
    let token = common::create_token(Some("198"), &common::dealer_claims(1000));
    cmd()
        .args(["resolve", "--jwks-env", "TEST_JWT_GATE_JWKS", token.as_str()])
        .env("TEST_JWT_GATE_JWKS", "not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JWKS document"));
}

#[test]
fn test_resolve_missing_key_file_fails() {
    let token = common::create_token(Some("198"), &common::dealer_claims(1000));
    cmd()
        .args(["resolve", "--certs", "/nonexistent/jwt-gate/certs.json", token.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// --- Keyset ---

#[test]
fn test_keyset_flattens_certificates() {
    cmd()
        .args(["keyset", "--certs-env", "TEST_JWT_GATE_CERTS", "--prefix", "googcert"])
        .env("TEST_JWT_GATE_CERTS", r#"{"k1":"PEM1","k2":"PEM2"}"#)
        .assert()
        .success()
        .stdout(predicate::str::diff("googcert.k1=PEM1\ngoogcert.k2=PEM2\n"));
}

#[test]
fn test_keyset_keeps_each_pem_on_one_line() {
    cmd()
        .args(["keyset", "--certs-env", "TEST_JWT_GATE_CERTS"])
        .env("TEST_JWT_GATE_CERTS", common::CERTIFICATE_SET)
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "cert.198=-----BEGIN CERTIFICATE-----\\nMIIB198\\n-----END CERTIFICATE-----\\n\n\
             cert.200=-----BEGIN CERTIFICATE-----\\nMIIB200\\n-----END CERTIFICATE-----\\n\n",
        ));
}

#[test]
fn test_resolve_vars_escapes_certificate() {
    let token = common::create_token(Some("200"), &common::dealer_claims(1000));
    cmd()
        .args(["resolve", "--vars", "--certs-env", "TEST_JWT_GATE_CERTS", token.as_str()])
        .env("TEST_JWT_GATE_CERTS", common::CERTIFICATE_SET)
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "certificate=-----BEGIN CERTIFICATE-----\\nMIIB200\\n-----END CERTIFICATE-----\\n\n",
        ));
}

#[test]
fn test_keyset_flattens_jwks_rsa_keys() {
    cmd()
        .args(["keyset", "--jwks-env", "TEST_JWT_GATE_JWKS"])
        .env("TEST_JWT_GATE_JWKS", common::JWKS)
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "jwks.198.modulus=sTuRuR0_k\n\
             jwks.198.exponent=AQAB\n\
             jwks.200.modulus=xYz1\n\
             jwks.200.exponent=AQAB\n",
        ));
}

// --- Exit Codes ---

#[test]
fn test_help_exits_with_zero() {
    cmd().arg("--help").assert().success();
}

#[test]
fn test_no_args_exits_with_nonzero() {
    cmd().assert().failure();
}
