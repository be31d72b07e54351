//! Integration tests for the synth CLI.

use std::process::Command;

fn run_synth(args: &[&str]) -> std::process::Output {
  run_synth_with_env(args, &[])
}

/// Runs the binary with extra env vars; STACKWEAVE_* from the caller's environment are cleared.
fn run_synth_with_env(args: &[&str], env_add: &[(&str, &str)]) -> std::process::Output {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_synth"));
  cmd.args(args);
  for key in ["STACKWEAVE_ACCOUNT", "STACKWEAVE_REGION", "STACKWEAVE_OUT_DIR"] {
    cmd.env_remove(key);
  }
  for (k, v) in env_add {
    cmd.env(k, v);
  }
  cmd.output().expect("run synth")
}

fn stdout_json(out: &std::process::Output) -> serde_json::Value {
  serde_json::from_slice(&out.stdout).expect("stdout is JSON")
}

#[test]
fn prints_template_to_stdout() {
  let out = run_synth(&[]);
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let v = stdout_json(&out);
  assert_eq!(v["Resources"].as_object().expect("Resources").len(), 9);
  assert_eq!(v["Outputs"]["ApiUrl"]["Description"], "API URL");
  assert_eq!(
    v["Resources"]["HelloLambda"]["Metadata"]["stackweave:path"],
    "HelloServiceStack/HelloLambda"
  );
}

#[test]
fn output_is_deterministic() {
  let first = run_synth(&[]);
  let second = run_synth(&[]);
  assert!(first.status.success());
  assert_eq!(first.stdout, second.stdout);
}

#[test]
fn region_flag_and_env_override_pseudo_values() {
  let out = run_synth_with_env(
    &["--region", "eu-west-1"],
    &[("STACKWEAVE_ACCOUNT", "123456789012")],
  );
  assert!(out.status.success());
  let v = stdout_json(&out);
  let source_arn = &v["Resources"]["ApiGatewayLambdaPermission"]["Properties"]["SourceArn"];
  assert_eq!(
    source_arn["Fn::Join"][1][0],
    "arn:aws:execute-api:eu-west-1:123456789012:"
  );
}

#[test]
fn asset_flags_set_code_location() {
  let out = run_synth(&["--asset-bucket", "my-bucket", "--asset-key", "abc123.zip"]);
  assert!(out.status.success());
  let v = stdout_json(&out);
  let code = &v["Resources"]["HelloLambda"]["Properties"]["Code"];
  assert_eq!(code["S3Bucket"], "my-bucket");
  assert_eq!(code["S3Key"], "abc123.zip");
}

#[test]
fn no_path_metadata_omits_metadata() {
  let out = run_synth(&["--no-path-metadata"]);
  assert!(out.status.success());
  let v = stdout_json(&out);
  assert!(v["Resources"]["HelloLambda"].get("Metadata").is_none());
}

#[test]
fn writes_template_file_with_out() {
  let dir = tempfile::tempdir().expect("temp dir");
  let out_dir = dir.path().join("cdk.out");
  let out_str = out_dir.to_str().expect("path");
  let out = run_synth(&["--out", out_str, "--stack-name", "Demo"]);
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let path = out_dir.join("Demo.template.json");
  let stdout = String::from_utf8_lossy(&out.stdout);
  assert_eq!(stdout.trim(), path.display().to_string());
  let doc = stackweave::template_io::load_template(&path).expect("load");
  assert!(doc.resource("GetHelloMethod").is_some());
}

#[test]
fn out_dir_from_env() {
  let dir = tempfile::tempdir().expect("temp dir");
  let out_str = dir.path().to_str().expect("path");
  let out = run_synth_with_env(&[], &[("STACKWEAVE_OUT_DIR", out_str)]);
  assert!(out.status.success());
  assert!(dir.path().join("HelloServiceStack.template.json").exists());
}

#[test]
fn unknown_flag_fails() {
  let out = run_synth(&["--bogus"]);
  assert!(!out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("--bogus"), "stderr: {}", stderr);
}
