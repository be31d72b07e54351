//! CLI: synthesize the hello service stack into a template.
//!
//! Usage: `synth [OPTIONS]`
//! Example: synth --region eu-west-1 --out cdk.out
//!
//! Without --out the template JSON is printed to stdout; with --out it is
//! written to `<DIR>/<stack-name>.template.json`.
//!
//! Set RUST_LOG=stackweave=trace for TRACE-level span enter/exit and events.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use stackweave::{
  CodeAsset, HelloServiceProps, PseudoOverrides, Stack, SynthOptions, build_hello_service,
  template_io::OutputDir,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Synthesize the hello service stack into a deployable template.
#[derive(Parser, Debug)]
#[command(name = "synth")]
#[command(
  after_help = r#"Environment variables (used when the matching flag is not given):
  STACKWEAVE_ACCOUNT   Account id substituted for the account pseudo value.
  STACKWEAVE_REGION    Region substituted for the region pseudo value.
  STACKWEAVE_OUT_DIR   Directory the template is written to.

Examples:
  synth
  synth --region eu-west-1 --account 123456789012 --out cdk.out"#
)]
struct Args {
  /// Logical name of the stack.
  #[arg(long, default_value = "HelloServiceStack")]
  stack_name: String,

  /// Deployment account; left symbolic when unset.
  #[arg(long, env = "STACKWEAVE_ACCOUNT", value_name = "ID")]
  account: Option<String>,

  /// Deployment region; left symbolic when unset.
  #[arg(long, env = "STACKWEAVE_REGION", value_name = "REGION")]
  region: Option<String>,

  /// Bucket holding the packaged function code.
  #[arg(long, value_name = "BUCKET")]
  asset_bucket: Option<String>,

  /// Key of the packaged function code.
  #[arg(long, value_name = "KEY")]
  asset_key: Option<String>,

  /// Write the template here instead of printing it.
  #[arg(long, env = "STACKWEAVE_OUT_DIR", value_name = "DIR")]
  out: Option<PathBuf>,

  /// Do not record construction paths in resource metadata.
  #[arg(long)]
  no_path_metadata: bool,
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  info!(stack = %args.stack_name, account = ?args.account, region = ?args.region, "synth starting");

  let defaults = CodeAsset::default();
  let props = HelloServiceProps {
    code: CodeAsset {
      bucket: args.asset_bucket.clone().unwrap_or(defaults.bucket),
      key: args.asset_key.clone().unwrap_or(defaults.key),
    },
    ..HelloServiceProps::default()
  };

  let mut stack = Stack::new(&args.stack_name);
  if let Err(e) = build_hello_service(&mut stack, &props) {
    eprintln!("Error building stack: {}", e);
    process::exit(1);
  }

  let options = SynthOptions {
    overrides: PseudoOverrides {
      account: args.account.clone(),
      region: args.region.clone(),
      ..PseudoOverrides::default()
    },
    validate_properties: true,
    path_metadata: !args.no_path_metadata,
  };
  let doc = match stack.synthesize(&options) {
    Ok(doc) => doc,
    Err(e) => {
      eprintln!("Error: {}", e);
      process::exit(1);
    }
  };

  match &args.out {
    Some(dir) => {
      let out = OutputDir::new(dir);
      match out.write(stack.name(), &doc) {
        Ok(path) => {
          info!(path = %path.display(), "template written");
          println!("{}", path.display());
        }
        Err(e) => {
          eprintln!("Error writing {}: {}", out.template_path(stack.name()).display(), e);
          process::exit(1);
        }
      }
    }
    None => match doc.to_json_string() {
      Ok(json) => println!("{}", json),
      Err(e) => {
        eprintln!("Error: {}", e);
        process::exit(1);
      }
    },
  }
}
