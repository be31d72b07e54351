//! Minimal serverless HTTP service: one function behind one REST endpoint.
//!
//! `GET /hello/{name}` on a REST API is proxied to a function whose code is an
//! opaque asset produced by an external packaging step.

use serde_json::json;
use tracing::{info, instrument};

use crate::error::Result;
use crate::resource_types as rt;
use crate::stack::Stack;
use crate::types::{LogicalId, OutputOptions, ResourceHandle, Scope, Value, props};

/// Stage the API is deployed to.
pub const STAGE_NAME: &str = "prod";

/// Managed policy granting the function permission to write logs.
pub const BASIC_EXECUTION_POLICY_ARN: &str =
  "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";

/// Location of the packaged function code.
///
/// The key is expected to be content-addressed by the packaging step; it is
/// never inspected here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAsset {
  pub bucket: String,
  pub key: String,
}

impl Default for CodeAsset {
  fn default() -> Self {
    Self {
      bucket: "stackweave-assets".to_string(),
      key: "hello-lambda.zip".to_string(),
    }
  }
}

/// Inputs of [build_hello_service].
#[derive(Debug, Clone)]
pub struct HelloServiceProps {
  pub code: CodeAsset,
  pub function_name: String,
  pub runtime: String,
}

impl Default for HelloServiceProps {
  fn default() -> Self {
    Self {
      code: CodeAsset::default(),
      function_name: "HelloWorldFunction".to_string(),
      runtime: "nodejs18.x".to_string(),
    }
  }
}

/// Handles of everything [build_hello_service] created.
#[derive(Debug, Clone)]
pub struct HelloService {
  pub role: ResourceHandle,
  pub function: ResourceHandle,
  pub api: ResourceHandle,
  pub hello_resource: ResourceHandle,
  pub name_resource: ResourceHandle,
  pub method: ResourceHandle,
  pub permission: ResourceHandle,
  pub deployment: ResourceHandle,
  pub stage: ResourceHandle,
  pub api_url: LogicalId,
}

/// Declares the hello service in the root scope of `stack`.
#[instrument(level = "trace", skip(stack, config), fields(stack = %stack.name()))]
pub fn build_hello_service(stack: &mut Stack, config: &HelloServiceProps) -> Result<HelloService> {
  let root = Scope::root();

  let role = stack.create_resource(
    &root,
    "LambdaExecutionRole",
    rt::IAM_ROLE,
    props([
      (
        "AssumeRolePolicyDocument",
        json!({
          "Version": "2012-10-17",
          "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": ["lambda.amazonaws.com"] },
            "Action": ["sts:AssumeRole"]
          }]
        })
        .into(),
      ),
      (
        "ManagedPolicyArns",
        Value::list([BASIC_EXECUTION_POLICY_ARN.into()]),
      ),
    ]),
    &[],
  )?;

  let function = stack.create_resource(
    &root,
    "HelloLambda",
    rt::LAMBDA_FUNCTION,
    props([
      ("Runtime", config.runtime.clone().into()),
      (
        "Code",
        Value::map([
          ("S3Bucket", config.code.bucket.clone().into()),
          ("S3Key", config.code.key.clone().into()),
        ]),
      ),
      ("Handler", "index.handler".into()),
      ("FunctionName", config.function_name.clone().into()),
      ("Role", role.attribute("Arn")),
    ]),
    &[],
  )?;

  let api = stack.create_resource(
    &root,
    "hello-api",
    rt::API_REST_API,
    props([
      ("Name", "Hello Service".into()),
      ("Description", "This service serves hello world.".into()),
    ]),
    &[],
  )?;

  let hello_resource = stack.create_resource(
    &root,
    "HelloResource",
    rt::API_RESOURCE,
    props([
      ("RestApiId", api.reference()),
      ("ParentId", api.attribute("RootResourceId")),
      ("PathPart", "hello".into()),
    ]),
    &[],
  )?;

  let name_resource = stack.create_resource(
    &root,
    "NameResource",
    rt::API_RESOURCE,
    props([
      ("RestApiId", api.reference()),
      ("ParentId", hello_resource.reference()),
      ("PathPart", "{name}".into()),
    ]),
    &[],
  )?;

  let invocation_uri = Value::concat([
    "arn:aws:apigateway:".into(),
    stack.region(),
    ":lambda:path/2015-03-31/functions/".into(),
    function.attribute("Arn"),
    "/invocations".into(),
  ]);
  let method = stack.create_resource(
    &root,
    "GetHelloMethod",
    rt::API_METHOD,
    props([
      ("HttpMethod", "GET".into()),
      ("ResourceId", name_resource.reference()),
      ("RestApiId", api.reference()),
      ("AuthorizationType", "NONE".into()),
      ("ApiKeyRequired", false.into()),
      (
        "Integration",
        Value::map([
          ("Type", "AWS_PROXY".into()),
          ("IntegrationHttpMethod", "POST".into()),
          ("Uri", invocation_uri),
        ]),
      ),
    ]),
    &[],
  )?;

  let source_arn = Value::concat([
    "arn:aws:execute-api:".into(),
    stack.region(),
    ":".into(),
    stack.account(),
    ":".into(),
    api.reference(),
    "/*/*".into(),
  ]);
  let permission = stack.create_resource(
    &root,
    "ApiGatewayLambdaPermission",
    rt::LAMBDA_PERMISSION,
    props([
      ("Action", "lambda:InvokeFunction".into()),
      ("FunctionName", function.reference()),
      ("Principal", "apigateway.amazonaws.com".into()),
      ("SourceArn", source_arn),
    ]),
    &[],
  )?;

  let deployment = stack.create_resource(
    &root,
    "ApiDeployment",
    rt::API_DEPLOYMENT,
    props([("RestApiId", api.reference())]),
    &[],
  )?;
  stack.add_dependency(&deployment, &method)?;

  let stage = stack.create_resource(
    &root,
    "ApiStage",
    rt::API_STAGE,
    props([
      ("StageName", STAGE_NAME.into()),
      ("RestApiId", api.reference()),
      ("DeploymentId", deployment.reference()),
    ]),
    &[],
  )?;

  let url = Value::concat([
    "https://".into(),
    api.reference(),
    ".execute-api.".into(),
    stack.region(),
    format!(".amazonaws.com/{}/hello/{{name}}", STAGE_NAME).into(),
  ]);
  let api_url = stack.add_output(&root, "ApiUrl", url, OutputOptions::described("API URL"))?;

  info!(resources = stack.len(), "hello service declared");
  Ok(HelloService {
    role,
    function,
    api,
    hello_resource,
    name_resource,
    method,
    permission,
    deployment,
    stage,
    api_url,
  })
}
