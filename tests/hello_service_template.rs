//! Shape of the synthesized hello service template, checked through the
//! partial-match assertions the crate exposes.

use serde_json::json;
use stackweave::{HelloServiceProps, Stack, SynthOptions, Template, build_hello_service};

fn template() -> Template {
  let mut stack = Stack::new("MyTestStack");
  build_hello_service(&mut stack, &HelloServiceProps::default()).expect("build");
  let options = SynthOptions {
    validate_properties: true,
    ..SynthOptions::default()
  };
  let doc = stack.synthesize(&options).expect("synthesize");
  Template::from_document(&doc).expect("to json")
}

#[test]
fn function_created() {
  template()
    .has_resource_properties(
      "AWS::Lambda::Function",
      &json!({ "Handler": "index.handler", "Runtime": "nodejs18.x" }),
    )
    .unwrap();
}

#[test]
fn execution_role_created() {
  template()
    .has_resource_properties(
      "AWS::IAM::Role",
      &json!({
        "AssumeRolePolicyDocument": {
          "Version": "2012-10-17",
          "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": ["lambda.amazonaws.com"] },
            "Action": ["sts:AssumeRole"]
          }]
        },
        "ManagedPolicyArns": [
          "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole"
        ]
      }),
    )
    .unwrap();
}

#[test]
fn rest_api_created() {
  template()
    .has_resource_properties("AWS::ApiGateway::RestApi", &json!({ "Name": "Hello Service" }))
    .unwrap();
}

#[test]
fn api_resources_created() {
  let t = template();
  t.has_resource_properties("AWS::ApiGateway::Resource", &json!({ "PathPart": "hello" }))
    .unwrap();
  t.has_resource_properties(
    "AWS::ApiGateway::Resource",
    &json!({ "PathPart": "{name}", "ParentId": { "Ref": "HelloResource" } }),
  )
  .unwrap();
  t.resource_count_is("AWS::ApiGateway::Resource", 2).unwrap();
}

#[test]
fn method_created() {
  template()
    .has_resource_properties(
      "AWS::ApiGateway::Method",
      &json!({
        "HttpMethod": "GET",
        "AuthorizationType": "NONE",
        "Integration": { "Type": "AWS_PROXY", "IntegrationHttpMethod": "POST" }
      }),
    )
    .unwrap();
}

#[test]
fn permission_created() {
  template()
    .has_resource_properties(
      "AWS::Lambda::Permission",
      &json!({ "Action": "lambda:InvokeFunction", "Principal": "apigateway.amazonaws.com" }),
    )
    .unwrap();
}

#[test]
fn single_deployment_created() {
  template()
    .resource_count_is("AWS::ApiGateway::Deployment", 1)
    .unwrap();
}

#[test]
fn stage_created() {
  template()
    .has_resource_properties("AWS::ApiGateway::Stage", &json!({ "StageName": "prod" }))
    .unwrap();
}

#[test]
fn api_url_output_created() {
  template()
    .has_output("ApiUrl", &json!({ "Description": "API URL" }))
    .unwrap();
}

#[test]
fn deployment_depends_on_method() {
  let t = template();
  let deployment = &t.json()["Resources"]["ApiDeployment"];
  let depends_on = deployment["DependsOn"].as_array().expect("DependsOn");
  assert!(depends_on.contains(&json!("GetHelloMethod")));
}
