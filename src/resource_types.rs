//! Type tags of the resource kinds the crate knows about.

pub const IAM_ROLE: &str = "AWS::IAM::Role";
pub const LAMBDA_FUNCTION: &str = "AWS::Lambda::Function";
pub const LAMBDA_PERMISSION: &str = "AWS::Lambda::Permission";
pub const API_REST_API: &str = "AWS::ApiGateway::RestApi";
pub const API_RESOURCE: &str = "AWS::ApiGateway::Resource";
pub const API_METHOD: &str = "AWS::ApiGateway::Method";
pub const API_DEPLOYMENT: &str = "AWS::ApiGateway::Deployment";
pub const API_STAGE: &str = "AWS::ApiGateway::Stage";
