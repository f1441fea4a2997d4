//! AI Image Studio Common Library
//!
//! CLIと対話フォーム（UI層）で共有されるフォーム状態・検証・リクエスト型
//!
//! 状態遷移はすべて純粋関数として実装し、ネットワーク呼び出しは
//! 呼び出し側（ルートクレートの `Session`）に任せる。

pub mod artifact;
pub mod error;
pub mod form;
pub mod request;
pub mod response;
pub mod validator;

pub use artifact::{ArtifactHandle, ArtifactStore, ResultArtifact};
pub use error::{Error, Result};
pub use form::{FormState, ImageFile, ImageSlot, USAGE_NOTES};
pub use request::{FieldValue, FormField, GenerateRequest};
pub use response::{parse_error_message, BackendReply, SubmissionOutcome, GENERIC_ERROR_MESSAGE};
pub use validator::{validate, ValidationError};
