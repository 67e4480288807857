//! UseCase errors.

use thiserror::Error;

use crate::domain::MessagePushError;

/// 中継（relay）のエラー
///
/// いずれも送信者には通知されない。UI 層でログに残すだけ。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// 送信先のコネクションが存在しない、またはキューが閉じている
    #[error("Target connection '{0}' is unreachable")]
    TargetUnreachable(String),

    /// イベントのエンコードに失敗した
    #[error("Failed to encode relayed event: {0}")]
    Encode(String),
}

impl RelayError {
    pub(crate) fn from_push(target: &str, err: MessagePushError) -> Self {
        match err {
            MessagePushError::ClientNotFound(_) | MessagePushError::PushFailed(_) => {
                Self::TargetUnreachable(target.to_string())
            }
            MessagePushError::Encode(reason) => Self::Encode(reason),
        }
    }
}
