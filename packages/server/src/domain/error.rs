//! Domain errors.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// ConnectionId must not be empty
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// ConnectionId exceeds the allowed length
    #[error("ConnectionId is too long: {0} characters (max {max})", max = super::value_object::CONNECTION_ID_MAX_LEN)]
    ConnectionIdTooLong(usize),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先のコネクションが登録されていない
    #[error("Connection '{0}' not found")]
    ClientNotFound(String),

    /// 送信キューが閉じている
    #[error("Failed to push message: {0}")]
    PushFailed(String),

    /// イベントのエンコードに失敗した
    #[error("Failed to encode event: {0}")]
    Encode(String),
}
