//! MessagePusher trait 定義
//!
//! コネクションへのイベント配送（ユニキャスト・ルーム単位のブロードキャスト）を
//! 抽象化します。具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, event::ServerEvent, value_object::ConnectionId};

/// コネクションごとの送信キュー
///
/// 送信側はピアの受信を待たない。遅いピアは自分のキューだけを溜める。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、送信手段（WebSocket など）を知らない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// コネクションの送信キューを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// コネクションの送信キューを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のコネクションにイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のコネクションにイベントを送信（一部の送信失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;
}
