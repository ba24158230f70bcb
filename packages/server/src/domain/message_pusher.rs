//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのメッセージ送信を抽象化します。
//! WebSocket などの具体的な送信手段は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::MessagePushError,
    event::PresenceEvent,
    value_object::{ParticipantId, RoomId},
};

/// 送信キューに溜められるメッセージ数の上限
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// クライアントごとの送信キュー
///
/// 接続ごとの書き込みタスクがこのキューを順に読み出してソケットへ書き込む。
/// 容量は [`OUTBOUND_QUEUE_CAPACITY`] で、読み出しが追いつかずに満杯になった
/// キュー宛てのメッセージは送信せずに破棄する（他の宛先には影響しない）。
pub type PusherChannel = mpsc::Sender<String>;

/// 新しい送信キューを作成
pub fn outbound_channel() -> (PusherChannel, mpsc::Receiver<String>) {
    mpsc::channel(OUTBOUND_QUEUE_CAPACITY)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信キューを Room に紐づけて登録
    async fn register_client(
        &self,
        room: RoomId,
        id: ParticipantId,
        sender: PusherChannel,
    ) -> Result<(), MessagePushError>;

    /// クライアントの登録を解除（未登録でもエラーにしない）
    async fn unregister_client(&self, id: &ParticipantId);

    /// 特定のクライアントにメッセージを送信
    async fn push_to(&self, id: &ParticipantId, content: &str) -> Result<(), MessagePushError>;

    /// 指定した Room に属するターゲットへイベントを配信し、配信できた件数を返す
    ///
    /// 一部の宛先への失敗は他の宛先への配信を妨げず、呼び出し元にも返さない。
    async fn broadcast(
        &self,
        room: &RoomId,
        targets: Vec<ParticipantId>,
        event: &PresenceEvent,
    ) -> usize;
}
