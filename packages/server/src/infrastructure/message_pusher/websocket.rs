//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket 接続ごとの送信キュー（`PusherChannel`）を Room ごとに管理
//! - ドメインイベントのワイヤ形式への変換
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket 接続の受付と送信キューの生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `PusherChannel` を受け取り、メッセージ送信に使用します。
//! 送信は `try_send` で行い待機しないため、ロック保持中にソケット I/O や
//! 遅いクライアントの待ちが発生することはありません。満杯のキュー宛ての
//! メッセージはその宛先についてだけ破棄されます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::{
    domain::{MessagePushError, MessagePusher, ParticipantId, PresenceEvent, PusherChannel, RoomId},
    infrastructure::dto::websocket::ParticipantEventMessage,
};

/// 登録済みクライアントの送信キューと所属 Room
pub struct ClientChannel {
    pub room: RoomId,
    pub sender: PusherChannel,
}

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    ///
    /// Key: 参加者 ID
    /// Value: ClientChannel
    clients: Arc<Mutex<HashMap<ParticipantId, ClientChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ParticipantId, ClientChannel>>>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(
        &self,
        room: RoomId,
        id: ParticipantId,
        sender: PusherChannel,
    ) -> Result<(), MessagePushError> {
        let mut clients = self.clients.lock().await;
        if clients.contains_key(&id) {
            return Err(MessagePushError::AlreadyRegistered(id.into_string()));
        }
        tracing::debug!("Client '{}' registered to MessagePusher in room '{}'", id, room);
        clients.insert(id, ClientChannel { room, sender });
        Ok(())
    }

    async fn unregister_client(&self, id: &ParticipantId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(id).is_some() {
            tracing::debug!("Client '{}' unregistered from MessagePusher", id);
        }
    }

    async fn push_to(&self, id: &ParticipantId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let channel = clients
            .get(id)
            .ok_or_else(|| MessagePushError::ClientNotFound(id.as_str().to_string()))?;
        channel
            .sender
            .try_send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", id);
        Ok(())
    }

    async fn broadcast(
        &self,
        room: &RoomId,
        targets: Vec<ParticipantId>,
        event: &PresenceEvent,
    ) -> usize {
        let message = ParticipantEventMessage::from(event);
        let content = match serde_json::to_string(&message) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to encode '{}' event: {}", event.name(), e);
                return 0;
            }
        };

        let clients = self.clients.lock().await;
        let mut delivered = 0;

        for target in targets {
            let Some(channel) = clients.get(&target) else {
                tracing::warn!("Client '{}' not found during broadcast, skipping", target);
                continue;
            };
            if &channel.room != room {
                tracing::debug!(
                    "Client '{}' is not in room '{}', skipping",
                    target,
                    room
                );
                continue;
            }
            // ブロードキャストでは一部の送信失敗を許容
            match channel.sender.try_send(content.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("Outbound queue of client '{}' is full, dropping message", target);
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::warn!("Failed to push message to client '{}': connection closed", target);
                }
            }
        }

        tracing::debug!(
            "Broadcasted '{}' for '{}' to {} client(s)",
            event.name(),
            event.participant().id,
            delivered
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParticipantState, outbound_channel};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定のクライアントへの送信
    // - broadcast: 複数クライアントへの送信とワイヤ形式
    // - 一部の宛先が失敗しても残りに配信されること
    // - Room の異なるクライアントには配信されないこと
    // - 読み出しが止まったクライアントのキューが満杯でも他の宛先には配信されること
    // ========================================

    fn id(value: &str) -> ParticipantId {
        ParticipantId::new(value.to_string()).unwrap()
    }

    fn create_test_pusher() -> WebSocketMessagePusher {
        WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new())))
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のクライアントにメッセージを送信できる
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx, mut rx) = outbound_channel();
        pusher
            .register_client(RoomId::main(), id("alice"), tx)
            .await
            .unwrap();

        // when (操作):
        let result = pusher.push_to(&id("alice"), "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let pusher = create_test_pusher();

        // when (操作):
        let result = pusher.push_to(&id("nonexistent"), "Hello").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound("nonexistent".to_string()))
        );
    }

    #[tokio::test]
    async fn test_register_same_client_twice() {
        // テスト項目: 同じ ID の二重登録はエラーになり、既存の送信キューは維持される
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx1, mut rx1) = outbound_channel();
        let (tx2, _rx2) = outbound_channel();
        pusher
            .register_client(RoomId::main(), id("alice"), tx1)
            .await
            .unwrap();

        // when (操作):
        let result = pusher.register_client(RoomId::main(), id("alice"), tx2).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::AlreadyRegistered("alice".to_string()))
        );
        pusher.push_to(&id("alice"), "still here").await.unwrap();
        assert_eq!(rx1.recv().await, Some("still here".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_encodes_event() {
        // テスト項目: ブロードキャストはイベントをワイヤ形式で全ターゲットに配信する
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx1, mut rx1) = outbound_channel();
        let (tx2, mut rx2) = outbound_channel();
        pusher
            .register_client(RoomId::main(), id("alice"), tx1)
            .await
            .unwrap();
        pusher
            .register_client(RoomId::main(), id("bob"), tx2)
            .await
            .unwrap();
        let event = PresenceEvent::Joined(ParticipantState::new(id("charlie")));

        // when (操作):
        let delivered = pusher
            .broadcast(&RoomId::main(), vec![id("alice"), id("bob")], &event)
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        for rx in [&mut rx1, &mut rx2] {
            let json: serde_json::Value =
                serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
            assert_eq!(json["type"], "user-add");
            assert_eq!(json["user"]["id"], "charlie");
        }
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 切断済み・未登録の宛先があっても残りの宛先に配信される
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx_alice, mut rx_alice) = outbound_channel();
        let (tx_bob, rx_bob) = outbound_channel();
        pusher
            .register_client(RoomId::main(), id("alice"), tx_alice)
            .await
            .unwrap();
        pusher
            .register_client(RoomId::main(), id("bob"), tx_bob)
            .await
            .unwrap();
        drop(rx_bob);
        let event = PresenceEvent::Left(ParticipantState::new(id("charlie")));

        // when (操作):
        let delivered = pusher
            .broadcast(
                &RoomId::main(),
                vec![id("bob"), id("nonexistent"), id("alice")],
                &event,
            )
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(rx_alice.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_broadcast_skips_other_rooms() {
        // テスト項目: 別の Room に属するクライアントには配信されない
        // given (前提条件):
        let pusher = create_test_pusher();
        let lobby = RoomId::new("lobby".to_string()).unwrap();
        let (tx_alice, mut rx_alice) = outbound_channel();
        let (tx_bob, mut rx_bob) = outbound_channel();
        pusher
            .register_client(RoomId::main(), id("alice"), tx_alice)
            .await
            .unwrap();
        pusher
            .register_client(lobby, id("bob"), tx_bob)
            .await
            .unwrap();
        let event = PresenceEvent::Updated(ParticipantState::new(id("charlie")));

        // when (操作):
        let delivered = pusher
            .broadcast(&RoomId::main(), vec![id("alice"), id("bob")], &event)
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(rx_alice.recv().await.is_some());
        assert!(rx_bob.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregister_then_broadcast_empty_targets() {
        // テスト項目: 登録解除後のクライアントと空のターゲットには何も配信されない
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx, mut rx) = outbound_channel();
        pusher
            .register_client(RoomId::main(), id("alice"), tx)
            .await
            .unwrap();
        pusher.unregister_client(&id("alice")).await;
        pusher.unregister_client(&id("alice")).await;
        let event = PresenceEvent::Joined(ParticipantState::new(id("bob")));

        // when (操作):
        let to_removed = pusher
            .broadcast(&RoomId::main(), vec![id("alice")], &event)
            .await;
        let to_nobody = pusher.broadcast(&RoomId::main(), vec![], &event).await;

        // then (期待する結果):
        assert_eq!(to_removed, 0);
        assert_eq!(to_nobody, 0);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_broadcast_drops_messages_for_stalled_client() {
        // テスト項目: キューが満杯のクライアント宛てのメッセージだけが破棄され、他の宛先には配信される
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx_stalled, mut rx_stalled) = mpsc::channel(1);
        let (tx_bob, mut rx_bob) = outbound_channel();
        pusher
            .register_client(RoomId::main(), id("stalled"), tx_stalled)
            .await
            .unwrap();
        pusher
            .register_client(RoomId::main(), id("bob"), tx_bob)
            .await
            .unwrap();
        let first = PresenceEvent::Updated(ParticipantState::new(id("charlie")));
        let mut moved = ParticipantState::new(id("charlie"));
        moved.message = "second".to_string();
        let second = PresenceEvent::Updated(moved);

        // when (操作):
        let first_delivered = pusher
            .broadcast(&RoomId::main(), vec![id("stalled"), id("bob")], &first)
            .await;
        let second_delivered = pusher
            .broadcast(&RoomId::main(), vec![id("stalled"), id("bob")], &second)
            .await;

        // then (期待する結果):
        assert_eq!(first_delivered, 2);
        assert_eq!(second_delivered, 1);
        assert!(rx_bob.recv().await.is_some());
        let latest: serde_json::Value =
            serde_json::from_str(&rx_bob.recv().await.unwrap()).unwrap();
        assert_eq!(latest["user"]["message"], "second");
        assert!(rx_stalled.recv().await.is_some());
        assert!(rx_stalled.try_recv().is_err());
        // 読み出しが再開すれば再び配信できる
        assert!(pusher.push_to(&id("stalled"), "ping").await.is_ok());
    }
}
