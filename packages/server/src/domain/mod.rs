//! Domain 層
//!
//! プレゼンス中継の中核となるモデルと、外部依存のインターフェースを定義します。
//!
//! - `value_object`: 識別子・タイムスタンプなどの値オブジェクト
//! - `entity`: 参加者の状態と Room 集約
//! - `event`: 参加者に配信するドメインイベント
//! - `repository`: Session Registry のインターフェース
//! - `message_pusher`: 接続へのメッセージ送信のインターフェース

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ParticipantPatch, ParticipantState, Room, Vector2};
pub use error::{MessagePushError, RepositoryError, RoomError, ValueObjectError};
pub use event::PresenceEvent;
pub use message_pusher::{MessagePusher, OUTBOUND_QUEUE_CAPACITY, PusherChannel, outbound_channel};
pub use repository::ParticipantRepository;
pub use value_object::{ParticipantId, ParticipantIdFactory, RoomId, Timestamp};
