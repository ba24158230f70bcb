//! Repository trait 定義
//!
//! Session Registry（接続中の参加者とその最新状態の唯一の情報源）の
//! インターフェースを定義します。具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;

use super::{
    entity::{ParticipantPatch, ParticipantState, Room},
    error::RepositoryError,
    value_object::ParticipantId,
};

/// Participant Repository trait
///
/// すべての操作は互いに線形化可能でなければならない。同じ ID に対する更新と
/// 削除が競合した場合、「更新してから削除」か「削除後の更新は NotFound」の
/// どちらかに必ず決まる。
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// 参加者をデフォルト状態で登録
    async fn register(&self, id: ParticipantId) -> Result<ParticipantState, RepositoryError>;

    /// 参加者の状態を取得
    async fn get(&self, id: &ParticipantId) -> Result<ParticipantState, RepositoryError>;

    /// パッチに含まれるフィールドだけをマージし、更新後の完全な状態を返す
    async fn apply_partial_update(
        &self,
        id: &ParticipantId,
        patch: &ParticipantPatch,
    ) -> Result<ParticipantState, RepositoryError>;

    /// 参加者を削除し、最後の状態を返す
    async fn remove(&self, id: &ParticipantId) -> Result<ParticipantState, RepositoryError>;

    /// 指定した参加者以外の全員のスナップショット
    async fn list_except(&self, id: &ParticipantId) -> Vec<ParticipantState>;

    /// 全参加者のスナップショット
    async fn list_all(&self) -> Vec<ParticipantState>;

    /// 接続中の参加者数
    async fn count(&self) -> usize;

    /// Room 集約のスナップショット
    async fn get_room(&self) -> Room;
}
