//! Entity と Room 集約
//!
//! Room は接続中の参加者の状態を ID ごとに 1 件だけ保持する集約です。
//! ロックやタスクには依存しない純粋なロジックで、Repository 実装が
//! 排他制御の境界となります。

use std::collections::HashMap;

use super::{
    error::{RoomError, ValueObjectError},
    value_object::{ParticipantId, RoomId, Timestamp},
};

/// 表示名の最大文字数
pub const DISPLAY_NAME_MAX_LENGTH: usize = 64;
/// メッセージの最大文字数
pub const MESSAGE_MAX_LENGTH: usize = 500;
/// 色トークンの最大文字数
pub const COLOR_MAX_LENGTH: usize = 32;

/// 2 次元のスカラー値の組（位置・速度）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 接続中の参加者 1 人分の状態
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantState {
    pub id: ParticipantId,
    pub display_name: String,
    pub position: Vector2,
    pub velocity: Vector2,
    pub message: String,
    pub color: String,
}

impl ParticipantState {
    /// デフォルト値で新しい状態を作成
    pub fn new(id: ParticipantId) -> Self {
        Self {
            id,
            display_name: String::new(),
            position: Vector2::default(),
            velocity: Vector2::default(),
            message: String::new(),
            color: String::new(),
        }
    }

    /// パッチに含まれるフィールドだけを上書きする
    pub fn apply(&mut self, patch: &ParticipantPatch) {
        if let Some(display_name) = &patch.display_name {
            self.display_name = display_name.clone();
        }
        if let Some(x) = patch.x {
            self.position.x = x;
        }
        if let Some(y) = patch.y {
            self.position.y = y;
        }
        if let Some(vel_x) = patch.vel_x {
            self.velocity.x = vel_x;
        }
        if let Some(vel_y) = patch.vel_y {
            self.velocity.y = vel_y;
        }
        if let Some(message) = &patch.message {
            self.message = message.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
    }
}

/// 部分更新
///
/// `None` のフィールドは更新前の値を保持する。座標は軸ごとに個別に扱う。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantPatch {
    pub display_name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub vel_x: Option<f64>,
    pub vel_y: Option<f64>,
    pub message: Option<String>,
    pub color: Option<String>,
}

impl ParticipantPatch {
    /// 文字数上限と座標の有限性を検証する
    ///
    /// 1 つでも違反があればパッチ全体を不正とみなす。
    pub fn validate(&self) -> Result<(), ValueObjectError> {
        check_length("name", self.display_name.as_deref(), DISPLAY_NAME_MAX_LENGTH)?;
        check_length("message", self.message.as_deref(), MESSAGE_MAX_LENGTH)?;
        check_length("color", self.color.as_deref(), COLOR_MAX_LENGTH)?;

        let coordinates = [
            ("x", self.x),
            ("y", self.y),
            ("velX", self.vel_x),
            ("velY", self.vel_y),
        ];
        for (field, value) in coordinates {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(ValueObjectError::NotFinite(field));
            }
        }

        Ok(())
    }
}

fn check_length(field: &'static str, value: Option<&str>, max: usize) -> Result<(), ValueObjectError> {
    let Some(value) = value else {
        return Ok(());
    };
    let actual = value.chars().count();
    if actual > max {
        return Err(ValueObjectError::TooLong { field, max, actual });
    }
    Ok(())
}

/// Room 集約
///
/// `id → ParticipantState` の対応は単射で、登録から削除までの間だけ参照できる。
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub created_at: Timestamp,
    participants: HashMap<ParticipantId, ParticipantState>,
    capacity: Option<usize>,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            participants: HashMap::new(),
            capacity: None,
        }
    }

    /// 参加者数の上限つきで Room を作成
    pub fn with_capacity(id: RoomId, created_at: Timestamp, capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::new(id, created_at)
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// 参加者をデフォルト状態で登録
    pub fn register(&mut self, id: ParticipantId) -> Result<ParticipantState, RoomError> {
        if self.participants.contains_key(&id) {
            return Err(RoomError::DuplicateParticipant(id.into_string()));
        }
        if let Some(capacity) = self.capacity
            && self.participants.len() >= capacity
        {
            return Err(RoomError::CapacityExceeded(capacity));
        }

        let state = ParticipantState::new(id.clone());
        self.participants.insert(id, state.clone());
        Ok(state)
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&ParticipantState> {
        self.participants.get(id)
    }

    /// 部分更新を適用し、更新後の状態を返す
    pub fn apply_patch(
        &mut self,
        id: &ParticipantId,
        patch: &ParticipantPatch,
    ) -> Option<ParticipantState> {
        let state = self.participants.get_mut(id)?;
        state.apply(patch);
        Some(state.clone())
    }

    pub fn remove(&mut self, id: &ParticipantId) -> Option<ParticipantState> {
        self.participants.remove(id)
    }

    /// 指定した参加者以外の状態（ID 順）
    pub fn participants_except(&self, id: &ParticipantId) -> Vec<ParticipantState> {
        let mut others: Vec<ParticipantState> = self
            .participants
            .values()
            .filter(|state| &state.id != id)
            .cloned()
            .collect();
        others.sort_by(|a, b| a.id.cmp(&b.id));
        others
    }

    /// 全参加者の状態（ID 順）
    pub fn participants(&self) -> Vec<ParticipantState> {
        let mut all: Vec<ParticipantState> = self.participants.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }
}
