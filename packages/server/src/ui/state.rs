//! Server state shared by every connection.

use std::sync::Arc;

use crate::{
    domain::RoomId,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, FetchOthersUseCase,
        GetRoomStateUseCase, UpdateParticipantUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// The single room every connection joins
    pub room_id: RoomId,
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// FetchOthersUseCase（他の参加者の状態取得のユースケース）
    pub fetch_others_usecase: Arc<FetchOthersUseCase>,
    /// UpdateParticipantUseCase（状態更新のユースケース）
    pub update_participant_usecase: Arc<UpdateParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// GetRoomStateUseCase（Room 状態取得のユースケース）
    pub get_room_state_usecase: Arc<GetRoomStateUseCase>,
}
